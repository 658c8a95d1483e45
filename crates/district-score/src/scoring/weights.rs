use super::{CategoryKey, ScoreError};
use crate::table::IndicatorTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// Caller-supplied weights keyed by category key or raw column name.
///
/// Only named keys take part in a weighted score; nothing is zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightVector {
    entries: BTreeMap<String, f64>,
}

/// A weight key resolved against the category map and a table's columns.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WeightTerm<'a> {
    Category(CategoryKey),
    Column(&'a str),
}

impl WeightVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a weight. Later values for the same key win.
    pub fn insert(&mut self, key: impl Into<String>, weight: f64) -> Result<(), ScoreError> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err(ScoreError::Validation("weight key must not be empty".to_string()));
        }
        if !weight.is_finite() {
            return Err(ScoreError::Validation(format!(
                "weight for '{key}' must be a finite number"
            )));
        }
        self.entries.insert(key.to_string(), weight);
        Ok(())
    }

    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut weights = Self::new();
        for (key, weight) in pairs {
            weights.insert(key, weight)?;
        }
        Ok(weights)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(key, weight)| (key.as_str(), *weight))
    }

    /// Category keys take precedence over columns of the same name.
    pub(crate) fn resolve<'a>(
        &'a self,
        table: &IndicatorTable,
    ) -> Result<Vec<(WeightTerm<'a>, f64)>, ScoreError> {
        if self.is_empty() {
            return Err(ScoreError::Validation("weights required".to_string()));
        }

        self.entries
            .iter()
            .map(|(key, weight)| {
                let term = match key.parse::<CategoryKey>() {
                    Ok(category) => WeightTerm::Category(category),
                    Err(_) if table.has_column(key) => WeightTerm::Column(key.as_str()),
                    Err(_) => {
                        return Err(ScoreError::Validation(format!(
                            "unknown indicator '{key}'"
                        )))
                    }
                };
                Ok((term, *weight))
            })
            .collect()
    }
}
