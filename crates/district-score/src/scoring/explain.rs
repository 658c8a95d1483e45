use super::aggregate::CategoryMatrix;
use super::category::CategoryKey;
use super::features::round_display;
use super::ScoreError;
use crate::table::IndicatorTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainMode {
    /// Category where the district most exceeds the others.
    #[default]
    Positive,
    /// Category where the district falls furthest behind.
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub district: String,
    pub category: CategoryKey,
    pub sentence: String,
}

/// A district's category score next to the mean of every other district.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    #[serde(skip_serializing)]
    pub category: CategoryKey,
    pub name: &'static str,
    pub selected_district: Option<f64>,
    pub average: Option<f64>,
}

pub(crate) fn explain(
    table: &IndicatorTable,
    matrix: &CategoryMatrix,
    district: &str,
    mode: ExplainMode,
) -> Result<Explanation, ScoreError> {
    let row = table
        .position(district)
        .ok_or_else(|| ScoreError::NotFound(district.to_string()))?;

    let mut chosen: Option<(CategoryKey, f64)> = None;
    for key in CategoryKey::ALL {
        let diff = matrix.score(row, key) - matrix.baseline_excluding(row, key);
        if diff.is_nan() {
            continue;
        }
        let better = match (chosen, mode) {
            (None, _) => true,
            (Some((_, best)), ExplainMode::Positive) => diff > best,
            (Some((_, best)), ExplainMode::Negative) => diff < best,
        };
        if better {
            chosen = Some((key, diff));
        }
    }

    let (key, _) = chosen.ok_or_else(|| ScoreError::Unscorable(district.to_string()))?;
    let category = key.category();
    let label = match mode {
        ExplainMode::Positive => category.label,
        ExplainMode::Negative => category.shortfall_label,
    };

    Ok(Explanation {
        district: district.to_string(),
        category: key,
        sentence: format!("{district} is the {label} district."),
    })
}

pub(crate) fn metric_breakdown(
    table: &IndicatorTable,
    matrix: &CategoryMatrix,
    district: &str,
) -> Result<Vec<MetricComparison>, ScoreError> {
    let row = table
        .position(district)
        .ok_or_else(|| ScoreError::NotFound(district.to_string()))?;

    Ok(CategoryKey::ALL
        .into_iter()
        .map(|key| MetricComparison {
            category: key,
            name: key.category().name,
            selected_district: round_display(matrix.score(row, key)),
            average: round_display(matrix.baseline_excluding(row, key)),
        })
        .collect())
}
