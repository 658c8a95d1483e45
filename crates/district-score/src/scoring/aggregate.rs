use super::category::{column_inverted, Category, CategoryKey, CATEGORY_COUNT, CATEGORY_MAP};
use super::normalize::{nan_mean, normalize_cell};
use super::weights::{WeightTerm, WeightVector};
use super::ScoreError;
use crate::table::{District, IndicatorTable};
use serde::Serialize;

/// A derived score for one district. Never written back to the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub district: String,
    pub score: f64,
}

/// Polarity-corrected mean of the category's columns for one district.
pub fn category_score(district: &District, category: &Category) -> f64 {
    nan_mean(
        category
            .columns
            .iter()
            .map(|column| normalize_cell(district, column, category.invert).unwrap_or(f64::NAN)),
    )
}

/// Mean of the category's raw values, polarity left as stored.
pub fn raw_category_mean(district: &District, category: &Category) -> f64 {
    nan_mean(
        category
            .columns
            .iter()
            .map(|column| district.value_or_nan(column)),
    )
}

/// Unweighted mean across categories; each category counts once regardless of its width.
pub fn overall_score(district: &District) -> f64 {
    nan_mean(
        CATEGORY_MAP
            .iter()
            .map(|category| category_score(district, category)),
    )
}

/// Category scores for every district, computed once per snapshot.
#[derive(Debug, Clone)]
pub(crate) struct CategoryMatrix {
    rows: Vec<[f64; CATEGORY_COUNT]>,
}

impl CategoryMatrix {
    pub(crate) fn build(table: &IndicatorTable) -> Self {
        let rows = table
            .districts()
            .iter()
            .map(|district| {
                let mut row = [f64::NAN; CATEGORY_COUNT];
                for (slot, category) in row.iter_mut().zip(CATEGORY_MAP.iter()) {
                    *slot = category_score(district, category);
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub(crate) fn score(&self, row: usize, key: CategoryKey) -> f64 {
        self.rows[row][key.index()]
    }

    pub(crate) fn overall(&self, row: usize) -> f64 {
        nan_mean(self.rows[row].iter().copied())
    }

    /// Mean category score over every district except `row`.
    pub(crate) fn baseline_excluding(&self, row: usize, key: CategoryKey) -> f64 {
        nan_mean(
            self.rows
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != row)
                .map(|(_, scores)| scores[key.index()]),
        )
    }
}

pub(crate) fn weighted_scores(
    table: &IndicatorTable,
    matrix: &CategoryMatrix,
    weights: &WeightVector,
) -> Result<Vec<ScoreResult>, ScoreError> {
    let terms = weights.resolve(table)?;

    Ok(table
        .districts()
        .iter()
        .enumerate()
        .map(|(row, district)| {
            let contributions = terms.iter().map(|(term, weight)| {
                let value = match term {
                    WeightTerm::Category(key) => matrix.score(row, *key),
                    WeightTerm::Column(column) => {
                        normalize_cell(district, column, column_inverted(column))
                            .unwrap_or(f64::NAN)
                    }
                };
                weight * value
            });
            ScoreResult {
                district: district.name.clone(),
                score: nan_sum(contributions),
            }
        })
        .collect())
}

pub(crate) fn per_district<F>(table: &IndicatorTable, score: F) -> Vec<ScoreResult>
where
    F: Fn(usize, &District) -> f64,
{
    table
        .districts()
        .iter()
        .enumerate()
        .map(|(row, district)| ScoreResult {
            district: district.name.clone(),
            score: score(row, district),
        })
        .collect()
}

fn nan_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut total = None;
    for value in values.into_iter().filter(|value| !value.is_nan()) {
        *total.get_or_insert(0.0) += value;
    }
    total.unwrap_or(f64::NAN)
}
