use super::aggregate::CategoryMatrix;
use super::category::CategoryKey;
use super::ScoreError;
use crate::table::IndicatorTable;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DISPLAY_PRECISION: i32 = 2;

/// Rounds for display; `None` stands in for scores with no numeric data.
pub fn round_display(value: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    let factor = 10f64.powi(DISPLAY_PRECISION);
    Some((value * factor).round() / factor)
}

/// Polarity-corrected category means for a single district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    pub district: String,
    /// Keyed in category declaration order.
    pub features: BTreeMap<CategoryKey, Option<f64>>,
}

pub(crate) fn features(
    table: &IndicatorTable,
    matrix: &CategoryMatrix,
    district: &str,
) -> Result<FeatureSnapshot, ScoreError> {
    let row = table
        .position(district)
        .ok_or_else(|| ScoreError::NotFound(district.to_string()))?;

    let features = CategoryKey::ALL
        .into_iter()
        .map(|key| (key, round_display(matrix.score(row, key))))
        .collect();

    Ok(FeatureSnapshot {
        district: district.to_string(),
        features,
    })
}
