//! Weighted scoring, ranking and explanation over an indicator table snapshot.
//!
//! Every operation reads a shared [`IndicatorTable`] and returns freshly built values; none of
//! them writes derived columns back into the table, so concurrent requests cannot observe each
//! other's scores.

mod aggregate;
mod category;
mod explain;
mod features;
mod normalize;
mod rank;
mod weights;

pub use aggregate::{category_score, overall_score, raw_category_mean, ScoreResult};
pub use category::{column_inverted, Category, CategoryKey, CATEGORY_MAP};
pub use explain::{ExplainMode, Explanation, MetricComparison};
pub use features::{round_display, FeatureSnapshot, DISPLAY_PRECISION};
pub use normalize::{normalize, normalize_cell};
pub use rank::{rank, Direction, RankedEntry, RankedList};
pub use weights::WeightVector;

use crate::table::IndicatorTable;
use aggregate::{per_district, CategoryMatrix};
use std::sync::Arc;

/// Error taxonomy for scoring requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("{0}")]
    Validation(String),
    #[error("district '{0}' not found")]
    NotFound(String),
    #[error("district '{0}' has no numeric indicator data to compare")]
    Unscorable(String),
}

/// Request-scoped view over one table snapshot.
pub struct ScoringEngine {
    table: Arc<IndicatorTable>,
    matrix: CategoryMatrix,
}

impl ScoringEngine {
    pub fn new(table: Arc<IndicatorTable>) -> Self {
        let matrix = CategoryMatrix::build(&table);
        Self { table, matrix }
    }

    pub fn table(&self) -> &IndicatorTable {
        &self.table
    }

    /// Weighted sum over the named columns and categories, in table row order.
    pub fn weighted_scores(&self, weights: &WeightVector) -> Result<Vec<ScoreResult>, ScoreError> {
        aggregate::weighted_scores(&self.table, &self.matrix, weights)
    }

    pub fn category_scores(&self, key: CategoryKey) -> Vec<ScoreResult> {
        per_district(&self.table, |row, _| self.matrix.score(row, key))
    }

    pub fn overall_scores(&self) -> Vec<ScoreResult> {
        per_district(&self.table, |row, _| self.matrix.overall(row))
    }

    /// Unnormalized category means, for topic lists that report raw index values.
    pub fn raw_category_means(&self, key: CategoryKey) -> Vec<ScoreResult> {
        let category = key.category();
        per_district(&self.table, |_, district| {
            raw_category_mean(district, category)
        })
    }

    /// Ranks raw means so that the best district comes first for either polarity.
    pub fn topic_ranking(&self, key: CategoryKey, limit: i64) -> Result<RankedList, ScoreError> {
        let direction = if key.category().invert {
            Direction::Ascending
        } else {
            Direction::Descending
        };
        rank(&self.raw_category_means(key), direction, limit)
    }

    pub fn explain(&self, district: &str, mode: ExplainMode) -> Result<Explanation, ScoreError> {
        explain::explain(&self.table, &self.matrix, district, mode)
    }

    pub fn metric_breakdown(&self, district: &str) -> Result<Vec<MetricComparison>, ScoreError> {
        explain::metric_breakdown(&self.table, &self.matrix, district)
    }

    pub fn features(&self, district: &str) -> Result<FeatureSnapshot, ScoreError> {
        features::features(&self.table, &self.matrix, district)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn engine(csv: &str) -> ScoringEngine {
        let table = IndicatorTable::from_reader(Cursor::new(csv.to_string())).expect("loads");
        ScoringEngine::new(Arc::new(table))
    }

    #[test]
    fn topic_ranking_orders_inverted_categories_ascending() {
        let engine = engine(
            "district,crime_rate,senior_pedestrian_accidents\nA,0.2,0.1\nB,0.8,0.9\n",
        );
        let ranked = engine.topic_ranking(CategoryKey::Safety, 5).expect("ranked");

        assert_eq!(ranked[0].district, "A");
        assert_eq!(round_display(ranked[0].score), Some(0.15));
        assert_eq!(ranked[1].district, "B");
        assert_eq!(round_display(ranked[1].score), Some(0.85));
    }

    #[test]
    fn topic_ranking_orders_regular_categories_descending() {
        let engine = engine("district,park_area_ratio\nA,0.2\nB,0.8\n");
        let ranked = engine.topic_ranking(CategoryKey::Nature, 5).expect("ranked");
        assert_eq!(ranked[0].district, "B");
    }

    #[test]
    fn scoring_leaves_the_table_untouched() {
        let engine = engine("district,crime_rate\nA,0.2\nB,0.6\n");
        let weights = WeightVector::from_pairs([("crime_rate", 1.0)]).expect("valid");

        let first = engine.weighted_scores(&weights).expect("scores");
        let second = engine.weighted_scores(&weights).expect("scores");

        assert_eq!(first, second);
        assert_eq!(engine.table().districts()[0].to_float("crime_rate"), Ok(0.2));
        assert_eq!(engine.table().columns(), ["crime_rate"]);
    }
}
