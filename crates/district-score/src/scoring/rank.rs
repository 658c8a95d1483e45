use super::aggregate::ScoreResult;
use super::ScoreError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub district: String,
    pub score: f64,
}

pub type RankedList = Vec<RankedEntry>;

/// Orders scores and numbers the first `limit` of them from 1.
///
/// `NaN` scores are dropped. Equal scores keep their input order, so callers that pass
/// scores in table row order get row order as the tie-breaker.
pub fn rank(
    scores: &[ScoreResult],
    direction: Direction,
    limit: i64,
) -> Result<RankedList, ScoreError> {
    if limit <= 0 {
        return Err(ScoreError::Validation(format!(
            "limit must be a positive integer, got {limit}"
        )));
    }

    let mut ordered: Vec<&ScoreResult> = scores
        .iter()
        .filter(|result| !result.score.is_nan())
        .collect();

    ordered.sort_by(|left, right| {
        let ordering = left
            .score
            .partial_cmp(&right.score)
            .unwrap_or(Ordering::Equal);
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    Ok(ordered
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, result)| RankedEntry {
            rank: index + 1,
            district: result.district.clone(),
            score: result.score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[(&str, f64)]) -> Vec<ScoreResult> {
        values
            .iter()
            .map(|(district, score)| ScoreResult {
                district: district.to_string(),
                score: *score,
            })
            .collect()
    }

    fn names(list: &RankedList) -> Vec<&str> {
        list.iter().map(|entry| entry.district.as_str()).collect()
    }

    #[test]
    fn descending_returns_top_entries_with_sequential_ranks() {
        let input = scores(&[("A", 0.2), ("B", 0.9), ("C", 0.5), ("D", 0.7)]);
        let ranked = rank(&input, Direction::Descending, 3).expect("ranked");

        assert_eq!(names(&ranked), ["B", "D", "C"]);
        assert_eq!(
            ranked.iter().map(|entry| entry.rank).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let input = scores(&[("A", 0.5), ("B", 0.5), ("C", 0.1), ("D", 0.5)]);

        let descending = rank(&input, Direction::Descending, 10).expect("ranked");
        assert_eq!(names(&descending), ["A", "B", "D", "C"]);

        let ascending = rank(&input, Direction::Ascending, 10).expect("ranked");
        assert_eq!(names(&ascending), ["C", "A", "B", "D"]);
        assert_eq!(ascending.last().map(|entry| entry.rank), Some(4));
    }

    #[test]
    fn limit_larger_than_population_returns_everything() {
        let input = scores(&[("A", 0.1), ("B", 0.2)]);
        assert_eq!(rank(&input, Direction::Descending, 5).expect("ranked").len(), 2);
    }

    #[test]
    fn nan_scores_are_excluded() {
        let input = scores(&[("A", f64::NAN), ("B", 0.2), ("C", f64::NAN)]);
        let ranked = rank(&input, Direction::Ascending, 5).expect("ranked");
        assert_eq!(names(&ranked), ["B"]);
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn non_positive_limits_are_rejected() {
        let input = scores(&[("A", 0.1)]);
        for limit in [0, -3] {
            let error = rank(&input, Direction::Descending, limit).expect_err("invalid limit");
            assert!(matches!(error, ScoreError::Validation(_)));
        }
    }
}
