//! Append-only log of weight submissions and the aggregate reports built from it.

use crate::scoring::{rank, Direction, ScoreError, ScoreResult, WeightVector};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One `/recommend` call: the weights it used and the districts it returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub weights: WeightVector,
    pub recommended: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(weights: WeightVector, recommended: Vec<String>) -> Self {
        Self {
            weights,
            recommended,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for past submissions. Writes are best-effort from the caller's point of view.
pub trait SubmissionLog: Send + Sync {
    fn record(&self, submission: Submission) -> Result<(), SubmissionError>;
    fn submissions(&self) -> Result<Vec<Submission>, SubmissionError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySubmissionLog {
    entries: Arc<Mutex<Vec<Submission>>>,
}

impl SubmissionLog for InMemorySubmissionLog {
    fn record(&self, submission: Submission) -> Result<(), SubmissionError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(submission);
        Ok(())
    }

    fn submissions(&self) -> Result<Vec<Submission>, SubmissionError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTotal {
    pub category: String,
    pub score: f64,
}

/// Districts most often returned by recommendations; ties keep first-seen order.
pub fn top_districts(
    submissions: &[Submission],
    limit: i64,
) -> Result<Vec<DistrictCount>, ScoreError> {
    let totals = tally(
        submissions
            .iter()
            .flat_map(|submission| submission.recommended.iter())
            .map(|district| (district.as_str(), 1.0)),
    );

    Ok(rank(&totals, Direction::Descending, limit)?
        .into_iter()
        .map(|entry| DistrictCount {
            district: entry.district,
            count: entry.score as u64,
        })
        .collect())
}

/// Weight keys with the largest summed weight across submissions.
pub fn top_weight_keys(
    submissions: &[Submission],
    limit: i64,
) -> Result<Vec<WeightTotal>, ScoreError> {
    let totals = tally(
        submissions
            .iter()
            .flat_map(|submission| submission.weights.iter()),
    );

    Ok(rank(&totals, Direction::Descending, limit)?
        .into_iter()
        .map(|entry| WeightTotal {
            category: entry.district,
            score: entry.score,
        })
        .collect())
}

fn tally<'a, I>(values: I) -> Vec<ScoreResult>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut totals: Vec<ScoreResult> = Vec::new();

    for (key, value) in values {
        let index = *positions.entry(key).or_insert_with(|| {
            totals.push(ScoreResult {
                district: key.to_string(),
                score: 0.0,
            });
            totals.len() - 1
        });
        totals[index].score += value;
    }

    totals
}
