use district_score::scoring::ScoringEngine;
use district_score::submissions::SubmissionLog;
use district_score::table::TableStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared handles for the district endpoints.
pub(crate) struct ApiState<S> {
    pub(crate) tables: Arc<TableStore>,
    pub(crate) submissions: Arc<S>,
    pub(crate) data_path: PathBuf,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            submissions: Arc::clone(&self.submissions),
            data_path: self.data_path.clone(),
        }
    }
}

impl<S> ApiState<S>
where
    S: SubmissionLog + 'static,
{
    pub(crate) fn new(tables: Arc<TableStore>, submissions: Arc<S>, data_path: PathBuf) -> Self {
        Self {
            tables,
            submissions,
            data_path,
        }
    }

    /// Engine over the snapshot current at call time; later reloads do not affect it.
    pub(crate) fn engine(&self) -> ScoringEngine {
        ScoringEngine::new(self.tables.snapshot())
    }
}
