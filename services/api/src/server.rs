use crate::cli::ServeArgs;
use crate::infra::{ApiState, AppState};
use crate::routes::with_district_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use district_score::config::AppConfig;
use district_score::error::AppError;
use district_score::submissions::InMemorySubmissionLog;
use district_score::table::{IndicatorTable, TableStore};
use district_score::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.data.take() {
        config.data.indicator_path = path;
    }

    telemetry::init(&config.telemetry)?;

    let table = IndicatorTable::from_path(&config.data.indicator_path)?;
    let districts = table.len();
    let tables = Arc::new(TableStore::new(table));
    let submissions = Arc::new(InMemorySubmissionLog::default());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api_state = ApiState::new(tables, submissions, config.data.indicator_path.clone());
    let app = with_district_routes(api_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        districts,
        data = %config.data.indicator_path.display(),
        "district scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
