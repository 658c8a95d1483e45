use crate::infra::{ApiState, AppState};
use crate::views::{
    FriendlyItem, FriendlyResponse, RankedItem, RecommendResponse, SummaryResponse,
    TopicResponse, NORMALIZED_UNIT,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use district_score::error::AppError;
use district_score::scoring::{
    rank, CategoryKey, Direction, ExplainMode, FeatureSnapshot, ScoreError, WeightVector,
};
use district_score::submissions::{
    top_districts, top_weight_keys, DistrictCount, Submission, SubmissionLog, WeightTotal,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

const DEFAULT_RECOMMENDATIONS: i64 = 3;
const LIST_LENGTH: i64 = 5;
const TOP_DISTRICT_REPORT: i64 = 3;
const TOP_CATEGORY_REPORT: i64 = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DistrictQuery {
    name: Option<String>,
    mode: Option<String>,
}

/// Router builder exposing the scoring, ranking and explanation endpoints.
pub(crate) fn district_router<S>(state: ApiState<S>) -> Router
where
    S: SubmissionLog + 'static,
{
    let mut router = Router::new()
        .route("/recommend", get(recommend_handler::<S>))
        .route("/top5-by-category", get(category_top5_handler::<S>))
        .route("/senior-friendly-top5", get(senior_friendly_handler::<S>))
        .route("/senior-unfriendly-top5", get(senior_unfriendly_handler::<S>))
        .route("/district-summary", get(district_summary_handler::<S>))
        .route("/district-features", get(district_features_handler::<S>))
        .route("/top3-district", get(top_districts_handler::<S>))
        .route("/top5-categories", get(top_categories_handler::<S>))
        .route("/reload", post(reload_handler::<S>))
        .fallback(route_not_found);

    for key in CategoryKey::ALL {
        router = router.route(
            &format!("/{}-priority", key.slug()),
            get(move |State(state): State<ApiState<S>>| async move {
                topic_priority(&state, key)
            }),
        );
    }

    router.with_state(state)
}

pub(crate) fn with_district_routes<S>(state: ApiState<S>) -> Router
where
    S: SubmissionLog + 'static,
{
    district_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn route_not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("no route for {}", uri.path()) })),
    )
}

/// Malformed query strings are reported through the same error body as every other 400.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ScoreError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ScoreError::Validation(rejection.body_text()))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn recommend_handler<S>(
    State(state): State<ApiState<S>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<RecommendResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    let (weights, limit) = parse_recommend_params(query_params(query)?)?;

    let engine = state.engine();
    let scores = engine.weighted_scores(&weights)?;
    let result = rank(&scores, Direction::Descending, limit)?;

    let recommended = result.iter().map(|entry| entry.district.clone()).collect();
    if let Err(err) = state
        .submissions
        .record(Submission::new(weights, recommended))
    {
        warn!(error = %err, "failed to record weight submission");
    }

    Ok(Json(RecommendResponse { result }))
}

/// Splits `num` from the weight pairs; every other key is a weight.
fn parse_recommend_params(
    params: Vec<(String, String)>,
) -> Result<(WeightVector, i64), ScoreError> {
    let mut weights = WeightVector::new();
    let mut limit = DEFAULT_RECOMMENDATIONS;

    for (key, value) in params {
        if key == "num" {
            limit = value.trim().parse::<i64>().map_err(|_| {
                ScoreError::Validation(format!("num must be an integer, got '{value}'"))
            })?;
            continue;
        }

        let weight = value.trim().parse::<f64>().map_err(|_| {
            ScoreError::Validation(format!("weight for '{key}' must be a number, got '{value}'"))
        })?;
        weights.insert(key, weight)?;
    }

    if weights.is_empty() {
        return Err(ScoreError::Validation("weights required".to_string()));
    }

    Ok((weights, limit))
}

fn topic_priority<S>(state: &ApiState<S>, key: CategoryKey) -> Result<Json<TopicResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    let engine = state.engine();
    let ranked = engine.topic_ranking(key, LIST_LENGTH)?;
    Ok(Json(TopicResponse::new(
        engine.table(),
        key,
        key.category().unit,
        ranked,
    )))
}

pub(crate) async fn category_top5_handler<S>(
    State(state): State<ApiState<S>>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<TopicResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    let key = query_params(query)?
        .category
        .ok_or_else(|| ScoreError::Validation("category required".to_string()))?
        .parse::<CategoryKey>()?;

    let engine = state.engine();
    let ranked = rank(&engine.category_scores(key), Direction::Descending, LIST_LENGTH)?;
    Ok(Json(TopicResponse::new(
        engine.table(),
        key,
        NORMALIZED_UNIT,
        ranked,
    )))
}

pub(crate) async fn senior_friendly_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<FriendlyResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    overall_ranking(
        &state,
        Direction::Descending,
        ExplainMode::Positive,
        "Most senior-friendly districts",
    )
}

pub(crate) async fn senior_unfriendly_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<FriendlyResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    overall_ranking(
        &state,
        Direction::Ascending,
        ExplainMode::Negative,
        "Least senior-friendly districts",
    )
}

fn overall_ranking<S>(
    state: &ApiState<S>,
    direction: Direction,
    mode: ExplainMode,
    title: &'static str,
) -> Result<Json<FriendlyResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    let engine = state.engine();
    let ranked = rank(&engine.overall_scores(), direction, LIST_LENGTH)?;

    let mut items = Vec::with_capacity(ranked.len());
    for entry in ranked {
        let metric_data = engine.metric_breakdown(&entry.district)?;
        let info = match engine.explain(&entry.district, mode) {
            Ok(explanation) => Some(explanation.sentence),
            Err(ScoreError::Unscorable(_)) => None,
            Err(other) => return Err(other.into()),
        };
        items.push(FriendlyItem {
            item: RankedItem::from_entry(engine.table(), entry),
            metric_data,
            info,
        });
    }

    Ok(Json(FriendlyResponse {
        title,
        unit: NORMALIZED_UNIT,
        items,
    }))
}

pub(crate) async fn district_summary_handler<S>(
    State(state): State<ApiState<S>>,
    query: Result<Query<DistrictQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: SubmissionLog + 'static,
{
    let query = query_params(query)?;
    let name = required_name(query.name)?;
    let mode = match query.mode.as_deref().map(str::trim) {
        None | Some("") | Some("positive") => ExplainMode::Positive,
        Some("negative") => ExplainMode::Negative,
        Some(other) => {
            return Err(ScoreError::Validation(format!(
                "mode must be 'positive' or 'negative', got '{other}'"
            ))
            .into())
        }
    };

    let explanation = state.engine().explain(&name, mode)?;
    Ok(Json(SummaryResponse {
        district: explanation.district,
        category: explanation.category,
        summary: explanation.sentence,
    }))
}

pub(crate) async fn district_features_handler<S>(
    State(state): State<ApiState<S>>,
    query: Result<Query<DistrictQuery>, QueryRejection>,
) -> Result<Json<FeatureSnapshot>, AppError>
where
    S: SubmissionLog + 'static,
{
    let name = required_name(query_params(query)?.name)?;
    Ok(Json(state.engine().features(&name)?))
}

fn required_name(name: Option<String>) -> Result<String, ScoreError> {
    name.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ScoreError::Validation("name required".to_string()))
}

pub(crate) async fn top_districts_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<Vec<DistrictCount>>, AppError>
where
    S: SubmissionLog + 'static,
{
    let submissions = state.submissions.submissions()?;
    Ok(Json(top_districts(&submissions, TOP_DISTRICT_REPORT)?))
}

pub(crate) async fn top_categories_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<Vec<WeightTotal>>, AppError>
where
    S: SubmissionLog + 'static,
{
    let submissions = state.submissions.submissions()?;
    Ok(Json(top_weight_keys(&submissions, TOP_CATEGORY_REPORT)?))
}

pub(crate) async fn reload_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: SubmissionLog + 'static,
{
    let table = state.tables.reload_from(&state.data_path)?;
    info!(districts = table.len(), "reload requested over HTTP");
    Ok(Json(json!({ "status": "reloaded", "districts": table.len() })))
}
