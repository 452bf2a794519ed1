use crate::infra::AppState;
use althos::error::AppError;
use althos::tracker::{tracker_router, TrackerRepository, WellnessTrackerService};
use althos::wellness::mood::{MoodClusterReport, MoodClusterer, MoodSample};
use althos::wellness::screening::{AnswerSet, Instrument, ScoreEngine, ScoreResult};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) instrument: Instrument,
    pub(crate) answers: Vec<serde_json::Number>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterRequest {
    #[serde(default)]
    pub(crate) samples: Vec<MoodSample>,
}

pub(crate) fn with_service_routes<R>(service: Arc<WellnessTrackerService<R>>) -> axum::Router
where
    R: TrackerRepository + 'static,
{
    tracker_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/screening/score",
            axum::routing::post(score_endpoint),
        )
        .route(
            "/api/v1/mood/clusters",
            axum::routing::post(cluster_endpoint),
        )
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

pub(crate) async fn score_endpoint(
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResult>, AppError> {
    let Json(payload) = payload?;
    let set = AnswerSet::from_numbers(payload.instrument, &payload.answers)?;
    Ok(Json(ScoreEngine::score_set(&set)))
}

pub(crate) async fn cluster_endpoint(
    payload: Result<Json<ClusterRequest>, JsonRejection>,
) -> Result<Json<MoodClusterReport>, AppError> {
    let Json(payload) = payload?;
    for sample in &payload.samples {
        sample.validate()?;
    }
    Ok(Json(MoodClusterer::report(&payload.samples)))
}
