use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    DateRange, EntryId, JournalDraft, MoodDraft, ProfileUpdate, ShareToken, UserId,
};
use super::repository::{RepositoryError, TrackerRepository};
use super::service::{TrackerServiceError, WellnessTrackerService};
use super::sharing::ShareError;
use crate::wellness::screening::Instrument;

/// Header carrying the caller's identity.
pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RangeQuery {
    #[serde(default)]
    pub(crate) from: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) to: Option<NaiveDate>,
}

impl From<RangeQuery> for DateRange {
    fn from(query: RangeQuery) -> Self {
        DateRange::new(query.from, query.to)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScreeningQuery {
    #[serde(default)]
    pub(crate) instrument: Option<Instrument>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScreeningSubmission {
    pub(crate) instrument: Instrument,
    pub(crate) answers: Vec<serde_json::Number>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShareRequest {
    #[serde(default)]
    pub(crate) ttl_hours: Option<i64>,
}

/// Router builder exposing the user-scoped tracker endpoints.
pub fn tracker_router<R>(service: Arc<WellnessTrackerService<R>>) -> Router
where
    R: TrackerRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/profile",
            get(profile_handler::<R>).put(upsert_profile_handler::<R>),
        )
        .route(
            "/api/v1/journal",
            get(list_journal_handler::<R>).post(create_journal_handler::<R>),
        )
        .route(
            "/api/v1/journal/:entry_id",
            put(update_journal_handler::<R>).delete(delete_journal_handler::<R>),
        )
        .route(
            "/api/v1/moods",
            get(list_moods_handler::<R>).post(record_mood_handler::<R>),
        )
        .route("/api/v1/moods/clusters", get(mood_clusters_handler::<R>))
        .route(
            "/api/v1/screenings",
            get(list_screenings_handler::<R>).post(record_screening_handler::<R>),
        )
        .route("/api/v1/shares", post(issue_share_handler::<R>))
        .route("/api/v1/shares/:token", delete(revoke_share_handler::<R>))
        .route("/api/v1/shared/:token", get(open_share_handler::<R>))
        .with_state(service)
}

/// Resolve the caller from the auth header, or build the 401 response.
pub(crate) fn authenticated_user(headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
        .ok_or_else(|| {
            let payload = json!({ "error": format!("missing {USER_HEADER} header") });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        })
}

/// Malformed bodies and query strings are client errors with the usual JSON error shape.
pub(crate) fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn error_response(error: TrackerServiceError) -> Response {
    let status = match &error {
        TrackerServiceError::Screening(_)
        | TrackerServiceError::Mood(_)
        | TrackerServiceError::Validation(_)
        | TrackerServiceError::Share(ShareError::InvalidTtl { .. }) => StatusCode::BAD_REQUEST,
        TrackerServiceError::Share(ShareError::Expired { .. } | ShareError::Revoked) => {
            StatusCode::GONE
        }
        TrackerServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TrackerServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        TrackerServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.profile(&user) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upsert_profile_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.upsert_profile(&user, update, Utc::now()) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_journal_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.journal(&user) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_journal_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    payload: Result<Json<JournalDraft>, JsonRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.create_journal(&user, draft, Utc::now()) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_journal_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    Path(entry_id): Path<String>,
    payload: Result<Json<JournalDraft>, JsonRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.update_journal(&user, &EntryId(entry_id), draft, Utc::now()) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_journal_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    Path(entry_id): Path<String>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.delete_journal(&user, &EntryId(entry_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_moods_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Query(range) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.moods(&user, range.into()) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_mood_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    payload: Result<Json<MoodDraft>, JsonRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.record_mood(&user, draft, Utc::now()) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn mood_clusters_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Query(range) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.mood_clusters(&user, range.into()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_screenings_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    query: Result<Query<ScreeningQuery>, QueryRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.screenings(&user, query.instrument) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_screening_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    payload: Result<Json<ScreeningSubmission>, JsonRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.record_screening(
        &user,
        submission.instrument,
        &submission.answers,
        Utc::now(),
    ) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn issue_share_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    // A bare POST without a JSON body falls back to the default lifetime.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => ShareRequest::default(),
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match service.issue_share(&user, request.ttl_hours, Utc::now()) {
        Ok(link) => (StatusCode::CREATED, Json(link)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn revoke_share_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let user = match authenticated_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.revoke_share(&user, &ShareToken(token)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_share_handler<R>(
    State(service): State<Arc<WellnessTrackerService<R>>>,
    Path(token): Path<String>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    match service.open_share(&ShareToken(token), Utc::now()) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}
