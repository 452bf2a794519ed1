use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::tracker::domain::{
    DateRange, EntryId, JournalDraft, JournalEntry, MoodDraft, MoodEntry, ScreeningRecord,
    ShareLink, ShareToken, UserId, UserProfile,
};
use crate::tracker::memory::InMemoryTrackerRepository;
use crate::tracker::repository::{RepositoryError, TrackerRepository};
use crate::tracker::router::{tracker_router, USER_HEADER};
use crate::tracker::service::WellnessTrackerService;
use crate::tracker::sharing::SharePolicy;
use crate::wellness::mood::MoodSample;
use crate::wellness::screening::Instrument;

pub(super) fn alice() -> UserId {
    UserId("alice".to_string())
}

pub(super) fn bob() -> UserId {
    UserId("bob".to_string())
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn journal_draft(body: &str) -> JournalDraft {
    JournalDraft {
        title: Some("Evening check-in".to_string()),
        body: body.to_string(),
        tags: vec!["sleep".to_string(), "work".to_string()],
    }
}

pub(super) fn mood_draft(valence: f64, date: NaiveDate) -> MoodDraft {
    MoodDraft {
        sample: MoodSample::new(valence, 0.5, date),
        note: None,
    }
}

pub(super) fn numbers(values: &[i64]) -> Vec<serde_json::Number> {
    values.iter().map(|&value| value.into()).collect()
}

pub(super) fn share_policy() -> SharePolicy {
    SharePolicy {
        default_ttl_hours: 24,
        max_ttl_hours: 168,
    }
}

pub(super) fn build_service() -> (
    WellnessTrackerService<InMemoryTrackerRepository>,
    Arc<InMemoryTrackerRepository>,
) {
    let repository = Arc::new(InMemoryTrackerRepository::default());
    let service = WellnessTrackerService::new(repository.clone(), share_policy());
    (service, repository)
}

pub(super) fn router_with_service(
    service: WellnessTrackerService<InMemoryTrackerRepository>,
) -> axum::Router {
    tracker_router(Arc::new(service))
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    user: Option<&UserId>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user.0.as_str());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl TrackerRepository for UnavailableRepository {
    fn upsert_profile(&self, _profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        offline()
    }

    fn fetch_profile(&self, _user: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        offline()
    }

    fn insert_journal(&self, _entry: JournalEntry) -> Result<JournalEntry, RepositoryError> {
        offline()
    }

    fn update_journal(&self, _entry: JournalEntry) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch_journal(&self, _id: &EntryId) -> Result<Option<JournalEntry>, RepositoryError> {
        offline()
    }

    fn delete_journal(&self, _id: &EntryId) -> Result<(), RepositoryError> {
        offline()
    }

    fn journal_for(&self, _user: &UserId) -> Result<Vec<JournalEntry>, RepositoryError> {
        offline()
    }

    fn insert_mood(&self, _entry: MoodEntry) -> Result<MoodEntry, RepositoryError> {
        offline()
    }

    fn moods_for(
        &self,
        _user: &UserId,
        _range: DateRange,
    ) -> Result<Vec<MoodEntry>, RepositoryError> {
        offline()
    }

    fn insert_screening(
        &self,
        _record: ScreeningRecord,
    ) -> Result<ScreeningRecord, RepositoryError> {
        offline()
    }

    fn screenings_for(
        &self,
        _user: &UserId,
        _instrument: Option<Instrument>,
    ) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        offline()
    }

    fn insert_share(&self, _link: ShareLink) -> Result<ShareLink, RepositoryError> {
        offline()
    }

    fn update_share_with<F, E>(&self, _token: &ShareToken, _apply: F) -> Result<ShareLink, E>
    where
        F: FnOnce(&ShareLink) -> Result<ShareLink, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn fetch_share(&self, _token: &ShareToken) -> Result<Option<ShareLink>, RepositoryError> {
        offline()
    }
}

/// Delegates to the in-memory store, but lands an owner revocation just before
/// the next share update commits.
pub(super) struct RevokeBeforeUpdate {
    pub(super) inner: InMemoryTrackerRepository,
}

impl TrackerRepository for RevokeBeforeUpdate {
    fn upsert_profile(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        self.inner.upsert_profile(profile)
    }

    fn fetch_profile(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        self.inner.fetch_profile(user)
    }

    fn insert_journal(&self, entry: JournalEntry) -> Result<JournalEntry, RepositoryError> {
        self.inner.insert_journal(entry)
    }

    fn update_journal(&self, entry: JournalEntry) -> Result<(), RepositoryError> {
        self.inner.update_journal(entry)
    }

    fn fetch_journal(&self, id: &EntryId) -> Result<Option<JournalEntry>, RepositoryError> {
        self.inner.fetch_journal(id)
    }

    fn delete_journal(&self, id: &EntryId) -> Result<(), RepositoryError> {
        self.inner.delete_journal(id)
    }

    fn journal_for(&self, user: &UserId) -> Result<Vec<JournalEntry>, RepositoryError> {
        self.inner.journal_for(user)
    }

    fn insert_mood(&self, entry: MoodEntry) -> Result<MoodEntry, RepositoryError> {
        self.inner.insert_mood(entry)
    }

    fn moods_for(
        &self,
        user: &UserId,
        range: DateRange,
    ) -> Result<Vec<MoodEntry>, RepositoryError> {
        self.inner.moods_for(user, range)
    }

    fn insert_screening(
        &self,
        record: ScreeningRecord,
    ) -> Result<ScreeningRecord, RepositoryError> {
        self.inner.insert_screening(record)
    }

    fn screenings_for(
        &self,
        user: &UserId,
        instrument: Option<Instrument>,
    ) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        self.inner.screenings_for(user, instrument)
    }

    fn insert_share(&self, link: ShareLink) -> Result<ShareLink, RepositoryError> {
        self.inner.insert_share(link)
    }

    fn update_share_with<F, E>(&self, token: &ShareToken, apply: F) -> Result<ShareLink, E>
    where
        F: FnOnce(&ShareLink) -> Result<ShareLink, E>,
        E: From<RepositoryError>,
    {
        self.inner
            .update_share_with(token, |link| -> Result<ShareLink, RepositoryError> {
                Ok(ShareLink {
                    revoked: true,
                    ..link.clone()
                })
            })?;
        self.inner.update_share_with(token, apply)
    }

    fn fetch_share(&self, token: &ShareToken) -> Result<Option<ShareLink>, RepositoryError> {
        self.inner.fetch_share(token)
    }
}
