use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::domain::{
    DateRange, EntryId, JournalDraft, JournalEntry, MoodDraft, MoodEntry, ProfileUpdate,
    ScreeningRecord, ShareLink, ShareToken, SharedSnapshot, UserId, UserProfile,
};
use super::repository::{RepositoryError, TrackerRepository};
use super::sharing::{admit, issue_link, ShareError, SharePolicy, SNAPSHOT_WINDOW_DAYS};
use crate::wellness::mood::{MoodClusterReport, MoodClusterer, MoodError};
use crate::wellness::screening::{AnswerSet, Instrument, ScoreEngine, ScreeningError};

const MAX_TAG_CHARS: usize = 32;
const DEFAULT_LOCALE: &str = "en";

static JOURNAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MOOD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SCREENING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_entry_id(prefix: &str, sequence: &AtomicU64) -> EntryId {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    EntryId(format!("{prefix}-{id:06}"))
}

/// Service composing the repository with the scoring and clustering engines.
pub struct WellnessTrackerService<R> {
    repository: Arc<R>,
    shares: SharePolicy,
}

impl<R> WellnessTrackerService<R>
where
    R: TrackerRepository + 'static,
{
    pub fn new(repository: Arc<R>, shares: SharePolicy) -> Self {
        Self { repository, shares }
    }

    pub fn upsert_profile(
        &self,
        user: &UserId,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, TrackerServiceError> {
        let display_name = update.display_name.trim();
        if display_name.is_empty() {
            return Err(TrackerServiceError::Validation(
                "display_name must not be blank".to_string(),
            ));
        }

        let existing = self.repository.fetch_profile(user)?;
        let locale = update
            .locale
            .map(|locale| locale.trim().to_string())
            .filter(|locale| !locale.is_empty())
            .or_else(|| existing.as_ref().map(|profile| profile.locale.clone()))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let profile = UserProfile {
            user_id: user.clone(),
            display_name: display_name.to_string(),
            locale,
            created_at: existing.map_or(now, |profile| profile.created_at),
            updated_at: now,
        };

        Ok(self.repository.upsert_profile(profile)?)
    }

    pub fn profile(&self, user: &UserId) -> Result<UserProfile, TrackerServiceError> {
        let profile = self
            .repository
            .fetch_profile(user)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(profile)
    }

    pub fn create_journal(
        &self,
        user: &UserId,
        draft: JournalDraft,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, TrackerServiceError> {
        let draft = normalize_draft(draft)?;
        let entry = JournalEntry {
            entry_id: next_entry_id("jrn", &JOURNAL_SEQUENCE),
            user_id: user.clone(),
            title: draft.title,
            body: draft.body,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_journal(entry)?;
        info!(user = %user, entry = %stored.entry_id.0, "journal entry created");
        Ok(stored)
    }

    pub fn update_journal(
        &self,
        user: &UserId,
        entry_id: &EntryId,
        draft: JournalDraft,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, TrackerServiceError> {
        let mut entry = self.owned_journal(user, entry_id)?;
        let draft = normalize_draft(draft)?;

        entry.title = draft.title;
        entry.body = draft.body;
        entry.tags = draft.tags;
        entry.updated_at = now;

        self.repository.update_journal(entry.clone())?;
        Ok(entry)
    }

    pub fn delete_journal(
        &self,
        user: &UserId,
        entry_id: &EntryId,
    ) -> Result<(), TrackerServiceError> {
        self.owned_journal(user, entry_id)?;
        self.repository.delete_journal(entry_id)?;
        info!(user = %user, entry = %entry_id.0, "journal entry deleted");
        Ok(())
    }

    /// Journal entries for a user, newest first.
    pub fn journal(&self, user: &UserId) -> Result<Vec<JournalEntry>, TrackerServiceError> {
        let mut entries = self.repository.journal_for(user)?;
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    pub fn record_mood(
        &self,
        user: &UserId,
        draft: MoodDraft,
        now: DateTime<Utc>,
    ) -> Result<MoodEntry, TrackerServiceError> {
        draft.sample.validate()?;
        let entry = MoodEntry {
            entry_id: next_entry_id("mood", &MOOD_SEQUENCE),
            user_id: user.clone(),
            sample: draft.sample,
            note: draft
                .note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty()),
            recorded_at: now,
        };

        let stored = self.repository.insert_mood(entry)?;
        info!(user = %user, date = %stored.sample.date, "mood recorded");
        Ok(stored)
    }

    /// Mood entries inside the inclusive range, in calendar order.
    pub fn moods(
        &self,
        user: &UserId,
        range: DateRange,
    ) -> Result<Vec<MoodEntry>, TrackerServiceError> {
        let mut entries = self.repository.moods_for(user, range)?;
        entries.sort_by_key(|entry| entry.sample.date);
        Ok(entries)
    }

    pub fn mood_clusters(
        &self,
        user: &UserId,
        range: DateRange,
    ) -> Result<MoodClusterReport, TrackerServiceError> {
        let entries = self.moods(user, range)?;
        let samples: Vec<_> = entries.into_iter().map(|entry| entry.sample).collect();
        Ok(MoodClusterer::report(&samples))
    }

    pub fn record_screening(
        &self,
        user: &UserId,
        instrument: Instrument,
        answers: &[serde_json::Number],
        now: DateTime<Utc>,
    ) -> Result<ScreeningRecord, TrackerServiceError> {
        let set = AnswerSet::from_numbers(instrument, answers)?;
        let result = ScoreEngine::score_set(&set);
        let record = ScreeningRecord {
            record_id: next_entry_id("scr", &SCREENING_SEQUENCE),
            user_id: user.clone(),
            result,
            answers: set.answers().to_vec(),
            taken_at: now,
        };

        let stored = self.repository.insert_screening(record)?;
        info!(
            user = %user,
            instrument = instrument.code(),
            severity = result.severity_label,
            "screening recorded"
        );
        Ok(stored)
    }

    /// Screening history, newest first, optionally limited to one instrument.
    pub fn screenings(
        &self,
        user: &UserId,
        instrument: Option<Instrument>,
    ) -> Result<Vec<ScreeningRecord>, TrackerServiceError> {
        let mut records = self.repository.screenings_for(user, instrument)?;
        records.reverse();
        records.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(records)
    }

    pub fn issue_share(
        &self,
        user: &UserId,
        ttl_hours: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<ShareLink, TrackerServiceError> {
        let expires_at = self.shares.expiry(ttl_hours, now)?;
        let link = self
            .repository
            .insert_share(issue_link(user.clone(), now, expires_at))?;
        info!(user = %user, expires_at = %link.expires_at, "share link issued");
        Ok(link)
    }

    pub fn revoke_share(
        &self,
        user: &UserId,
        token: &ShareToken,
    ) -> Result<(), TrackerServiceError> {
        self.repository
            .update_share_with(token, |link| {
                if &link.user_id != user {
                    return Err(TrackerServiceError::from(RepositoryError::NotFound));
                }
                Ok(ShareLink {
                    revoked: true,
                    ..link.clone()
                })
            })?;
        info!(user = %user, "share link revoked");
        Ok(())
    }

    /// Open a share link, counting the access and returning the recent history it exposes.
    pub fn open_share(
        &self,
        token: &ShareToken,
        now: DateTime<Utc>,
    ) -> Result<SharedSnapshot, TrackerServiceError> {
        let link = self
            .repository
            .update_share_with(token, |link| {
                admit(link, now).map_err(TrackerServiceError::from)
            })?;
        info!(
            user = %link.user_id,
            access_count = link.access_count,
            "share link opened"
        );

        let window_end = now.date_naive();
        let window_start = window_end - Duration::days(SNAPSHOT_WINDOW_DAYS - 1);
        let range = DateRange::new(Some(window_start), Some(window_end));

        let display_name = self
            .repository
            .fetch_profile(&link.user_id)?
            .map(|profile| profile.display_name);
        let moods = self.moods(&link.user_id, range)?;
        let samples: Vec<_> = moods.iter().map(|entry| entry.sample.clone()).collect();
        let screenings = self
            .screenings(&link.user_id, None)?
            .into_iter()
            .filter(|record| range.contains(record.taken_at.date_naive()))
            .collect();

        Ok(SharedSnapshot {
            display_name,
            window_start,
            window_end,
            expires_at: link.expires_at,
            mood_clusters: MoodClusterer::report(&samples),
            moods,
            screenings,
        })
    }

    fn owned_journal(
        &self,
        user: &UserId,
        entry_id: &EntryId,
    ) -> Result<JournalEntry, TrackerServiceError> {
        let entry = self
            .repository
            .fetch_journal(entry_id)?
            .filter(|entry| &entry.user_id == user)
            .ok_or(RepositoryError::NotFound)?;
        Ok(entry)
    }
}

fn normalize_draft(draft: JournalDraft) -> Result<JournalDraft, TrackerServiceError> {
    let body = draft.body.trim();
    if body.is_empty() {
        return Err(TrackerServiceError::Validation(
            "journal body must not be blank".to_string(),
        ));
    }

    let mut tags = Vec::with_capacity(draft.tags.len());
    for tag in draft.tags {
        let tag = tag.trim();
        if tag.is_empty() || tag.chars().count() > MAX_TAG_CHARS {
            return Err(TrackerServiceError::Validation(format!(
                "tags must be between 1 and {MAX_TAG_CHARS} characters"
            )));
        }
        tags.push(tag.to_string());
    }

    Ok(JournalDraft {
        title: draft
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty()),
        body: body.to_string(),
        tags,
    })
}

/// Error raised by the tracker service.
#[derive(Debug, thiserror::Error)]
pub enum TrackerServiceError {
    #[error(transparent)]
    Screening(#[from] ScreeningError),
    #[error(transparent)]
    Mood(#[from] MoodError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
