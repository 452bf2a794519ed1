use super::domain::{
    DateRange, EntryId, JournalEntry, MoodEntry, ScreeningRecord, ShareLink, ShareToken, UserId,
    UserProfile,
};
use crate::wellness::screening::Instrument;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Lists come back in insertion order; the service decides presentation order.
pub trait TrackerRepository: Send + Sync {
    fn upsert_profile(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
    fn fetch_profile(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError>;

    fn insert_journal(&self, entry: JournalEntry) -> Result<JournalEntry, RepositoryError>;
    fn update_journal(&self, entry: JournalEntry) -> Result<(), RepositoryError>;
    fn fetch_journal(&self, id: &EntryId) -> Result<Option<JournalEntry>, RepositoryError>;
    fn delete_journal(&self, id: &EntryId) -> Result<(), RepositoryError>;
    fn journal_for(&self, user: &UserId) -> Result<Vec<JournalEntry>, RepositoryError>;

    fn insert_mood(&self, entry: MoodEntry) -> Result<MoodEntry, RepositoryError>;
    fn moods_for(
        &self,
        user: &UserId,
        range: DateRange,
    ) -> Result<Vec<MoodEntry>, RepositoryError>;

    fn insert_screening(
        &self,
        record: ScreeningRecord,
    ) -> Result<ScreeningRecord, RepositoryError>;
    fn screenings_for(
        &self,
        user: &UserId,
        instrument: Option<Instrument>,
    ) -> Result<Vec<ScreeningRecord>, RepositoryError>;

    fn insert_share(&self, link: ShareLink) -> Result<ShareLink, RepositoryError>;
    /// Apply `apply` to the stored link and persist its result as one atomic step.
    ///
    /// Nothing is written when `apply` fails.
    fn update_share_with<F, E>(&self, token: &ShareToken, apply: F) -> Result<ShareLink, E>
    where
        F: FnOnce(&ShareLink) -> Result<ShareLink, E>,
        E: From<RepositoryError>;
    fn fetch_share(&self, token: &ShareToken) -> Result<Option<ShareLink>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
