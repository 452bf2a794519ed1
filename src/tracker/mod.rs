//! User-scoped journal, mood, screening, and share-link records.
//!
//! The service owns validation and ordering; repositories only store rows. Handlers in
//! [`router`] resolve the caller from the `x-user-id` header before touching the service.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod sharing;

#[cfg(test)]
mod tests;

pub use domain::{
    DateRange, EntryId, JournalDraft, JournalEntry, MoodDraft, MoodEntry, ProfileUpdate,
    ScreeningRecord, ShareLink, ShareToken, SharedSnapshot, UserId, UserProfile,
};
pub use memory::InMemoryTrackerRepository;
pub use repository::{RepositoryError, TrackerRepository};
pub use router::{tracker_router, USER_HEADER};
pub use service::{TrackerServiceError, WellnessTrackerService};
pub use sharing::{ShareError, SharePolicy, MAX_SHARE_TTL_HOURS, SNAPSHOT_WINDOW_DAYS};
