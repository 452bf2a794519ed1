use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    DateRange, EntryId, JournalEntry, MoodEntry, ScreeningRecord, ShareLink, ShareToken, UserId,
    UserProfile,
};
use super::repository::{RepositoryError, TrackerRepository};
use crate::wellness::screening::Instrument;

/// Process-local repository backed by mutex-guarded collections.
#[derive(Default, Clone)]
pub struct InMemoryTrackerRepository {
    store: Arc<Mutex<MemoryStore>>,
}

#[derive(Default)]
struct MemoryStore {
    profiles: HashMap<UserId, UserProfile>,
    journal: Vec<JournalEntry>,
    moods: Vec<MoodEntry>,
    screenings: Vec<ScreeningRecord>,
    shares: HashMap<ShareToken, ShareLink>,
}

impl InMemoryTrackerRepository {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryStore>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("tracker store mutex poisoned".to_string()))
    }
}

impl TrackerRepository for InMemoryTrackerRepository {
    fn upsert_profile(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut guard = self.lock()?;
        guard
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch_profile(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.lock()?.profiles.get(user).cloned())
    }

    fn insert_journal(&self, entry: JournalEntry) -> Result<JournalEntry, RepositoryError> {
        let mut guard = self.lock()?;
        if guard
            .journal
            .iter()
            .any(|existing| existing.entry_id == entry.entry_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.journal.push(entry.clone());
        Ok(entry)
    }

    fn update_journal(&self, entry: JournalEntry) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard
            .journal
            .iter_mut()
            .find(|existing| existing.entry_id == entry.entry_id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = entry;
        Ok(())
    }

    fn fetch_journal(&self, id: &EntryId) -> Result<Option<JournalEntry>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .journal
            .iter()
            .find(|entry| &entry.entry_id == id)
            .cloned())
    }

    fn delete_journal(&self, id: &EntryId) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let before = guard.journal.len();
        guard.journal.retain(|entry| &entry.entry_id != id);
        if guard.journal.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn journal_for(&self, user: &UserId) -> Result<Vec<JournalEntry>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .journal
            .iter()
            .filter(|entry| &entry.user_id == user)
            .cloned()
            .collect())
    }

    fn insert_mood(&self, entry: MoodEntry) -> Result<MoodEntry, RepositoryError> {
        let mut guard = self.lock()?;
        if guard
            .moods
            .iter()
            .any(|existing| existing.entry_id == entry.entry_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.moods.push(entry.clone());
        Ok(entry)
    }

    fn moods_for(
        &self,
        user: &UserId,
        range: DateRange,
    ) -> Result<Vec<MoodEntry>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .moods
            .iter()
            .filter(|entry| &entry.user_id == user && range.contains(entry.sample.date))
            .cloned()
            .collect())
    }

    fn insert_screening(
        &self,
        record: ScreeningRecord,
    ) -> Result<ScreeningRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard
            .screenings
            .iter()
            .any(|existing| existing.record_id == record.record_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.screenings.push(record.clone());
        Ok(record)
    }

    fn screenings_for(
        &self,
        user: &UserId,
        instrument: Option<Instrument>,
    ) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .screenings
            .iter()
            .filter(|record| &record.user_id == user)
            .filter(|record| instrument.map_or(true, |wanted| record.result.instrument == wanted))
            .cloned()
            .collect())
    }

    fn insert_share(&self, link: ShareLink) -> Result<ShareLink, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.shares.contains_key(&link.token) {
            return Err(RepositoryError::Conflict);
        }
        guard.shares.insert(link.token.clone(), link.clone());
        Ok(link)
    }

    fn update_share_with<F, E>(&self, token: &ShareToken, apply: F) -> Result<ShareLink, E>
    where
        F: FnOnce(&ShareLink) -> Result<ShareLink, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.lock()?;
        let slot = guard
            .shares
            .get_mut(token)
            .ok_or(RepositoryError::NotFound)?;
        let updated = apply(slot)?;
        *slot = updated.clone();
        Ok(updated)
    }

    fn fetch_share(&self, token: &ShareToken) -> Result<Option<ShareLink>, RepositoryError> {
        Ok(self.lock()?.shares.get(token).cloned())
    }
}
