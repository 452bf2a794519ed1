use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::wellness::mood::{MoodClusterReport, MoodSample};
use crate::wellness::screening::ScoreResult;

/// Identifier supplied by the auth header; opaque to the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for journal, mood, and screening rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

/// Random token granting read access to a user's recent history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareToken(pub String);

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub locale: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub entry_id: EntryId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-provided journal content for create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub entry_id: EntryId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub sample: MoodSample,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDraft {
    #[serde(flatten)]
    pub sample: MoodSample,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningRecord {
    pub record_id: EntryId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub answers: Vec<u8>,
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub token: ShareToken,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub access_count: u32,
    pub revoked: bool,
}

impl ShareLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Inclusive calendar-day window; open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Read-only view handed to whoever opens a share link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub expires_at: DateTime<Utc>,
    pub moods: Vec<MoodEntry>,
    pub mood_clusters: MoodClusterReport,
    pub screenings: Vec<ScreeningRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_is_inclusive_at_both_ends() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid");
        let end = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid");
        let range = DateRange::new(Some(start), Some(end));

        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end.succ_opt().expect("valid")));
        assert!(!range.contains(start.pred_opt().expect("valid")));
        assert!(DateRange::default().contains(start));
    }

    #[test]
    fn screening_records_serialize_in_camel_case() {
        let taken_at = DateTime::parse_from_rfc3339("2025-03-01T08:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let record = ScreeningRecord {
            record_id: EntryId("scr-000001".to_string()),
            user_id: UserId("alice".to_string()),
            result: crate::wellness::screening::ScoreEngine::score(
                crate::wellness::screening::Instrument::Gad7,
                &[1, 1, 1, 1, 1, 0, 0],
            )
            .expect("valid answers"),
            answers: vec![1, 1, 1, 1, 1, 0, 0],
            taken_at,
        };

        let payload = serde_json::to_value(&record).expect("serializes");
        let mut keys: Vec<&str> = payload
            .as_object()
            .expect("object payload")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "answers",
                "instrument",
                "recordId",
                "severity",
                "severityLabel",
                "takenAt",
                "total",
                "userId"
            ]
        );
    }
}
