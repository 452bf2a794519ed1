use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::domain::{ShareLink, ShareToken, UserId};

/// Calendar days of history exposed through a share link, ending on the day it is opened.
pub const SNAPSHOT_WINDOW_DAYS: i64 = 30;

/// Hard ceiling on share lifetimes, whatever the configured maximum says.
pub const MAX_SHARE_TTL_HOURS: i64 = 24 * 365;

/// Lifetime bounds for clinician share links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharePolicy {
    pub default_ttl_hours: i64,
    pub max_ttl_hours: i64,
}

impl Default for SharePolicy {
    fn default() -> Self {
        Self {
            default_ttl_hours: 72,
            max_ttl_hours: 720,
        }
    }
}

impl SharePolicy {
    fn effective_max(&self) -> i64 {
        self.max_ttl_hours.min(MAX_SHARE_TTL_HOURS)
    }

    pub fn resolve_ttl(&self, requested_hours: Option<i64>) -> Result<Duration, ShareError> {
        let hours = requested_hours.unwrap_or(self.default_ttl_hours);
        let max = self.effective_max();
        let invalid = || ShareError::InvalidTtl {
            requested: hours,
            max,
        };
        if hours < 1 || hours > max {
            return Err(invalid());
        }
        Duration::try_hours(hours).ok_or_else(invalid)
    }

    /// Expiry instant for a link issued at `now`.
    pub fn expiry(
        &self,
        requested_hours: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ShareError> {
        let ttl = self.resolve_ttl(requested_hours)?;
        now.checked_add_signed(ttl)
            .ok_or_else(|| ShareError::InvalidTtl {
                requested: ttl.num_hours(),
                max: self.effective_max(),
            })
    }
}

pub(crate) fn issue_link(
    user: UserId,
    now: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> ShareLink {
    ShareLink {
        token: ShareToken(Uuid::new_v4().simple().to_string()),
        user_id: user,
        created_at: now,
        expires_at,
        access_count: 0,
        revoked: false,
    }
}

/// Check a link can still be opened and return it with the access recorded.
pub(crate) fn admit(link: &ShareLink, now: DateTime<Utc>) -> Result<ShareLink, ShareError> {
    if link.revoked {
        return Err(ShareError::Revoked);
    }
    if link.is_expired(now) {
        return Err(ShareError::Expired {
            expired_at: link.expires_at,
        });
    }

    let mut admitted = link.clone();
    admitted.access_count = admitted.access_count.saturating_add(1);
    Ok(admitted)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error("share lifetime must be between 1 and {max} hours, received {requested}")]
    InvalidTtl { requested: i64, max: i64 },
    #[error("share link expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
    #[error("share link has been revoked")]
    Revoked,
}
