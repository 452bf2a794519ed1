use std::sync::Arc;
use std::thread;

use super::common::*;
use chrono::Duration;

use crate::tracker::domain::{ProfileUpdate, ShareToken};
use crate::tracker::memory::InMemoryTrackerRepository;
use crate::tracker::repository::{RepositoryError, TrackerRepository};
use crate::tracker::service::{TrackerServiceError, WellnessTrackerService};
use crate::tracker::sharing::{ShareError, SharePolicy, MAX_SHARE_TTL_HOURS};
use crate::wellness::screening::Instrument;

#[test]
fn issue_share_applies_policy_bounds() {
    let (service, _) = build_service();

    let link = service
        .issue_share(&alice(), None, now())
        .expect("default ttl");
    assert_eq!(link.expires_at, now() + Duration::hours(24));
    assert_eq!(link.user_id, alice());

    let too_long = service
        .issue_share(&alice(), Some(169), now())
        .unwrap_err();
    assert!(matches!(
        too_long,
        TrackerServiceError::Share(ShareError::InvalidTtl { max: 168, .. })
    ));
}

#[test]
fn open_share_counts_accesses_and_exposes_recent_history() {
    let (service, repository) = build_service();
    service
        .upsert_profile(
            &alice(),
            ProfileUpdate {
                display_name: "Alice".to_string(),
                locale: None,
            },
            now(),
        )
        .expect("profile");
    service
        .record_mood(&alice(), mood_draft(-1.2, day(6, 10)), now())
        .expect("recent mood");
    service
        .record_mood(&alice(), mood_draft(1.0, day(4, 1)), now())
        .expect("old mood");
    service
        .record_mood(&bob(), mood_draft(1.0, day(6, 10)), now())
        .expect("other user's mood");
    service
        .record_screening(
            &alice(),
            Instrument::Gad7,
            &numbers(&[1, 1, 1, 1, 1, 0, 0]),
            now() - Duration::days(3),
        )
        .expect("screening");

    let link = service
        .issue_share(&alice(), Some(48), now())
        .expect("share issued");

    let snapshot = service
        .open_share(&link.token, now() + Duration::hours(1))
        .expect("share opens");
    assert_eq!(snapshot.display_name.as_deref(), Some("Alice"));
    assert_eq!(snapshot.window_end, day(6, 15));
    assert_eq!(snapshot.window_start, day(5, 17));
    assert_eq!(snapshot.moods.len(), 1);
    assert_eq!(snapshot.moods[0].sample.date, day(6, 10));
    assert_eq!(snapshot.mood_clusters.clusters.len(), 1);
    assert_eq!(snapshot.mood_clusters.clusters[0].id, 0);
    assert_eq!(snapshot.screenings.len(), 1);
    assert_eq!(snapshot.expires_at, link.expires_at);

    service
        .open_share(&link.token, now() + Duration::hours(2))
        .expect("share opens again");
    let stored = repository
        .fetch_share(&link.token)
        .expect("fetch")
        .expect("link stored");
    assert_eq!(stored.access_count, 2);
}

#[test]
fn expired_share_is_gone_and_not_counted() {
    let (service, repository) = build_service();
    let link = service
        .issue_share(&alice(), Some(1), now())
        .expect("share issued");

    let err = service
        .open_share(&link.token, now() + Duration::hours(1))
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerServiceError::Share(ShareError::Expired { .. })
    ));

    let stored = repository
        .fetch_share(&link.token)
        .expect("fetch")
        .expect("link stored");
    assert_eq!(stored.access_count, 0);
}

#[test]
fn revoke_is_owner_only_and_blocks_access() {
    let (service, _) = build_service();
    let link = service
        .issue_share(&alice(), None, now())
        .expect("share issued");

    assert!(matches!(
        service.revoke_share(&bob(), &link.token),
        Err(TrackerServiceError::Repository(RepositoryError::NotFound))
    ));

    service
        .revoke_share(&alice(), &link.token)
        .expect("owner revokes");
    assert!(matches!(
        service.open_share(&link.token, now()),
        Err(TrackerServiceError::Share(ShareError::Revoked))
    ));
}

#[test]
fn unknown_token_is_not_found() {
    let (service, _) = build_service();
    let err = service
        .open_share(&ShareToken("nope".to_string()), now())
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn snapshot_window_spans_thirty_calendar_days() {
    let (service, _) = build_service();
    for date in [day(5, 16), day(5, 17), day(6, 15)] {
        service
            .record_mood(&alice(), mood_draft(0.0, date), now())
            .expect("mood recorded");
    }
    let link = service
        .issue_share(&alice(), None, now())
        .expect("share issued");

    let snapshot = service.open_share(&link.token, now()).expect("share opens");
    let days = (snapshot.window_end - snapshot.window_start).num_days() + 1;
    assert_eq!(days, 30);
    let dates: Vec<_> = snapshot.moods.iter().map(|entry| entry.sample.date).collect();
    assert_eq!(dates, vec![day(5, 17), day(6, 15)]);
}

#[test]
fn revocation_landing_before_the_access_write_is_kept() {
    let inner = InMemoryTrackerRepository::default();
    let repository = Arc::new(RevokeBeforeUpdate {
        inner: inner.clone(),
    });
    let service = WellnessTrackerService::new(repository, share_policy());
    let link = service
        .issue_share(&alice(), None, now())
        .expect("share issued");

    let err = service.open_share(&link.token, now()).unwrap_err();
    assert!(matches!(
        err,
        TrackerServiceError::Share(ShareError::Revoked)
    ));

    let stored = inner
        .fetch_share(&link.token)
        .expect("fetch")
        .expect("link stored");
    assert!(stored.revoked);
    assert_eq!(stored.access_count, 0);
}

#[test]
fn concurrent_opens_are_each_counted_once() {
    const THREADS: u32 = 8;
    const OPENS_PER_THREAD: u32 = 50;

    let (service, repository) = build_service();
    let link = service
        .issue_share(&alice(), None, now())
        .expect("share issued");

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..OPENS_PER_THREAD {
                    service
                        .open_share(&link.token, now())
                        .expect("share opens");
                }
            });
        }
    });

    let stored = repository
        .fetch_share(&link.token)
        .expect("fetch")
        .expect("link stored");
    assert_eq!(stored.access_count, THREADS * OPENS_PER_THREAD);
}

#[test]
fn huge_ttl_is_rejected_instead_of_overflowing() {
    let repository = Arc::new(InMemoryTrackerRepository::default());
    let service = WellnessTrackerService::new(
        repository,
        SharePolicy {
            default_ttl_hours: 24,
            max_ttl_hours: i64::MAX,
        },
    );

    let err = service
        .issue_share(&alice(), Some(i64::MAX / 2), now())
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerServiceError::Share(ShareError::InvalidTtl {
            max: MAX_SHARE_TTL_HOURS,
            ..
        })
    ));
}
