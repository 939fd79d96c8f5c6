//! Unit tests for the in-memory revocation store

use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::ManualClock;
use crate::errors::StoreError;
use crate::repositories::revocation::{InMemoryRevocationStore, RevocationStore};

fn store_with_clock() -> (InMemoryRevocationStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    (InMemoryRevocationStore::with_clock(clock.clone()), clock)
}

#[tokio::test]
async fn test_put_and_get() {
    let (store, _clock) = store_with_clock();

    store.put("tid-1", "u-42", Duration::from_secs(60)).await.unwrap();

    assert_eq!(store.get("tid-1").await.unwrap(), Some("u-42".to_string()));
    assert_eq!(store.get("tid-2").await.unwrap(), None);
    assert_eq!(store.live_count().await, 1);
}

#[tokio::test]
async fn test_entries_lapse_after_ttl() {
    let (store, clock) = store_with_clock();
    store.put("tid-1", "u-42", Duration::from_secs(60)).await.unwrap();

    clock.advance(ChronoDuration::seconds(59));
    assert!(store.is_live("tid-1", "u-42").await.unwrap());

    clock.advance(ChronoDuration::seconds(1));
    assert_eq!(store.get("tid-1").await.unwrap(), None);
    assert_eq!(store.live_count().await, 0);
}

#[tokio::test]
async fn test_is_live_requires_matching_subject() {
    let (store, _clock) = store_with_clock();
    store.put("tid-1", "u-42", Duration::from_secs(60)).await.unwrap();

    assert!(store.is_live("tid-1", "u-42").await.unwrap());
    assert!(!store.is_live("tid-1", "u-43").await.unwrap());
    assert!(!store.is_live("tid-9", "u-42").await.unwrap());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (store, _clock) = store_with_clock();
    store.put("tid-1", "u-42", Duration::from_secs(60)).await.unwrap();

    assert!(store.delete("tid-1").await.unwrap());
    assert!(!store.delete("tid-1").await.unwrap());
    assert_eq!(store.get("tid-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_of_lapsed_entry_reports_nothing_removed() {
    let (store, clock) = store_with_clock();
    store.put("tid-1", "u-42", Duration::from_secs(10)).await.unwrap();
    clock.advance(ChronoDuration::seconds(30));

    assert!(!store.delete("tid-1").await.unwrap());
}

#[tokio::test]
async fn test_simulated_failures() {
    let (store, _clock) = store_with_clock();

    store.set_fail_puts(true);
    let err = store.put("tid-1", "u-42", Duration::from_secs(60)).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }));

    store.set_fail_puts(false);
    store.put("tid-1", "u-42", Duration::from_secs(60)).await.unwrap();

    store.set_fail_gets(true);
    assert!(store.get("tid-1").await.is_err());
    store.set_fail_gets(false);

    store.set_fail_deletes(true);
    assert!(store.delete("tid-1").await.is_err());
    store.set_fail_deletes(false);
    assert!(store.delete("tid-1").await.unwrap());
}
