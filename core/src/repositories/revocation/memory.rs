//! In-process implementation of the revocation store
//!
//! Honors entry TTLs against an injectable [`Clock`], so tests can fast-forward
//! time and watch entries lapse. Also used for single-process development.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::errors::StoreError;

use super::r#trait::RevocationStore;

#[derive(Debug, Clone)]
struct Entry {
    subject_id: String,
    expires_at: DateTime<Utc>,
}

/// Revocation store kept in memory
pub struct InMemoryRevocationStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
    fail_puts: AtomicBool,
    fail_gets: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryRevocationStore {
    /// Create a store driven by the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store driven by the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
            fail_puts: AtomicBool::new(false),
            fail_gets: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `put` fail as if the store were down
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get` fail as if the store were down
    pub fn set_fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail as if the store were down
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of entries that have not expired yet
    pub async fn live_count(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!("simulated {} failure", operation)));
        }
        Ok(())
    }
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn put(&self, token_id: &str, subject_id: &str, ttl: Duration) -> Result<(), StoreError> {
        Self::check(&self.fail_puts, "put")?;

        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|e| StoreError::unavailable(format!("invalid ttl: {}", e)))?;
        let entry = Entry {
            subject_id: subject_id.to_string(),
            expires_at: self.clock.now() + ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(token_id.to_string(), entry);
        Ok(())
    }

    async fn get(&self, token_id: &str) -> Result<Option<String>, StoreError> {
        Self::check(&self.fail_gets, "get")?;

        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let found = entries
            .get(token_id)
            .map(|entry| (entry.expires_at > now, entry.subject_id.clone()));
        match found {
            Some((true, subject_id)) => Ok(Some(subject_id)),
            Some((false, _)) => {
                entries.remove(token_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, token_id: &str) -> Result<bool, StoreError> {
        Self::check(&self.fail_deletes, "delete")?;

        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(token_id)
            .map(|entry| entry.expires_at > now)
            .unwrap_or(false))
    }
}
