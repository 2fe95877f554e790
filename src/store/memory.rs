//! In-process expiring store backed by a concurrent map.

use super::KeyValueStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Stored value with its expiration time
#[derive(Clone, Debug)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Expiring key-value store held in memory.
///
/// Expired entries are invisible to readers immediately and are physically
/// removed either on the next read of that key or by [`run_store_cleanup`].
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }

    /// Number of entries currently held, expired or not (for debugging/monitoring)
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| anyhow!("TTL of {} seconds is out of range", ttl_seconds))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow!("TTL of {} seconds overflows the expiry time", ttl_seconds))?;
        let entry = Entry {
            value: value.to_string(),
            expires_at,
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }

        // Lazily evict, but only if nobody refreshed the key in the meantime
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        Ok(self
            .entries
            .remove(key)
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.value))
    }

    async fn take_if(
        &self,
        key: &str,
        predicate: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<Option<String>> {
        let now = Utc::now();
        Ok(self
            .entries
            .remove_if(key, |_, entry| !entry.is_expired(now) && predicate(entry.value.as_str()))
            .map(|(_, entry)| entry.value))
    }
}

/// Background task to periodically sweep expired entries
pub async fn run_store_cleanup(store: MemoryStore, interval_seconds: u64) {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        store.cleanup_expired();
        tracing::debug!(remaining = store.count(), "Store cleanup complete");
    }
}
