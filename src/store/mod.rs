//! Transient key-value storage for handshake state and fetched credentials.
//!
//! The integration never keeps state between calls; pending authorizations and
//! exchanged credentials live here under composite `{prefix}:{org_id}:{user_id}`
//! keys, each with an expiration. Any backend offering put/get/delete with a
//! TTL can stand in for [`MemoryStore`].

use anyhow::Result;
use async_trait::async_trait;

mod memory;

pub use memory::{run_store_cleanup, MemoryStore};

/// Expiring key-value store capability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value. The entry
    /// disappears after `ttl_seconds`.
    async fn put(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Read a live value without consuming it.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Read and remove `key` in one step.
    ///
    /// Two concurrent callers never both observe the same value.
    async fn take(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key` only if its live value satisfies `predicate`, returning
    /// the removed value. A rejected or missing entry is left untouched.
    async fn take_if(
        &self,
        key: &str,
        predicate: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<Option<String>>;
}
