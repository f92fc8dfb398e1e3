//! Progress store port: TTL-bounded counters and flags.
//!
//! The sync runner publishes two entries through this port: the
//! "sync in progress" flag and the "items remaining" counter. The contract
//! has no error channel; an implementation wrapping a fallible store owns
//! its own failure handling, and readers treat absence as the default.

pub mod memory;

pub use memory::MemoryProgressStore;

use std::time::Duration;

use async_trait::async_trait;

/// Key-value counter store with per-entry expiry.
///
/// An expired entry is indistinguishable from an absent one.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Read a counter. Absent or expired keys yield `None`.
    async fn get(&self, key: &str) -> Option<i64>;

    /// Write a counter with a bounded lifetime. Overwrites any existing
    /// entry and restarts its TTL.
    async fn set(&self, key: &str, value: i64, ttl: Duration);

    /// Delete a counter. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str);
}
