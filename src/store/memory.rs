//! In-memory progress store for development and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::ProgressStore;

struct Entry {
    value: i64,
    expires_at: Instant,
}

/// HashMap-backed [`ProgressStore`] with lazy expiry.
///
/// Expired entries are dropped on the next read of their key. Uses
/// `tokio::time::Instant`, so tests with a paused clock can drive expiry
/// deterministically.
#[derive(Default)]
pub struct MemoryProgressStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get(&self, key: &str) -> Option<i64> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: i64, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
