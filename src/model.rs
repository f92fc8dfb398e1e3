//! Core data model.
//!
//! A sync item is one product awaiting publication to the external catalog.
//! The runner treats its payload as opaque; only the integration that
//! publishes the product interprets it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Sync Item
// ---------------------------------------------------------------------------

/// One product-synchronization job in the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncItem {
    /// Unique identifier.
    pub id: SyncItemId,

    /// Merchant product reference (SKU or equivalent). Used for logging and
    /// error reporting; the catalog integration decides what it means.
    pub product_ref: String,

    /// Arbitrary payload for the catalog integration. The runner doesn't
    /// interpret this.
    pub payload: serde_json::Value,

    pub enqueued_at: DateTime<Utc>,
}

impl SyncItem {
    pub fn new(product_ref: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: SyncItemId::new(),
            product_ref: product_ref.into(),
            payload,
            enqueued_at: Utc::now(),
        }
    }
}

/// Newtype for sync item IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncItemId(pub Uuid);

impl SyncItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SyncItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for SyncItemId {
    fn default() -> Self {
        Self::new()
    }
}
