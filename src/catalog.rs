//! Catalog integration port: product publication and operator messaging.
//!
//! Everything the runner needs from the product integration: the names of
//! its two progress keys, the TTL it wants on them, the per-item publish
//! call, and the operator-facing status channel.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::SyncItem;

/// Progress-store key for the "sync in progress" flag.
pub const SYNC_IN_PROGRESS_KEY: &str = "PRODUCT_SYNC_IN_PROGRESS";

/// Progress-store key for the "items remaining" counter.
pub const SYNC_REMAINING_KEY: &str = "PRODUCT_SYNC_REMAINING";

/// Default TTL for both progress entries and the in-progress flag refresh.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(300);

/// The product integration consumed by the sync runner.
#[async_trait]
pub trait CatalogIntegration: Send + Sync {
    fn in_progress_key(&self) -> &str {
        SYNC_IN_PROGRESS_KEY
    }

    fn remaining_key(&self) -> &str {
        SYNC_REMAINING_KEY
    }

    /// TTL applied to the progress counters on every task.
    fn sync_timeout(&self) -> Duration {
        DEFAULT_SYNC_TIMEOUT
    }

    /// Publish one product to the external catalog.
    ///
    /// Errors propagate to the queue runtime; the item is not retried.
    async fn publish_product(&self, item: &SyncItem) -> Result<()>;

    /// Show or update the persistent operator status line.
    async fn show_sticky_message(&self, text: &str, persistent: bool);

    /// Remove the persistent status line if one is shown.
    async fn remove_sticky_message(&self);

    /// Post a one-shot informational message.
    async fn show_info_message(&self, text: &str);
}

/// Integration that logs every call via tracing.
///
/// Development and demo backend: "publishes" products by logging them and
/// renders the operator channel as log lines.
#[derive(Default)]
pub struct LogCatalog {
    sync_timeout: Option<Duration>,
}

impl LogCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync_timeout(sync_timeout: Duration) -> Self {
        Self {
            sync_timeout: Some(sync_timeout),
        }
    }
}

#[async_trait]
impl CatalogIntegration for LogCatalog {
    fn sync_timeout(&self) -> Duration {
        self.sync_timeout.unwrap_or(DEFAULT_SYNC_TIMEOUT)
    }

    async fn publish_product(&self, item: &SyncItem) -> Result<()> {
        debug!(item = %item.id, product = %item.product_ref, "publishing product");
        Ok(())
    }

    async fn show_sticky_message(&self, text: &str, persistent: bool) {
        info!(persistent, "status: {text}");
    }

    async fn remove_sticky_message(&self) {
        debug!("status cleared");
    }

    async fn show_info_message(&self, text: &str) {
        info!("{text}");
    }
}
