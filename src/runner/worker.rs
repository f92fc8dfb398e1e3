//! Per-item task execution and queue-drain completion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::FLOW;
use crate::catalog::CatalogIntegration;
use crate::error::Result;
use crate::model::SyncItem;
use crate::queue::{QueueRuntime, QueueWorker};
use crate::store::ProgressStore;

/// The consumer half of a sync pass: one [`task`](QueueWorker::task) call
/// per product, one [`complete`](QueueWorker::complete) call at drain.
pub struct SyncWorker {
    runtime: Arc<dyn QueueRuntime>,
    store: Arc<dyn ProgressStore>,
    catalog: Arc<dyn CatalogIntegration>,
}

impl SyncWorker {
    pub fn new(
        runtime: Arc<dyn QueueRuntime>,
        store: Arc<dyn ProgressStore>,
        catalog: Arc<dyn CatalogIntegration>,
    ) -> Self {
        Self {
            runtime,
            store,
            catalog,
        }
    }
}

#[async_trait]
impl QueueWorker for SyncWorker {
    async fn task(&self, item: SyncItem) -> Result<()> {
        let remaining = self
            .store
            .get(self.catalog.remaining_key())
            .await
            .unwrap_or(0);

        // The count shown is the pre-decrement value, so the message for the
        // last item reads "remaining: 1". Long-standing display quirk, kept.
        self.catalog
            .show_sticky_message(
                &format!("Background syncing products... Products remaining: {remaining}"),
                true,
            )
            .await;

        // Publish failures are the integration's concern. The `?` hands the
        // error to the queue runtime, which drops the item without retry;
        // the counter and flag updates below are skipped in that case.
        self.catalog.publish_product(&item).await?;

        let ttl = self.catalog.sync_timeout();
        self.store
            .set(self.catalog.in_progress_key(), 1, ttl)
            .await;
        // Not clamped at zero: get_item_count() clamps on read.
        self.store
            .set(self.catalog.remaining_key(), remaining - 1, ttl)
            .await;

        debug!(flow = FLOW, step = "task", item = %item.id, product = %item.product_ref, remaining = remaining - 1, "product synced");
        Ok(())
    }

    async fn complete(&self) -> Result<()> {
        let in_progress_key = self.catalog.in_progress_key();
        let remaining_key = self.catalog.remaining_key();

        // Whether this pass actually ran anything decides the operator
        // notification below; the deletes themselves are no-ops on absent
        // keys, so a repeated complete() only skips the message.
        let had_progress = self.store.get(in_progress_key).await.is_some()
            || self.store.get(remaining_key).await.is_some();

        self.store.delete(in_progress_key).await;
        self.store.delete(remaining_key).await;

        debug!(flow = FLOW, step = "complete", "product sync queue drained");

        if had_progress {
            self.catalog.remove_sticky_message().await;
            self.catalog
                .show_info_message("Product synchronization complete.")
                .await;
        }

        // Base cleanup belongs to the queue runtime and is never skipped.
        self.runtime.complete().await
    }
}
