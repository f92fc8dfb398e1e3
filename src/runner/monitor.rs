//! Periodic health check: detect and repair a stalled or wrongly-idle
//! worker.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::{FLOW, HEALTHCHECK_TRIGGER, SyncWorker};
use crate::catalog::CatalogIntegration;
use crate::error::Result;
use crate::queue::{QueueRuntime, QueueWorker};
use crate::schedule::{ScheduledJob, Scheduler};
use crate::store::ProgressStore;

/// Outcome of one health-check tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// A worker holds the process lock; nothing to do.
    Running,
    /// Queue empty while idle; periodic checks cancelled, stale state cleared.
    Cleared,
    /// Items queued but no worker; a synchronous pass was forced.
    Restarted,
}

/// Reconciles "should be running" vs "is running" on every tick.
///
/// This is the self-healing half of the runner: a crashed worker or a lost
/// dispatch leaves items in the queue with nobody working, and the next
/// tick picks them up.
pub struct HealthMonitor {
    runtime: Arc<dyn QueueRuntime>,
    scheduler: Arc<dyn Scheduler>,
    store: Arc<dyn ProgressStore>,
    catalog: Arc<dyn CatalogIntegration>,
    worker: Arc<SyncWorker>,
}

impl HealthMonitor {
    pub fn new(
        runtime: Arc<dyn QueueRuntime>,
        scheduler: Arc<dyn Scheduler>,
        store: Arc<dyn ProgressStore>,
        catalog: Arc<dyn CatalogIntegration>,
        worker: Arc<SyncWorker>,
    ) -> Self {
        Self {
            runtime,
            scheduler,
            store,
            catalog,
            worker,
        }
    }

    /// Run one reconciliation tick.
    pub async fn check(&self) -> Result<HealthStatus> {
        if self.runtime.is_process_running().await {
            debug!(flow = FLOW, step = "healthcheck", "worker running, nothing to do");
            return Ok(HealthStatus::Running);
        }

        if self.runtime.is_queue_empty().await {
            // Cancellation is graceful, so finishing this tick is safe even
            // though it retires its own trigger.
            self.scheduler.cancel(HEALTHCHECK_TRIGGER).await;
            self.store.delete(self.catalog.remaining_key()).await;
            debug!(flow = FLOW, step = "healthcheck", "queue empty, cleared stale state");
            return Ok(HealthStatus::Cleared);
        }

        // Queue has items but nobody is working: the dispatch was lost or
        // the worker died. Drive a pass right here rather than re-dispatch.
        warn!(flow = FLOW, step = "healthcheck", "idle worker with non-empty queue, restarting");
        let worker = Arc::clone(&self.worker) as Arc<dyn QueueWorker>;
        self.runtime.handle(worker).await?;
        Ok(HealthStatus::Restarted)
    }
}

#[async_trait]
impl ScheduledJob for HealthMonitor {
    async fn tick(&self) {
        if let Err(e) = self.check().await {
            error!(flow = FLOW, step = "healthcheck", error = %e, "health check failed");
        }
    }
}
