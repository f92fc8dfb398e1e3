//! Queue runner: dispatch/locking protocol and cron health checks.
//!
//! [`SyncRunner`] owns the protocol that starts background consumption of
//! the product-sync queue: idempotent dispatch through the queue runtime's
//! process lock, registration of the periodic [`HealthMonitor`], and the
//! read-only status surface (item count, updating/running flags). The
//! consumer half of a pass lives in [`SyncWorker`].

pub mod monitor;
pub mod worker;

pub use monitor::{HealthMonitor, HealthStatus};
pub use worker::SyncWorker;

use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use crate::catalog::CatalogIntegration;
use crate::error::Result;
use crate::model::SyncItem;
use crate::queue::{QueueRuntime, QueueWorker};
use crate::schedule::{ScheduledJob, Scheduler};
use crate::store::ProgressStore;

/// Name of the periodic health-check trigger.
pub const HEALTHCHECK_TRIGGER: &str = "product-sync-healthcheck";

/// Default interval between health-check ticks.
pub const DEFAULT_HEALTHCHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Flow tag carried by every log entry of a sync session, from dispatch
/// failures through completion, so one session can be correlated in logs.
pub(crate) const FLOW: &str = "product-sync";

/// Configuration for the sync runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interval for the periodic health check.
    pub healthcheck_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            healthcheck_interval: DEFAULT_HEALTHCHECK_INTERVAL,
        }
    }
}

/// The product-sync queue runner.
///
/// Holds the queue runtime, scheduler, progress store, and catalog
/// integration by reference, and plugs a [`SyncWorker`] into queue passes.
pub struct SyncRunner {
    runtime: Arc<dyn QueueRuntime>,
    scheduler: Arc<dyn Scheduler>,
    store: Arc<dyn ProgressStore>,
    catalog: Arc<dyn CatalogIntegration>,
    worker: Arc<SyncWorker>,
    monitor: Arc<HealthMonitor>,
    config: RunnerConfig,
}

impl SyncRunner {
    pub fn new(
        runtime: Arc<dyn QueueRuntime>,
        scheduler: Arc<dyn Scheduler>,
        store: Arc<dyn ProgressStore>,
        catalog: Arc<dyn CatalogIntegration>,
        config: RunnerConfig,
    ) -> Self {
        let worker = Arc::new(SyncWorker::new(
            Arc::clone(&runtime),
            Arc::clone(&store),
            Arc::clone(&catalog),
        ));
        let monitor = Arc::new(HealthMonitor::new(
            Arc::clone(&runtime),
            Arc::clone(&scheduler),
            Arc::clone(&store),
            Arc::clone(&catalog),
            Arc::clone(&worker),
        ));
        Self {
            runtime,
            scheduler,
            store,
            catalog,
            worker,
            monitor,
            config,
        }
    }

    /// Enqueue items and bump the remaining counter to match.
    ///
    /// The counter carries the full sync TTL, like every write the task
    /// loop makes. Call [`dispatch`](Self::dispatch) afterwards to start
    /// consuming.
    pub async fn enqueue(&self, items: Vec<SyncItem>) -> Result<()> {
        let added = items.len() as i64;
        for item in items {
            self.runtime.enqueue(item).await?;
        }

        let key = self.catalog.remaining_key();
        let remaining = self.store.get(key).await.unwrap_or(0) + added;
        self.store
            .set(key, remaining, self.catalog.sync_timeout())
            .await;
        Ok(())
    }

    /// Request that a worker begin consuming the queue.
    ///
    /// Idempotent: if a worker is already running, the queue runtime treats
    /// the call as a no-op. A dispatch transport failure is logged and
    /// swallowed; the health check registered here picks the queue up on
    /// its next tick, so the triggering request never fails.
    pub async fn dispatch(&self) {
        if !self.scheduler.is_registered(HEALTHCHECK_TRIGGER).await {
            let job = Arc::clone(&self.monitor) as Arc<dyn ScheduledJob>;
            self.scheduler
                .register(HEALTHCHECK_TRIGGER, self.config.healthcheck_interval, job)
                .await;
        }

        let worker = Arc::clone(&self.worker) as Arc<dyn QueueWorker>;
        if let Err(e) = self.runtime.dispatch(worker).await {
            error!(
                flow = FLOW,
                step = "dispatch",
                error = %e,
                "failed to start sync worker, queue will be picked up by the next health check"
            );
        }
    }

    /// The health monitor, for wiring into an external scheduler directly.
    ///
    /// [`dispatch`](Self::dispatch) registers it on the configured port; use
    /// this when the periodic trigger lives somewhere else entirely.
    pub fn health_monitor(&self) -> Arc<HealthMonitor> {
        Arc::clone(&self.monitor)
    }

    /// Whether a worker currently holds the process lock.
    pub async fn is_running(&self) -> bool {
        self.runtime.is_process_running().await
    }

    /// Last published remaining count; absent or expired reads as 0.
    pub async fn get_item_count(&self) -> u64 {
        let count = self
            .store
            .get(self.catalog.remaining_key())
            .await
            .unwrap_or(0);
        count.max(0) as u64
    }

    /// Whether the queue still holds unprocessed items.
    pub async fn is_updating(&self) -> bool {
        !self.runtime.is_queue_empty().await
    }

    /// One reconciliation tick of "should be running" vs "is running".
    ///
    /// Normally invoked through the scheduler; callable directly to force
    /// a check.
    pub async fn handle_cron_healthcheck(&self) -> Result<HealthStatus> {
        self.monitor.check().await
    }
}
