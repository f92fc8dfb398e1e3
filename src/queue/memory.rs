//! In-memory queue runtime for development and tests.
//!
//! A VecDeque holds the items, so a pass consumes them in insertion order.
//! The process lock is a deadline: a worker renews it per item, and a lock
//! whose deadline has elapsed counts as released, which is how a crashed
//! worker gets reclaimed.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{QueueRuntime, QueueWorker};
use crate::error::Result;
use crate::model::SyncItem;

/// Default lifetime of the process lock between renewals.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(60);

struct Inner {
    name: String,
    items: Mutex<VecDeque<SyncItem>>,
    /// `Some(deadline)` in the future means a worker is running. An elapsed
    /// deadline is free for the taking.
    lock: Mutex<Option<Instant>>,
    lock_ttl: Duration,
    /// Items taken off the queue in the current pass. Reset by the base
    /// `complete()` cleanup.
    taken_in_pass: AtomicU64,
}

impl Inner {
    /// Take the process lock if it is free or expired.
    async fn try_acquire_lock(&self) -> bool {
        let mut lock = self.lock.lock().await;
        if matches!(*lock, Some(deadline) if deadline > Instant::now()) {
            return false;
        }
        *lock = Some(Instant::now() + self.lock_ttl);
        true
    }

    async fn renew_lock(&self) {
        *self.lock.lock().await = Some(Instant::now() + self.lock_ttl);
    }

    async fn release_lock(&self) {
        *self.lock.lock().await = None;
    }

    /// Consume items until the queue is empty, then fire the completion
    /// hook and release the lock. Caller must hold the lock.
    async fn drain(&self, worker: Arc<dyn QueueWorker>) {
        loop {
            self.renew_lock().await;
            let item = self.items.lock().await.pop_front();
            let Some(item) = item else { break };
            self.taken_in_pass.fetch_add(1, Ordering::Relaxed);

            let id = item.id;
            if let Err(e) = worker.task(item).await {
                // The item is already off the queue; it is not retried.
                warn!(queue = %self.name, item = %id, error = %e, "task failed, item dropped");
            }
        }

        if let Err(e) = worker.complete().await {
            warn!(queue = %self.name, error = %e, "completion hook failed");
        }
        self.release_lock().await;
    }
}

/// In-memory [`QueueRuntime`].
pub struct MemoryQueueRuntime {
    inner: Arc<Inner>,
}

impl MemoryQueueRuntime {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_lock_ttl(name, DEFAULT_LOCK_TTL)
    }

    pub fn with_lock_ttl(name: impl Into<String>, lock_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                items: Mutex::new(VecDeque::new()),
                lock: Mutex::new(None),
                lock_ttl,
                taken_in_pass: AtomicU64::new(0),
            }),
        }
    }

    /// Items taken off the queue since the last base cleanup. Zero after a
    /// completed pass; a non-zero value after drain means the completion
    /// handler skipped `complete()`.
    pub fn taken_in_pass(&self) -> u64 {
        self.inner.taken_in_pass.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.inner.items.lock().await.len()
    }
}

#[async_trait]
impl QueueRuntime for MemoryQueueRuntime {
    async fn enqueue(&self, item: SyncItem) -> Result<()> {
        debug!(queue = %self.inner.name, item = %item.id, product = %item.product_ref, "enqueued");
        self.inner.items.lock().await.push_back(item);
        Ok(())
    }

    async fn dispatch(&self, worker: Arc<dyn QueueWorker>) -> Result<()> {
        if !self.inner.try_acquire_lock().await {
            debug!(queue = %self.inner.name, "worker already running, dispatch is a no-op");
            return Ok(());
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.drain(worker).await;
        });
        Ok(())
    }

    async fn handle(&self, worker: Arc<dyn QueueWorker>) -> Result<()> {
        if !self.inner.try_acquire_lock().await {
            debug!(queue = %self.inner.name, "worker already running, handle is a no-op");
            return Ok(());
        }

        self.inner.drain(worker).await;
        Ok(())
    }

    async fn is_process_running(&self) -> bool {
        let lock = self.inner.lock.lock().await;
        matches!(*lock, Some(deadline) if deadline > Instant::now())
    }

    async fn is_queue_empty(&self) -> bool {
        self.inner.items.lock().await.is_empty()
    }

    async fn complete(&self) -> Result<()> {
        self.inner.taken_in_pass.store(0, Ordering::Relaxed);
        debug!(queue = %self.inner.name, "batch state cleared");
        Ok(())
    }
}
