//! Queue runtime port: dispatch and locking over the backing job queue.
//!
//! The backing queue itself (storage, dequeue atomicity, lock expiry) is an
//! external concern. This module defines the capability the sync runner
//! consumes, the consumer half it plugs in, and an in-memory implementation.

pub mod memory;

pub use memory::MemoryQueueRuntime;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::SyncItem;

/// The consumer half of a queue pass: one call per dequeued item, one call
/// when the queue drains.
#[async_trait]
pub trait QueueWorker: Send + Sync {
    /// Process one dequeued item.
    ///
    /// The runtime removes the item before invoking this; an error here is
    /// logged by the runtime and never requeues the item.
    async fn task(&self, item: SyncItem) -> Result<()>;

    /// Called once when a pass ends with the queue empty.
    async fn complete(&self) -> Result<()>;
}

/// Capability contract of the backing queue runtime.
#[async_trait]
pub trait QueueRuntime: Send + Sync {
    /// Append an item to the queue.
    async fn enqueue(&self, item: SyncItem) -> Result<()>;

    /// Start an asynchronous pass over the queue.
    ///
    /// No-op if a worker already holds the process lock. An error means the
    /// out-of-band trigger itself failed, not that any item failed.
    async fn dispatch(&self, worker: Arc<dyn QueueWorker>) -> Result<()>;

    /// Drive a full pass synchronously on the caller's task.
    ///
    /// Same locking rules as [`dispatch`](QueueRuntime::dispatch): no-op if
    /// a worker is already running.
    async fn handle(&self, worker: Arc<dyn QueueWorker>) -> Result<()>;

    /// Whether a worker currently holds the process lock.
    async fn is_process_running(&self) -> bool;

    /// Whether the queue holds no items.
    async fn is_queue_empty(&self) -> bool;

    /// Base cleanup once a pass ends (e.g. delete persisted batch state).
    ///
    /// The worker's completion handler must call this; the runtime does not
    /// invoke it on its own.
    async fn complete(&self) -> Result<()>;
}
