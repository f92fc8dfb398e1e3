//! Scheduler port: named periodic triggers.
//!
//! The runner registers a single health-check trigger through this port and
//! cancels it once the queue is confirmed empty. The scheduled-task
//! subsystem behind the port is an external concern; [`IntervalScheduler`]
//! is the in-process implementation.

pub mod interval;

pub use interval::IntervalScheduler;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Target of a periodic trigger.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn tick(&self);
}

/// Named periodic trigger registry.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Register a trigger firing `job` every `every`, starting one full
    /// interval after registration. Registering an existing name is a no-op.
    async fn register(&self, name: &str, every: Duration, job: Arc<dyn ScheduledJob>);

    /// Whether a trigger with this name is currently registered.
    async fn is_registered(&self, name: &str) -> bool;

    /// Cancel a registered trigger. Unknown names are a no-op. Does not
    /// interrupt a tick already in flight.
    async fn cancel(&self, name: &str);
}
