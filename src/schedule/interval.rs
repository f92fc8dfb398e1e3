//! Tokio-task scheduler implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::{ScheduledJob, Scheduler};

struct Trigger {
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

/// One spawned interval task per registered trigger.
///
/// The first tick fires one full interval after registration, not
/// immediately. Cancellation is graceful: a tick already in flight runs to
/// completion, so a job may cancel its own trigger (the empty-queue health
/// check does exactly that) and still finish its work.
#[derive(Default)]
pub struct IntervalScheduler {
    triggers: tokio::sync::Mutex<HashMap<String, Trigger>>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Scheduler for IntervalScheduler {
    async fn register(&self, name: &str, every: Duration, job: Arc<dyn ScheduledJob>) {
        let mut triggers = self.triggers.lock().await;
        if triggers.contains_key(name) {
            return;
        }

        let shutdown = Arc::new(Notify::new());
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown_rx = Arc::clone(&shutdown);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.notified() => break,
                    _ = ticker.tick() => job.tick().await,
                }
            }
        });

        debug!(trigger = name, every_secs = every.as_secs(), "trigger registered");
        triggers.insert(name.to_string(), Trigger { shutdown, handle });
    }

    async fn is_registered(&self, name: &str) -> bool {
        self.triggers.lock().await.contains_key(name)
    }

    async fn cancel(&self, name: &str) {
        if let Some(trigger) = self.triggers.lock().await.remove(name) {
            trigger.shutdown.notify_one();
            debug!(trigger = name, "trigger cancelled");
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        // get_mut: no tasks can race us during drop
        for trigger in self.triggers.get_mut().values() {
            trigger.handle.abort();
        }
    }
}
