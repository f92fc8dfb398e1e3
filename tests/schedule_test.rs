//! Tests for the interval scheduler: registration, firing offset, cancel.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use catsync_rs::schedule::{IntervalScheduler, ScheduledJob, Scheduler};

#[derive(Default)]
struct CountJob {
    ticks: AtomicUsize,
}

#[async_trait]
impl ScheduledJob for CountJob {
    async fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }
}

const EVERY: Duration = Duration::from_secs(10);

#[tokio::test]
async fn register_query_cancel() {
    let scheduler = IntervalScheduler::new();
    assert!(!scheduler.is_registered("healthcheck").await);

    scheduler
        .register("healthcheck", EVERY, Arc::new(CountJob::default()))
        .await;
    assert!(scheduler.is_registered("healthcheck").await);

    scheduler.cancel("healthcheck").await;
    assert!(!scheduler.is_registered("healthcheck").await);

    // Cancelling again is a no-op
    scheduler.cancel("healthcheck").await;
}

#[tokio::test(start_paused = true)]
async fn first_fire_is_one_full_interval_after_registration() {
    let scheduler = IntervalScheduler::new();
    let job = Arc::new(CountJob::default());
    scheduler.register("healthcheck", EVERY, Arc::clone(&job) as _).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(job.ticks.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(job.ticks.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(job.ticks.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn registering_an_existing_name_is_a_noop() {
    let scheduler = IntervalScheduler::new();
    let first = Arc::new(CountJob::default());
    let second = Arc::new(CountJob::default());

    scheduler.register("healthcheck", EVERY, Arc::clone(&first) as _).await;
    scheduler.register("healthcheck", EVERY, Arc::clone(&second) as _).await;

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(first.ticks.load(Ordering::SeqCst), 1);
    assert_eq!(second.ticks.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_future_fires() {
    let scheduler = IntervalScheduler::new();
    let job = Arc::new(CountJob::default());
    scheduler.register("healthcheck", EVERY, Arc::clone(&job) as _).await;

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(job.ticks.load(Ordering::SeqCst), 1);

    scheduler.cancel("healthcheck").await;
    tokio::time::sleep(Duration::from_secs(40)).await;
    assert_eq!(job.ticks.load(Ordering::SeqCst), 1);
}
