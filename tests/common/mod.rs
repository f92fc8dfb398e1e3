//! Shared test doubles for the runner's ports.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use catsync_rs::catalog::CatalogIntegration;
use catsync_rs::error::{Error, Result};
use catsync_rs::model::SyncItem;
use catsync_rs::queue::MemoryQueueRuntime;
use catsync_rs::runner::{RunnerConfig, SyncRunner};
use catsync_rs::schedule::IntervalScheduler;
use catsync_rs::store::MemoryProgressStore;
use serde_json::json;

// ---------------------------------------------------------------------------
// Catalog double
// ---------------------------------------------------------------------------

/// One operator-channel interaction, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorMessage {
    Sticky { text: String, persistent: bool },
    StickyRemoved,
    Info(String),
}

/// Catalog integration that records publishes and operator messages.
#[derive(Default)]
pub struct RecordingCatalog {
    published: Mutex<Vec<String>>,
    messages: Mutex<Vec<OperatorMessage>>,
    fail_refs: Mutex<HashSet<String>>,
    hang_refs: Mutex<HashSet<String>>,
    publish_delay: Option<Duration>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every publish (for concurrency tests).
    pub fn with_publish_delay(delay: Duration) -> Self {
        Self {
            publish_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make publishing this product return an error.
    pub fn fail_product(&self, product_ref: &str) {
        self.fail_refs.lock().unwrap().insert(product_ref.to_string());
    }

    /// Make publishing this product hang forever (crashed-worker simulation).
    pub fn hang_product(&self, product_ref: &str) {
        self.hang_refs.lock().unwrap().insert(product_ref.to_string());
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<OperatorMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn sticky_texts(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                OperatorMessage::Sticky { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn info_messages(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                OperatorMessage::Info(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Peak number of concurrent publish calls observed.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogIntegration for RecordingCatalog {
    async fn publish_product(&self, item: &SyncItem) -> Result<()> {
        if self.hang_refs.lock().unwrap().contains(&item.product_ref) {
            std::future::pending::<()>().await;
        }
        if self.fail_refs.lock().unwrap().contains(&item.product_ref) {
            return Err(Error::Publish {
                product_ref: item.product_ref.clone(),
                reason: "simulated API failure".to_string(),
            });
        }

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        if let Some(delay) = self.publish_delay {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        self.published.lock().unwrap().push(item.product_ref.clone());
        Ok(())
    }

    async fn show_sticky_message(&self, text: &str, persistent: bool) {
        self.messages.lock().unwrap().push(OperatorMessage::Sticky {
            text: text.to_string(),
            persistent,
        });
    }

    async fn remove_sticky_message(&self) {
        self.messages.lock().unwrap().push(OperatorMessage::StickyRemoved);
    }

    async fn show_info_message(&self, text: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OperatorMessage::Info(text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Stack builder
// ---------------------------------------------------------------------------

/// Full in-memory stack around a [`SyncRunner`].
pub struct TestStack {
    pub runtime: Arc<MemoryQueueRuntime>,
    pub scheduler: Arc<IntervalScheduler>,
    pub store: Arc<MemoryProgressStore>,
    pub catalog: Arc<RecordingCatalog>,
    pub runner: Arc<SyncRunner>,
}

pub fn stack() -> TestStack {
    stack_with(MemoryQueueRuntime::new("test-sync"), RecordingCatalog::new())
}

pub fn stack_with(runtime: MemoryQueueRuntime, catalog: RecordingCatalog) -> TestStack {
    let runtime = Arc::new(runtime);
    let scheduler = Arc::new(IntervalScheduler::new());
    let store = Arc::new(MemoryProgressStore::new());
    let catalog = Arc::new(catalog);

    let runner = Arc::new(SyncRunner::new(
        Arc::clone(&runtime) as _,
        Arc::clone(&scheduler) as _,
        Arc::clone(&store) as _,
        Arc::clone(&catalog) as _,
        RunnerConfig::default(),
    ));

    TestStack {
        runtime,
        scheduler,
        store,
        catalog,
        runner,
    }
}

pub fn item(product_ref: &str) -> SyncItem {
    SyncItem::new(product_ref, json!({}))
}

pub fn items(n: usize) -> Vec<SyncItem> {
    (0..n).map(|i| item(&format!("SKU-{i:04}"))).collect()
}

/// Poll until the queue is drained and the worker has exited.
pub async fn wait_for_drain(runner: &SyncRunner) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while runner.is_updating().await || runner.is_running().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("queue did not drain in time");
}
