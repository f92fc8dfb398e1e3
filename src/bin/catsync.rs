//! catsync CLI: operator interface to the product-sync runner.

use std::sync::Arc;
use std::time::Duration;

use catsync_rs::catalog::LogCatalog;
use catsync_rs::config::Config;
use catsync_rs::model::SyncItem;
use catsync_rs::queue::MemoryQueueRuntime;
use catsync_rs::runner::{HealthStatus, RunnerConfig, SyncRunner};
use catsync_rs::schedule::IntervalScheduler;
use catsync_rs::store::MemoryProgressStore;
use catsync_rs::telemetry::init_tracing;
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "catsync", about = "Background product-sync queue runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enqueue demo products and run a sync session to completion
    Run {
        /// Number of demo products to enqueue
        #[arg(long, default_value_t = 25)]
        items: usize,
        /// Give up if the queue has not drained after this many seconds
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.log_level)?;

    match cli.command {
        Command::Run {
            items,
            timeout_secs,
        } => cmd_run(&config, items, Duration::from_secs(timeout_secs)).await,
    }
}

async fn cmd_run(config: &Config, items: usize, timeout: Duration) -> anyhow::Result<()> {
    let runtime = Arc::new(MemoryQueueRuntime::new("product-sync"));
    let scheduler = Arc::new(IntervalScheduler::new());
    let store = Arc::new(MemoryProgressStore::new());
    let catalog = Arc::new(LogCatalog::with_sync_timeout(config.sync_timeout));

    let runner = Arc::new(SyncRunner::new(
        runtime,
        scheduler,
        store,
        catalog,
        RunnerConfig {
            healthcheck_interval: config.healthcheck_interval,
        },
    ));

    let batch: Vec<SyncItem> = (0..items)
        .map(|i| {
            SyncItem::new(
                format!("SKU-{i:04}"),
                json!({ "action": "publish", "index": i }),
            )
        })
        .collect();
    runner
        .enqueue(batch)
        .await
        .map_err(|e| anyhow::anyhow!("enqueue failed: {e}"))?;

    println!("enqueued {items} products, dispatching...");
    runner.dispatch().await;

    let deadline = tokio::time::Instant::now() + timeout;
    while runner.is_updating().await || runner.is_running().await {
        if tokio::time::Instant::now() > deadline {
            anyhow::bail!(
                "queue did not drain within {}s ({} items left)",
                timeout.as_secs(),
                runner.get_item_count().await
            );
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    // Final reconciliation tick: confirms the drained queue and cancels the
    // periodic check before we exit.
    let status = runner
        .handle_cron_healthcheck()
        .await
        .map_err(|e| anyhow::anyhow!("health check failed: {e}"))?;
    if status != HealthStatus::Cleared {
        anyhow::bail!("expected a cleared queue after drain, got {status:?}");
    }

    println!("sync session finished, {} items remaining", runner.get_item_count().await);
    Ok(())
}
