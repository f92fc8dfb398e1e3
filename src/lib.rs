//! # catsync-rs
//!
//! Queue-backed background runner for pushing product catalogs to an
//! external feed.
//!
//! Provides the dispatch/locking protocol (at most one worker per queue),
//! TTL-bounded progress counters, and a cron-driven health check that
//! restarts a stalled worker or clears stale state. The backing queue, the
//! scheduler, the progress store, and the catalog API are consumed through
//! narrow ports, each with an in-memory implementation for development and
//! tests.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod queue;
pub mod runner;
pub mod schedule;
pub mod store;
pub mod telemetry;
