//! Tracing initialization.
//!
//! Structured fmt logging to stdout. `RUST_LOG` overrides the configured
//! default level.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Install the global tracing subscriber.
///
/// Call once from the binary before any other work. Returns an error if the
/// default level is not a valid filter directive.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| Error::Config(format!("bad log filter {default_level}: {e}")))?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
