//! Error types for catsync-rs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("dispatch failed: {0}")]
    Dispatch(String),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("publish failed for {product_ref}: {reason}")]
    Publish { product_ref: String, reason: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
