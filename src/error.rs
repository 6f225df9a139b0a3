//! Startup error types
//!
//! Per-request failures never leave their handler; only the conditions that
//! stop the process from serving at all are represented here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    InvalidAddress(String),

    #[error("failed to start listener: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
