// Application state module
// Immutable per-process state shared by every connection

use super::types::Config;

/// Application state
///
/// Built once at startup and shared behind an `Arc`. Nothing in here is
/// mutated while serving, so handlers never take a lock.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    /// Mirrors `config.logging.access_log`
    pub access_log: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            access_log: config.logging.access_log,
        }
    }
}
