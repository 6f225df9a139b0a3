// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Documentation page the root path redirects to
pub const DEFAULT_REDIRECT_TARGET: &str = "https://www.regexplanet.com/advanced/rust/index.html";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub build: BuildConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Build metadata surfaced verbatim by the status endpoint
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Commit identifier (`COMMIT`)
    #[serde(default)]
    pub commit: String,
    /// Last-modified marker (`LASTMOD`)
    #[serde(default)]
    pub lastmod: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
    /// Where `/` and unknown paths are redirected
    #[serde(default = "default_redirect_target")]
    pub redirect_target: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_redirect_target() -> String {
    DEFAULT_REDIRECT_TARGET.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
                workers: None,
            },
            build: BuildConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: true,
                access_log_format: default_access_log_format(),
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "regex-tester".to_string(),
                max_body_size: 1_048_576,
                redirect_target: default_redirect_target(),
            },
        }
    }
}
