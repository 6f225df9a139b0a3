// Configuration module entry point
// Loads startup configuration once and exposes the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{BuildConfig, Config};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Bare environment variables honoured for compatibility with hosting platforms
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub commit: Option<String>,
    pub lastmod: Option<String>,
}

impl EnvOverrides {
    /// Snapshot `PORT`, `COMMIT` and `LASTMOD` from the process environment
    pub fn from_env() -> Self {
        Self {
            port: non_empty_var("PORT"),
            commit: std::env::var("COMMIT").ok(),
            lastmod: std::env::var("LASTMOD").ok(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(config_path, &EnvOverrides::from_env())
    }

    /// Load configuration with explicit values for the bare environment overrides
    pub fn load_with(
        config_path: &str,
        overrides: &EnvOverrides,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("REGEX_TESTER").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000)?
            .set_default("build.commit", "")?
            .set_default("build.lastmod", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "regex-tester")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.redirect_target", types::DEFAULT_REDIRECT_TARGET)?
            .set_override_option("server.port", overrides.port.clone())?
            .set_override_option("build.commit", overrides.commit.clone())?
            .set_override_option("build.lastmod", overrides.lastmod.clone())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
