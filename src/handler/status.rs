//! Status endpoint (`/status.json`)

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;
use std::io;

use crate::config::{AppState, BuildConfig};
use crate::http::{self, FormParams};

const HOSTNAME_FILE: &str = "/proc/sys/kernel/hostname";

/// Snapshot of process metadata, rebuilt on every request
///
/// Field names follow the established wire format, including the
/// capitalised process fields.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub commit: String,
    pub lastmod: String,
    pub tech: String,
    pub version: String,
    /// Names only; values are never exposed
    #[serde(rename = "Environ")]
    pub environ: Vec<String>,
    #[serde(rename = "Getwd")]
    pub getwd: String,
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(rename = "Seconds")]
    pub seconds: i64,
    #[serde(rename = "TempDir")]
    pub temp_dir: String,
}

impl StatusReport {
    pub fn collect(build: &BuildConfig) -> Self {
        let now = Utc::now();
        Self {
            success: true,
            message: "OK".to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            commit: build.commit.clone(),
            lastmod: build.lastmod.clone(),
            tech: tech(),
            version: version(),
            environ: environ_names(),
            getwd: or_error(std::env::current_dir().map(|p| p.display().to_string())),
            hostname: or_error(hostname()),
            seconds: now.timestamp(),
            temp_dir: std::env::temp_dir().display().to_string(),
        }
    }
}

/// Handle `/status.json`
pub fn handle_status(params: &FormParams, state: &AppState) -> Response<Full<Bytes>> {
    let report = StatusReport::collect(&state.config.build);
    http::build_jsonp_response(
        params.first("callback"),
        &report,
        &state.config.http.server_name,
    )
}

fn tech() -> String {
    format!(
        "Rust ({} {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

fn version() -> String {
    format!("regex / {}", env!("CARGO_PKG_VERSION"))
}

fn environ_names() -> Vec<String> {
    let mut names: Vec<String> = std::env::vars_os()
        .map(|(key, _)| key.to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn hostname() -> io::Result<String> {
    match std::fs::read_to_string(HOSTNAME_FILE) {
        Ok(name) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        Ok(_) => fallback_hostname(),
        Err(e) => fallback_hostname().map_err(|_| e),
    }
}

fn fallback_hostname() -> io::Result<String> {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "hostname unavailable"))
}

fn or_error(value: io::Result<String>) -> String {
    value.unwrap_or_else(|e| format!("ERROR: {e}"))
}
