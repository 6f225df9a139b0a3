//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight handling, parameter
//! decoding, dispatch to the endpoint handlers, and access logging.

use crate::config::AppState;
use crate::handler::{status, test};
use crate::http::{self, FormError};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const STATUS_PATH: &str = "/status.json";
pub const TEST_PATH: &str = "/test.json";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if *req.method() == Method::OPTIONS {
        return http::build_options_response();
    }

    let path = req.uri().path().to_string();
    if path != STATUS_PATH && path != TEST_PATH {
        return http::build_redirect_response(&state.config.http.redirect_target);
    }

    let params = match http::read_params(req, state.config.http.max_body_size).await {
        Ok(params) => params,
        Err(e @ FormError::TooLarge(_)) => {
            logger::log_warning(&e.to_string());
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&e.to_string());
            return http::build_400_response("unreadable request body");
        }
    };

    if path == STATUS_PATH {
        status::handle_status(&params, state)
    } else {
        test::handle_test(&params, state)
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}
