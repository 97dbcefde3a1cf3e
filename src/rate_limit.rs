//! Fixed-window request limiting per client address.
//!
//! Counters live in process memory only; separate instances count separately
//! and a restart clears them.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{config::RateLimitConfig, errors::FlightBoardError, server::AppState};

const FALLBACK_CLIENT: &str = "127.0.0.1";

#[derive(Debug, Clone, Copy)]
struct Record {
    count: u32,
    last_reset: Instant,
}

#[derive(Debug)]
struct Records {
    by_client: HashMap<String, Record>,
    swept_at: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    records: Mutex<Records>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            records: Mutex::new(Records {
                by_client: HashMap::new(),
                swept_at: Instant::now(),
            }),
        }
    }

    /// Count a request from `client`; `false` once the window's quota is spent
    pub async fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now()).await
    }

    async fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut records = self.records.lock().await;

        // Client keys come from a header, so expired records must not pile up.
        // At most one sweep per window.
        if now.saturating_duration_since(records.swept_at) > self.window {
            let window = self.window;
            records
                .by_client
                .retain(|_, record| now.saturating_duration_since(record.last_reset) <= window);
            records.swept_at = now;
        }

        let record = records.by_client.entry(client.to_string()).or_insert(Record {
            count: 0,
            last_reset: now,
        });

        if now.saturating_duration_since(record.last_reset) > self.window {
            record.count = 0;
            record.last_reset = now;
        }

        record.count += 1;
        record.count <= self.max_requests
    }
}

/// Paths that hit the provider, directly or through a page
pub fn is_limited_path(path: &str, query: Option<&str>) -> bool {
    let searches = query.is_some_and(|query| {
        query
            .split('&')
            .any(|pair| pair.split('=').next() == Some("query"))
    });

    path.starts_with("/api/") || (path == "/" && searches) || path.starts_with("/airport-dashboard")
}

/// First `X-Forwarded-For` hop, else the peer address
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| FALLBACK_CLIENT.to_string())
}

/// Middleware rejecting over-quota clients with `429`
pub async fn limit_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let uri = request.uri();
    if !is_limited_path(uri.path(), uri.query()) {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client = client_key(request.headers(), peer);

    if !state.limiter.check(&client).await {
        warn!("[RateLimit] Blocked IP: {} for path: {}", client, request.uri().path());
        return FlightBoardError::RateLimited.into_response();
    }

    next.run(request).await
}
