//! HTTP server

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::AppConfig,
    errors::FlightBoardError,
    handlers,
    rate_limit::{self, RateLimiter},
    upstream::AviationClient,
};

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Arc<AviationClient>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, FlightBoardError> {
        Ok(Self {
            client: Arc::new(AviationClient::new(&config.upstream)?),
            limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
        })
    }
}

/// All routes, with rate limiting and request tracing applied
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/flights", get(handlers::flights))
        .route("/api/airports", get(handlers::airports))
        .route("/api/route", get(handlers::route))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves
pub async fn serve<F>(config: &AppConfig, shutdown: F) -> Result<(), FlightBoardError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(config)?;
    if !state.client.has_access_key() {
        tracing::warn!("No API key found; flight endpoints will answer 500");
    }

    let listener = tokio::net::TcpListener::bind(config.server.addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    info!("Server has been shut down");
    Ok(())
}
