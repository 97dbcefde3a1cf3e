//! Application configuration

use std::net::SocketAddr;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::errors::FlightBoardError;

/// Environment variable consulted when no access key is configured
pub const API_KEY_VARIABLE: &str = "AVIATIONSTACK_API_KEY";

const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the aviation data provider, without trailing `/flights`
    pub base_url: String,
    pub access_key: Option<String>,
    /// Result cap for flight number lookups
    pub flight_limit: u32,
    /// Result cap for airport boards
    pub airport_limit: u32,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub window: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from an optional file, overridden by environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("upstream.base_url", "http://api.aviationstack.com/v1")?
            .set_default("upstream.flight_limit", 100)?
            .set_default("upstream.airport_limit", 300)?
            .set_default("upstream.timeout", 30)?
            .set_default("rate_limit.max_requests", 20)?
            .set_default("rate_limit.window", 60)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("FLIGHTBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: AppConfig = config.try_deserialize()?;
        app.upstream.access_key = resolve_access_key(
            app.upstream.access_key.take(),
            std::env::var(API_KEY_VARIABLE).ok(),
        );
        Ok(app)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), FlightBoardError> {
        self.upstream.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

/// Prefer the configured key, fall back to the provider's conventional variable.
/// Blank keys count as missing.
pub fn resolve_access_key(configured: Option<String>, fallback: Option<String>) -> Option<String> {
    configured
        .into_iter()
        .chain(fallback)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

impl UpstreamConfig {
    pub fn validate(&self) -> Result<(), FlightBoardError> {
        if self.base_url.trim().is_empty() {
            return Err(FlightBoardError::ConfigurationError {
                message: "Upstream base URL cannot be empty".to_string(),
            });
        }
        if self.flight_limit == 0 || self.airport_limit == 0 {
            return Err(FlightBoardError::ConfigurationError {
                message: "Upstream result limits must be greater than zero".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(FlightBoardError::ConfigurationError {
                message: "Upstream timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), FlightBoardError> {
        if self.max_requests == 0 {
            return Err(FlightBoardError::ConfigurationError {
                message: "Rate limit must allow at least one request".to_string(),
            });
        }
        if self.window.is_zero() {
            return Err(FlightBoardError::ConfigurationError {
                message: "Rate limit window must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
