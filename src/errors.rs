//! Errors for the flight board service
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum FlightBoardError {
    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Unknown airport: {0}")]
    UnknownAirport(String),

    #[error("Upstream API Error")]
    UpstreamError { details: serde_json::Value },

    #[error("Too many requests. Please try again in a minute.")]
    RateLimited,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal failure while serving one endpoint; only `resource` reaches the caller
    #[error("Failed to fetch {resource} data")]
    FetchFailed {
        resource: &'static str,
        source: Box<FlightBoardError>,
    },
}

impl FlightBoardError {
    /// Tag transport and decoding failures with the data the endpoint serves
    pub fn while_fetching(self, resource: &'static str) -> Self {
        match self {
            Self::HttpError(_) | Self::SerdeError(_) | Self::IoError(_) => Self::FetchFailed {
                resource,
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidParameter { .. } | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnknownAirport(_) => StatusCode::NOT_FOUND,
            Self::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::MissingApiKey
            | Self::HttpError(_)
            | Self::SerdeError(_)
            | Self::ConfigError(_)
            | Self::ConfigurationError { .. }
            | Self::IoError(_)
            | Self::FetchFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FlightBoardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::UpstreamError { details } => {
                error!("Upstream returned no data: {}", details);
                json!({ "error": self.to_string(), "details": details })
            }
            Self::MissingApiKey => {
                error!("No API key found");
                json!({ "error": self.to_string() })
            }
            Self::HttpError(_)
            | Self::SerdeError(_)
            | Self::ConfigError(_)
            | Self::ConfigurationError { .. }
            | Self::IoError(_) => {
                // Details stay in the log
                error!("Request failed: {}", self);
                json!({ "error": "Failed to fetch flight data" })
            }
            Self::FetchFailed { source, .. } => {
                error!("{}: {}", self, source);
                json!({ "error": self.to_string() })
            }
            Self::RateLimited => json!({ "error": self.to_string() }),
            Self::MissingParameter(_)
            | Self::InvalidParameter { .. }
            | Self::InvalidQuery(_)
            | Self::UnknownAirport(_) => {
                warn!("Rejected request: {}", self);
                json!({ "error": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
