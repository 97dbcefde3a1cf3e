//! Aviation data provider client

use tracing::{info, warn};

use crate::{
    board::BoardKind,
    config::UpstreamConfig,
    errors::FlightBoardError,
    models::UpstreamPayload,
};

/// What to ask the provider for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightQuery {
    /// All occurrences of one flight number
    Flight { iata: String, date: Option<String> },
    /// Movements at one airport
    Airport {
        kind: BoardKind,
        code: String,
        date: Option<String>,
    },
}

impl FlightQuery {
    /// Query parameters, access key excluded
    fn params(&self, flight_limit: u32, airport_limit: u32) -> Vec<(&'static str, String)> {
        let (mut params, date) = match self {
            Self::Flight { iata, date } => (
                vec![
                    ("flight_iata", iata.clone()),
                    ("limit", flight_limit.to_string()),
                ],
                date,
            ),
            Self::Airport { kind, code, date } => (
                vec![
                    (kind.upstream_filter(), code.clone()),
                    ("limit", airport_limit.to_string()),
                ],
                date,
            ),
        };
        if let Some(date) = date {
            params.push(("flight_date", date.clone()));
        }
        params
    }
}

/// HTTP client for the provider's `/flights` endpoint
#[derive(Debug, Clone)]
pub struct AviationClient {
    http: reqwest::Client,
    flights_url: String,
    access_key: Option<String>,
    flight_limit: u32,
    airport_limit: u32,
}

impl AviationClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FlightBoardError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            flights_url: format!("{}/flights", config.base_url.trim_end_matches('/')),
            access_key: config.access_key.clone(),
            flight_limit: config.flight_limit,
            airport_limit: config.airport_limit,
        })
    }

    pub fn has_access_key(&self) -> bool {
        self.access_key.is_some()
    }

    /// Run one query against the provider. No retries.
    pub async fn fetch(&self, query: &FlightQuery) -> Result<UpstreamPayload, FlightBoardError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or(FlightBoardError::MissingApiKey)?;
        let params = query.params(self.flight_limit, self.airport_limit);

        info!(
            "Fetching from: {}?access_key=[REDACTED]&{}",
            self.flights_url,
            params
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join("&")
        );

        // Request URLs carry the access key, keep them out of errors
        let response = self
            .http
            .get(&self.flights_url)
            .query(&[("access_key", access_key)])
            .query(&params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(reqwest::Error::without_url)?;

        let payload = UpstreamPayload::from_value(body)?;
        match &payload {
            UpstreamPayload::Data(occurrences) => {
                info!(
                    "Upstream responded {} with {} records",
                    status,
                    occurrences.len()
                );
            }
            UpstreamPayload::Missing(_) => {
                warn!("Upstream responded {} without data", status);
            }
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(access_key: Option<&str>) -> UpstreamConfig {
        UpstreamConfig {
            base_url: "http://127.0.0.1:9/v1/".to_string(),
            access_key: access_key.map(str::to_string),
            flight_limit: 100,
            airport_limit: 300,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn flight_query_params() {
        let query = FlightQuery::Flight {
            iata: "AA100".to_string(),
            date: Some("2024-01-31".to_string()),
        };

        assert_eq!(
            query.params(100, 300),
            vec![
                ("flight_iata", "AA100".to_string()),
                ("limit", "100".to_string()),
                ("flight_date", "2024-01-31".to_string()),
            ]
        );
    }

    #[test]
    fn airport_query_params() {
        let query = FlightQuery::Airport {
            kind: BoardKind::Arrival,
            code: "JFK".to_string(),
            date: None,
        };

        assert_eq!(
            query.params(100, 300),
            vec![("arr_iata", "JFK".to_string()), ("limit", "300".to_string())]
        );
    }

    #[test]
    fn flights_url_joins_base() {
        let client = AviationClient::new(&config(Some("secret"))).unwrap();
        assert_eq!(client.flights_url, "http://127.0.0.1:9/v1/flights");
        assert!(client.has_access_key());
    }

    #[tokio::test]
    async fn fetch_without_key_fails_before_request() {
        let client = AviationClient::new(&config(None)).unwrap();
        let query = FlightQuery::Flight {
            iata: "AA100".to_string(),
            date: None,
        };

        assert!(matches!(
            client.fetch(&query).await,
            Err(FlightBoardError::MissingApiKey)
        ));
    }
}
