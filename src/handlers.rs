//! HTTP request handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{Local, Utc};
use serde::Deserialize;
use tracing::info;

use crate::{
    airports::{self, RouteSummary},
    board::{self, BoardKind, TimeWindow},
    errors::FlightBoardError,
    lookup,
    models::{BoardResponse, LookupResult, UpstreamPayload},
    server::AppState,
    upstream::FlightQuery,
};

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub query: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BoardParams {
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Empty strings count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub async fn health() -> &'static str {
    "ok"
}

/// `GET /api/flights?query=&date=`
pub async fn flights(
    State(state): State<AppState>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<LookupResult>, FlightBoardError> {
    let Query(params) = params?;
    let iata: String = params
        .query
        .unwrap_or_default()
        .split_whitespace()
        .collect();
    if iata.is_empty() {
        return Err(FlightBoardError::MissingParameter("Flight number is required"));
    }
    let date = present(params.date);

    let payload = state
        .client
        .fetch(&FlightQuery::Flight { iata, date })
        .await
        .map_err(|err| err.while_fetching("flight"))?;

    let occurrences = match payload {
        UpstreamPayload::Data(occurrences) if !occurrences.is_empty() => occurrences,
        _ => {
            info!("No data found in API response");
            return Ok(Json(LookupResult::default()));
        }
    };

    Ok(Json(lookup::build_lookup(occurrences, Utc::now())))
}

/// `GET /api/airports?code=&type=&date=`
pub async fn airports(
    State(state): State<AppState>,
    params: Result<Query<BoardParams>, QueryRejection>,
) -> Result<Json<BoardResponse>, FlightBoardError> {
    let Query(params) = params?;
    let (Some(code), Some(kind)) = (present(params.code), present(params.kind)) else {
        return Err(FlightBoardError::MissingParameter(
            "Airport code and type (departure/arrival) are required",
        ));
    };
    let code = code.trim().to_uppercase();
    let kind: BoardKind = kind.parse()?;
    let date = present(params.date);
    let board_date = date.as_deref().map(board::parse_board_date).transpose()?;

    let payload = state
        .client
        .fetch(&FlightQuery::Airport {
            kind,
            code: code.clone(),
            date,
        })
        .await
        .map_err(|err| err.while_fetching("airport"))?;

    let occurrences = match payload {
        UpstreamPayload::Data(occurrences) => occurrences,
        UpstreamPayload::Missing(details) => {
            return Err(FlightBoardError::UpstreamError { details });
        }
    };

    let window = match board_date {
        Some(day) => TimeWindow::for_date(day, &Local).ok_or(FlightBoardError::InvalidParameter {
            name: "date",
            value: day.to_string(),
        })?,
        None => TimeWindow::live(Utc::now()),
    };
    info!(
        "[API] {} board for {}, window: {} -> {}",
        kind,
        code,
        window.start.to_rfc3339(),
        window.end.to_rfc3339()
    );

    let response = board::build_board(&occurrences, kind, window);
    info!(
        "[API] After time filter: {}, after deduplication: {}",
        response.debug.filtered, response.debug.deduped
    );

    Ok(Json(response))
}

/// `GET /api/route?from=&to=`
pub async fn route(
    params: Result<Query<RouteParams>, QueryRejection>,
) -> Result<Json<RouteSummary>, FlightBoardError> {
    let Query(params) = params?;
    let (Some(from), Some(to)) = (present(params.from), present(params.to)) else {
        return Err(FlightBoardError::MissingParameter(
            "Origin and destination airport codes are required",
        ));
    };
    let (from, to) = (from.trim().to_uppercase(), to.trim().to_uppercase());

    match airports::route_summary(&from, &to) {
        Some(summary) => Ok(Json(summary)),
        None if airports::coordinates(&from).is_none() => Err(FlightBoardError::UnknownAirport(from)),
        None => Err(FlightBoardError::UnknownAirport(to)),
    }
}
