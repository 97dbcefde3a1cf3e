//! Airport departure/arrival boards: windowing and codeshare collapse.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::errors::FlightBoardError;
use crate::models::{BoardDebug, BoardFlight, BoardResponse, Occurrence};
use crate::schedule;

/// Padding applied on both sides of a calendar day
const DAY_BUFFER_HOURS: i64 = 2;
/// Half-width of the window used when no date is given
const LIVE_WINDOW_DAYS: i64 = 7;
/// Gate placeholder used in the codeshare key
const NO_GATE: &str = "nogate";

/// Which side of the airport the board shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    Departure,
    Arrival,
}

impl FromStr for BoardKind {
    type Err = FlightBoardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "departure" => Ok(Self::Departure),
            "arrival" => Ok(Self::Arrival),
            other => Err(FlightBoardError::InvalidParameter {
                name: "type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Departure => write!(f, "departure"),
            Self::Arrival => write!(f, "arrival"),
        }
    }
}

impl BoardKind {
    /// Upstream query parameter that filters by this airport
    pub fn upstream_filter(&self) -> &'static str {
        match self {
            Self::Departure => "dep_iata",
            Self::Arrival => "arr_iata",
        }
    }

    /// Scheduled time the board is ordered and windowed by
    fn scheduled<'a>(&self, flight: &'a BoardFlight) -> Option<&'a str> {
        match self {
            Self::Departure => flight.departure.scheduled.as_deref(),
            Self::Arrival => flight.arrival.scheduled.as_deref(),
        }
    }

    /// Airport at the other end of the movement
    fn remote<'a>(&self, flight: &'a BoardFlight) -> Option<&'a str> {
        match self {
            Self::Departure => flight.arrival.iata.as_deref(),
            Self::Arrival => flight.departure.iata.as_deref(),
        }
    }

    fn gate<'a>(&self, flight: &'a BoardFlight) -> Option<&'a str> {
        match self {
            Self::Departure => flight.departure.gate.as_deref(),
            Self::Arrival => flight.arrival.gate.as_deref(),
        }
    }

    fn scheduled_at(&self, flight: &BoardFlight) -> Option<DateTime<Utc>> {
        self.scheduled(flight).and_then(schedule::parse_instant)
    }
}

/// Open interval of instants a board covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// One calendar day in `tz`, padded by two hours on each side.
    ///
    /// The span is always 28 hours. On DST days the trailing padding is
    /// measured against the day's real length, so it is 1 hour past local
    /// midnight on fall-back days and 3 hours on spring-forward days.
    ///
    /// Returns `None` only if the zone has no valid local time in the first
    /// hour of that day.
    pub fn for_date<Z: TimeZone>(date: NaiveDate, tz: &Z) -> Option<Self> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        let day_start = tz
            .from_local_datetime(&midnight)
            .earliest()
            .or_else(|| {
                // Zones that skip midnight for DST start the day at 01:00
                tz.from_local_datetime(&(midnight + Duration::hours(1)))
                    .earliest()
            })?
            .with_timezone(&Utc);

        let start = day_start - Duration::hours(DAY_BUFFER_HOURS);
        let end = day_start + Duration::days(1) + Duration::hours(DAY_BUFFER_HOURS);
        Some(Self { start, end })
    }

    /// Seven days either side of `now`
    pub fn live(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(LIVE_WINDOW_DAYS),
            end: now + Duration::days(LIVE_WINDOW_DAYS),
        }
    }

    /// Strictly inside the window
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant > self.start && instant < self.end
    }
}

/// Parse a `YYYY-MM-DD` board date
pub fn parse_board_date(value: &str) -> Result<NaiveDate, FlightBoardError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FlightBoardError::InvalidParameter {
        name: "date",
        value: value.to_string(),
    })
}

/// Merge rows sharing scheduled time, remote airport and gate; first row wins.
///
/// Distinct flight numbers collapse too, since codeshares of one physical
/// movement are listed once per marketing carrier.
pub fn collapse_codeshares(flights: Vec<BoardFlight>, kind: BoardKind) -> Vec<BoardFlight> {
    let mut seen = HashSet::new();
    flights
        .into_iter()
        .filter(|flight| {
            seen.insert((
                kind.scheduled(flight).map(str::to_owned),
                kind.remote(flight).map(str::to_owned),
                kind.gate(flight).unwrap_or(NO_GATE).to_owned(),
            ))
        })
        .collect()
}

/// Full board pipeline over one upstream page
pub fn build_board(occurrences: &[Occurrence], kind: BoardKind, window: TimeWindow) -> BoardResponse {
    let relevant: Vec<BoardFlight> = occurrences
        .iter()
        .map(BoardFlight::from)
        .filter(|flight| kind.scheduled_at(flight).is_some_and(|at| window.contains(at)))
        .collect();
    let filtered = relevant.len();

    let mut flights = collapse_codeshares(relevant, kind);
    flights.sort_by_key(|flight| kind.scheduled_at(flight));

    BoardResponse {
        debug: BoardDebug {
            raw: occurrences.len(),
            filtered,
            deduped: flights.len(),
            window_start: window.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            window_end: window.end.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        flights,
    }
}
