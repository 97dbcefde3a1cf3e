//! Data models.
//!
//! Upstream types mirror the aviationstack `/flights` payload. Every field is
//! optional there, so missing objects and `null` values collapse to defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{self, ScheduleDisplay};
use serde_helpers::*;

/// One upstream record: a single scheduled movement of a flight number on a date
///
/// See: https://aviationstack.com/documentation
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Occurrence {
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub flight_date: Option<String>,
    /// Free-text status, e.g. `scheduled`, `active`, `landed`, `cancelled`
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub flight_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub departure: Endpoint,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub arrival: Endpoint,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub airline: Airline,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub flight: FlightIdent,
    #[serde(default)]
    pub aircraft: Option<Aircraft>,
    #[serde(default)]
    pub live: Option<Live>,
}

/// Departure or arrival side of an upstream record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Endpoint {
    /// Airport name
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub airport: Option<String>,
    /// IANA timezone name, e.g. `America/Los_Angeles`
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub iata: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub icao: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub terminal: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub gate: Option<String>,
    /// Delay in minutes
    #[serde(default)]
    pub delay: Option<i64>,
    /// Scheduled time as sent by the provider, e.g. `2024-01-31T21:30:00+00:00`
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub scheduled: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub estimated: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub actual: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Airline {
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub iata: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlightIdent {
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub iata: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub icao: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Aircraft {
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub registration: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub iata: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub icao: Option<String>,
}

/// Live telemetry, present only while the aircraft is tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Live {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Altitude in meters
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Ground speed in km/h
    #[serde(default)]
    pub speed_horizontal: Option<f64>,
    /// Heading in degrees
    #[serde(default)]
    pub direction: Option<f64>,
    #[serde(default)]
    pub is_ground: Option<bool>,
}

/// Outcome of one upstream call
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// The body carried a `data` array
    Data(Vec<Occurrence>),
    /// The body had no usable `data` field; kept whole for diagnostics
    Missing(serde_json::Value),
}

impl UpstreamPayload {
    /// Split a raw upstream body into records or an error-shaped remainder
    pub fn from_value(mut body: serde_json::Value) -> Result<Self, serde_json::Error> {
        match body.get_mut("data") {
            Some(data) if data.is_array() => {
                let occurrences = serde_json::from_value(data.take())?;
                Ok(Self::Data(occurrences))
            }
            _ => Ok(Self::Missing(body)),
        }
    }
}

/// Airport side of a normalized flight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub code: Option<String>,
    pub city: Option<String>,
    pub time: Option<String>,
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
}

impl From<&Endpoint> for Stop {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            code: endpoint.iata.clone(),
            city: endpoint.airport.clone(),
            time: endpoint.scheduled.clone(),
            timezone: endpoint.timezone.clone(),
            terminal: endpoint.terminal.clone(),
            gate: endpoint.gate.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AircraftModel {
    pub model: String,
}

/// Normalized flight returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_number: Option<String>,
    pub origin: Stop,
    pub destination: Stop,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<AircraftModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<Live>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<ScheduleDisplay>,
    /// Scheduled departure instant, used for ordering
    #[serde(skip)]
    pub departs_at: Option<DateTime<Utc>>,
}

/// Upstream status marker for a flight in the air
pub const ACTIVE_STATUS: &str = "Active";

impl Flight {
    /// Normalize an upstream record. `now` anchors the timezone offsets used
    /// for the displayed block duration.
    pub fn from_occurrence(occurrence: &Occurrence, now: DateTime<Utc>) -> Self {
        let origin = Stop::from(&occurrence.departure);
        let destination = Stop::from(&occurrence.arrival);
        let display = ScheduleDisplay::new(&origin, &destination, now);

        Self {
            flight_number: occurrence.flight.iata.clone(),
            departs_at: origin.time.as_deref().and_then(schedule::parse_instant),
            origin,
            destination,
            status: occurrence
                .flight_status
                .as_deref()
                .map(capitalize)
                .unwrap_or_else(|| "Unknown".to_string()),
            aircraft: occurrence.aircraft.as_ref().map(|aircraft| AircraftModel {
                model: aircraft
                    .iata
                    .clone()
                    .or_else(|| aircraft.icao.clone())
                    .or_else(|| aircraft.registration.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
            }),
            live: occurrence.live.clone(),
            display,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result of a flight number lookup
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct LookupResult {
    pub current: Option<Flight>,
    pub past: Vec<Flight>,
    pub upcoming: Vec<Flight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardIdent {
    pub iata: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardAirline {
    pub name: Option<String>,
    pub iata: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardStop {
    pub airport: Option<String>,
    pub iata: Option<String>,
    pub scheduled: Option<String>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    pub delay: Option<i64>,
    pub timezone: Option<String>,
}

impl From<&Endpoint> for BoardStop {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            airport: endpoint.airport.clone(),
            iata: endpoint.iata.clone(),
            scheduled: endpoint.scheduled.clone(),
            terminal: endpoint.terminal.clone(),
            gate: endpoint.gate.clone(),
            delay: endpoint.delay,
            timezone: endpoint.timezone.clone(),
        }
    }
}

/// One row of an airport departure or arrival board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardFlight {
    pub flight: BoardIdent,
    pub airline: BoardAirline,
    pub status: Option<String>,
    pub departure: BoardStop,
    pub arrival: BoardStop,
}

impl From<&Occurrence> for BoardFlight {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            flight: BoardIdent {
                iata: occurrence.flight.iata.clone(),
                number: occurrence.flight.number.clone(),
            },
            airline: BoardAirline {
                name: occurrence.airline.name.clone(),
                iata: occurrence.airline.iata.clone(),
            },
            status: occurrence.flight_status.clone(),
            departure: BoardStop::from(&occurrence.departure),
            arrival: BoardStop::from(&occurrence.arrival),
        }
    }
}

/// Counters and window bounds reported alongside a board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDebug {
    pub raw: usize,
    pub filtered: usize,
    pub deduped: usize,
    pub window_start: String,
    pub window_end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardResponse {
    pub flights: Vec<BoardFlight>,
    pub debug: BoardDebug,
}

/// Custom deserializers
mod serde_helpers {
    use serde::{self, Deserialize, Deserializer};

    pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        Ok(s.and_then(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }))
    }

    pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "flight_date": "2024-01-31",
            "flight_status": "active",
            "departure": {
                "airport": "San Francisco International",
                "timezone": "America/Los_Angeles",
                "iata": "SFO",
                "icao": "KSFO",
                "terminal": "2",
                "gate": "D11",
                "delay": 13,
                "scheduled": "2024-01-31T04:20:00+00:00",
                "estimated": "2024-01-31T04:20:00+00:00",
                "actual": null
            },
            "arrival": {
                "airport": "Dallas/Fort Worth International",
                "timezone": "America/Chicago",
                "iata": "DFW",
                "icao": "KDFW",
                "terminal": "0",
                "gate": "",
                "delay": null,
                "scheduled": "2024-01-31T09:55:00+00:00"
            },
            "airline": { "name": "American Airlines", "iata": "AA", "icao": "AAL" },
            "flight": { "number": "1004", "iata": "AA1004", "icao": "AAL1004", "codeshared": null },
            "aircraft": { "registration": "N160AN", "iata": null, "icao": "A321", "icao24": "A0F1BB" },
            "live": {
                "updated": "2024-01-31T05:00:00+00:00",
                "latitude": 36.28,
                "longitude": -106.807,
                "altitude": 8846.82,
                "direction": 114.34,
                "speed_horizontal": 894.348,
                "speed_vertical": 1.188,
                "is_ground": false
            }
        })
    }

    #[test]
    fn parse_occurrence() {
        let occurrence: Occurrence = serde_json::from_value(sample()).unwrap();

        assert_eq!(occurrence.flight.iata.as_deref(), Some("AA1004"));
        assert_eq!(occurrence.departure.delay, Some(13));
        assert_eq!(occurrence.departure.actual, None);
        assert_eq!(occurrence.arrival.gate, None);
        assert_eq!(
            occurrence.aircraft,
            Some(Aircraft {
                registration: Some("N160AN".to_string()),
                iata: None,
                icao: Some("A321".to_string()),
            })
        );
        assert_eq!(occurrence.live.unwrap().is_ground, Some(false));
    }

    #[test]
    fn parse_occurrence_nulls() {
        let occurrence: Occurrence = serde_json::from_value(json!({
            "flight_status": null,
            "departure": null,
            "flight": { "iata": "  " },
            "aircraft": null,
            "live": null
        }))
        .unwrap();

        assert_eq!(occurrence, Occurrence::default());
    }

    #[test]
    fn payload_with_data() {
        let payload = UpstreamPayload::from_value(json!({
            "pagination": { "count": 1 },
            "data": [sample()]
        }))
        .unwrap();

        match payload {
            UpstreamPayload::Data(occurrences) => assert_eq!(occurrences.len(), 1),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn payload_without_data() {
        let body = json!({ "error": { "code": "invalid_access_key" } });
        let payload = UpstreamPayload::from_value(body.clone()).unwrap();
        assert_eq!(payload, UpstreamPayload::Missing(body));

        let body = json!({ "data": null });
        let payload = UpstreamPayload::from_value(body.clone()).unwrap();
        assert_eq!(payload, UpstreamPayload::Missing(body));
    }

    #[test]
    fn normalize_occurrence() {
        let occurrence: Occurrence = serde_json::from_value(sample()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 5, 0, 0).unwrap();
        let flight = Flight::from_occurrence(&occurrence, now);

        assert_eq!(flight.flight_number.as_deref(), Some("AA1004"));
        assert_eq!(flight.status, "Active");
        assert!(flight.is_active());
        assert_eq!(flight.origin.code.as_deref(), Some("SFO"));
        assert_eq!(flight.destination.gate, None);
        assert_eq!(flight.aircraft.as_ref().unwrap().model, "A321");
        assert_eq!(
            flight.departs_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 4, 20, 0).unwrap())
        );

        let value = serde_json::to_value(&flight).unwrap();
        assert_eq!(value["flightNumber"], "AA1004");
        assert_eq!(value["origin"]["city"], "San Francisco International");
        assert_eq!(value["live"]["speed_horizontal"], 894.348);
        assert!(value.get("departs_at").is_none());
    }

    #[test]
    fn normalize_without_status_or_aircraft_model() {
        let occurrence = Occurrence {
            aircraft: Some(Aircraft::default()),
            ..Occurrence::default()
        };
        let flight = Flight::from_occurrence(&occurrence, Utc::now());

        assert_eq!(flight.status, "Unknown");
        assert_eq!(flight.aircraft.unwrap().model, "Unknown");
        assert_eq!(flight.departs_at, None);
        assert_eq!(flight.display, None);
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("scheduled"), "Scheduled");
        assert_eq!(capitalize("Landed"), "Landed");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn board_flight_serializes_raw_status() {
        let occurrence: Occurrence = serde_json::from_value(sample()).unwrap();
        let value = serde_json::to_value(BoardFlight::from(&occurrence)).unwrap();

        assert_eq!(value["status"], "active");
        assert_eq!(value["flight"]["number"], "1004");
        assert_eq!(value["departure"]["delay"], 13);
        assert_eq!(value["arrival"]["gate"], serde_json::Value::Null);
    }
}
