//! Scheduled time handling.
//!
//! The provider formats airport-local wall-clock times with an offset suffix
//! that is usually `+00:00` regardless of the airport. Ordering and windowing
//! use the instant as sent; everything shown to a reader uses the face value,
//! i.e. the digits with the suffix stripped.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::models::Stop;

/// Parse a provider timestamp into an instant, honouring its offset.
/// Timestamps without an offset are read as UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| value.parse::<DateTime<FixedOffset>>())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            value
                .parse::<NaiveDateTime>()
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

/// Remove a trailing `Z` or `±HH:MM` / `±HHMM` offset
pub fn strip_offset(value: &str) -> &str {
    if let Some(stripped) = value.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return stripped;
    }

    let bytes = value.as_bytes();
    for len in [6, 5] {
        if bytes.len() <= len {
            continue;
        }
        let tail = &bytes[bytes.len() - len..];
        let signed = tail[0] == b'+' || tail[0] == b'-';
        let digits = |range: &[u8]| range.iter().all(u8::is_ascii_digit);
        let shaped = if len == 6 {
            digits(&tail[1..3]) && tail[3] == b':' && digits(&tail[4..])
        } else {
            digits(&tail[1..])
        };
        if signed && shaped {
            return &value[..value.len() - len];
        }
    }

    value
}

/// Wall-clock time at the airport, ignoring any offset suffix
pub fn face_value(value: &str) -> Option<NaiveDateTime> {
    let local = strip_offset(value.trim());
    local
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Current UTC offset of an IANA zone in seconds; unknown zones count as UTC
pub fn utc_offset_seconds(zone: Option<&str>, at: DateTime<Utc>) -> i32 {
    zone.and_then(|name| name.parse::<Tz>().ok())
        .map(|tz| {
            tz.offset_from_utc_datetime(&at.naive_utc())
                .fix()
                .local_minus_utc()
        })
        .unwrap_or(0)
}

/// Short zone name such as `PST`, if the zone is known
pub fn zone_abbreviation(zone: Option<&str>, at: DateTime<Utc>) -> Option<String> {
    let tz = zone?.parse::<Tz>().ok()?;
    Some(at.with_timezone(&tz).format("%Z").to_string())
}

/// Elapsed time between two face values at airports in different zones.
///
/// Offsets are taken at `now`, not at the flight's own dates.
pub fn block_duration(
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    origin_zone: Option<&str>,
    destination_zone: Option<&str>,
    now: DateTime<Utc>,
) -> Duration {
    let face = arrival - departure;
    let shift = utc_offset_seconds(destination_zone, now) - utc_offset_seconds(origin_zone, now);
    face - Duration::seconds(i64::from(shift))
}

/// `"{h}h {m}m"`, or `None` for negative durations
pub fn format_duration(duration: Duration) -> Option<String> {
    let minutes = duration.num_minutes();
    if minutes < 0 {
        return None;
    }
    Some(format!("{}h {}m", minutes / 60, minutes % 60))
}

/// Pre-formatted schedule fields for a normalized flight
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDisplay {
    pub departure_time: String,
    pub departure_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_zone: Option<String>,
    pub arrival_time: String,
    pub arrival_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_zone: Option<String>,
    /// Calendar days between departure and landing, face value
    pub day_offset: i64,
    pub duration: Option<String>,
}

impl ScheduleDisplay {
    pub fn new(origin: &Stop, destination: &Stop, now: DateTime<Utc>) -> Option<Self> {
        let departure = face_value(origin.time.as_deref()?)?;
        let arrival = face_value(destination.time.as_deref()?)?;
        let origin_zone = origin.timezone.as_deref();
        let destination_zone = destination.timezone.as_deref();

        Some(Self {
            departure_time: departure.format("%I:%M %p").to_string(),
            departure_date: departure.format("%a, %b %-d").to_string(),
            departure_zone: zone_abbreviation(origin_zone, now),
            arrival_time: arrival.format("%I:%M %p").to_string(),
            arrival_date: arrival.format("%a, %b %-d").to_string(),
            arrival_zone: zone_abbreviation(destination_zone, now),
            day_offset: (arrival.date() - departure.date()).num_days(),
            duration: format_duration(block_duration(
                departure,
                arrival,
                origin_zone,
                destination_zone,
                now,
            )),
        })
    }
}
