//! Flight number lookup: dedupe, normalize, and split occurrences around now.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::models::{Flight, LookupResult, Occurrence};

/// An `Active` flag older than this is treated as stale
const ACTIVE_HORIZON_HOURS: i64 = 48;

/// Drop repeated (flight number, scheduled departure) pairs; first one wins
pub fn dedupe_occurrences(occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    let mut seen = HashSet::new();
    occurrences
        .into_iter()
        .filter(|occurrence| {
            seen.insert((
                occurrence.flight.iata.clone(),
                occurrence.departure.scheduled.clone(),
            ))
        })
        .collect()
}

/// Oldest first. Flights without a parseable departure sort before the rest.
pub fn sort_by_departure(flights: &mut [Flight]) {
    flights.sort_by_key(|flight| flight.departs_at);
}

/// Index of the flight to feature, given flights sorted by departure.
///
/// Priority: a recent `Active` flight, then the soonest upcoming one, then
/// the most recent one.
pub fn select_current(sorted: &[Flight], now: DateTime<Utc>) -> Option<usize> {
    let horizon = now - Duration::hours(ACTIVE_HORIZON_HOURS);

    sorted
        .iter()
        .position(|flight| {
            flight.is_active() && flight.departs_at.is_some_and(|departs| departs > horizon)
        })
        .or_else(|| {
            sorted
                .iter()
                .position(|flight| flight.departs_at.is_some_and(|departs| departs > now))
        })
        .or_else(|| sorted.len().checked_sub(1))
}

/// Split sorted flights into current, past (newest first) and upcoming (soonest first)
pub fn partition(sorted: Vec<Flight>, now: DateTime<Utc>) -> LookupResult {
    let current_index = select_current(&sorted, now);
    let mut result = LookupResult::default();

    for (index, flight) in sorted.into_iter().enumerate() {
        if Some(index) == current_index {
            result.current = Some(flight);
        } else if flight.departs_at.map_or(true, |departs| departs < now) {
            result.past.push(flight);
        } else {
            result.upcoming.push(flight);
        }
    }

    result.past.sort_by(|a, b| b.departs_at.cmp(&a.departs_at));
    result.upcoming.sort_by_key(|flight| flight.departs_at);
    result
}

/// Full lookup pipeline over one upstream page
pub fn build_lookup(occurrences: Vec<Occurrence>, now: DateTime<Utc>) -> LookupResult {
    let mut flights: Vec<Flight> = dedupe_occurrences(occurrences)
        .iter()
        .map(|occurrence| Flight::from_occurrence(occurrence, now))
        .collect();
    sort_by_departure(&mut flights);
    partition(flights, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Endpoint, FlightIdent};
    use chrono::{SecondsFormat, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn occurrence(number: &str, departs: DateTime<Utc>, status: &str) -> Occurrence {
        Occurrence {
            flight_status: Some(status.to_string()),
            flight: FlightIdent {
                iata: Some(number.to_string()),
                ..FlightIdent::default()
            },
            departure: Endpoint {
                scheduled: Some(departs.to_rfc3339_opts(SecondsFormat::Secs, false)),
                ..Endpoint::default()
            },
            ..Occurrence::default()
        }
    }

    fn departures(flights: &[Flight]) -> Vec<DateTime<Utc>> {
        flights.iter().filter_map(|flight| flight.departs_at).collect()
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let result = build_lookup(Vec::new(), now());
        assert_eq!(result, LookupResult::default());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "current": null, "past": [], "upcoming": [] })
        );
    }

    #[test]
    fn dedupe_keeps_first() {
        let departs = now() + Duration::hours(2);
        let mut second = occurrence("AA100", departs, "scheduled");
        second.flight_status = Some("cancelled".to_string());

        let deduped = dedupe_occurrences(vec![
            occurrence("AA100", departs, "scheduled"),
            second,
            occurrence("AA100", departs + Duration::days(1), "scheduled"),
            occurrence("BA200", departs, "scheduled"),
        ]);

        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].flight_status.as_deref(), Some("scheduled"));
    }

    #[test]
    fn dedupe_is_idempotent() {
        let departs = now();
        let input = vec![
            occurrence("AA100", departs, "active"),
            occurrence("AA100", departs, "landed"),
            occurrence("AA100", departs - Duration::days(1), "landed"),
            occurrence("AA100", departs - Duration::days(1), "landed"),
        ];

        let once = dedupe_occurrences(input);
        let twice = dedupe_occurrences(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn stale_active_flag_is_ignored() {
        let recent = now() - Duration::hours(1);
        let result = build_lookup(
            vec![
                occurrence("AA100", now() - Duration::days(5), "active"),
                occurrence("AA100", now() + Duration::hours(3), "scheduled"),
                occurrence("AA100", recent, "active"),
            ],
            now(),
        );

        let current = result.current.unwrap();
        assert_eq!(current.departs_at, Some(recent));
        assert_eq!(departures(&result.past), vec![now() - Duration::days(5)]);
        assert_eq!(departures(&result.upcoming), vec![now() + Duration::hours(3)]);
    }

    #[test]
    fn soonest_upcoming_without_active() {
        let result = build_lookup(
            vec![
                occurrence("AA100", now() + Duration::days(2), "scheduled"),
                occurrence("AA100", now() - Duration::days(1), "landed"),
                occurrence("AA100", now() + Duration::hours(5), "scheduled"),
            ],
            now(),
        );

        assert_eq!(
            result.current.unwrap().departs_at,
            Some(now() + Duration::hours(5))
        );
        assert_eq!(result.past.len(), 1);
        assert_eq!(result.upcoming.len(), 1);
    }

    #[test]
    fn most_recent_past_as_fallback() {
        let result = build_lookup(
            vec![
                occurrence("AA100", now() - Duration::days(3), "landed"),
                occurrence("AA100", now() - Duration::days(1), "landed"),
                occurrence("AA100", now() - Duration::days(2), "landed"),
            ],
            now(),
        );

        assert_eq!(
            result.current.unwrap().departs_at,
            Some(now() - Duration::days(1))
        );
        assert_eq!(
            departures(&result.past),
            vec![now() - Duration::days(2), now() - Duration::days(3)]
        );
        assert!(result.upcoming.is_empty());
    }

    #[test]
    fn lists_are_ordered_for_any_permutation() {
        let offsets = [-30, 7, -2, 50, -11, 3, 26, -70];
        let mut input: Vec<Occurrence> = offsets
            .iter()
            .map(|hours| occurrence("AA100", now() + Duration::hours(*hours), "landed"))
            .collect();

        for rotation in 0..input.len() {
            input.rotate_left(1);
            if rotation % 2 == 0 {
                input.reverse();
            }
            let result = build_lookup(input.clone(), now());

            let past = departures(&result.past);
            assert!(past.windows(2).all(|pair| pair[0] > pair[1]));
            let upcoming = departures(&result.upcoming);
            assert!(upcoming.windows(2).all(|pair| pair[0] < pair[1]));

            assert_eq!(
                result.current.unwrap().departs_at,
                Some(now() + Duration::hours(3))
            );
            assert_eq!(past.len() + upcoming.len() + 1, offsets.len());
        }
    }

    #[test]
    fn unparseable_departure_counts_as_past() {
        let mut broken = occurrence("AA100", now(), "landed");
        broken.departure.scheduled = Some("soon".to_string());

        let result = build_lookup(
            vec![broken, occurrence("AA100", now() + Duration::hours(1), "scheduled")],
            now(),
        );

        assert_eq!(result.past.len(), 1);
        assert_eq!(result.past[0].departs_at, None);
        assert!(result.upcoming.is_empty());
    }
}
