//! Conversion from Google Routes DTOs to domain types.
//!
//! Only the first route's first leg matters. Its steps become itinerary
//! legs, and the trip timings are measured from the requested departure
//! instant rather than from when the first vehicle leaves, so a long wait at
//! the stop shows up in the total.

use chrono::{DateTime, Duration};
use tracing::warn;

use crate::domain::{Itinerary, Leg, LocalDateTime, TransitMode, whole_minutes};

use super::types::{ComputeRoutesResponse, Route, Step, TransitDetails};

/// Stop name used for a walk that starts at the trip origin.
const ORIGIN: &str = "origin";

/// Stop name used for a walk that ends at the trip destination.
const DESTINATION: &str = "destination";

/// Convert a `computeRoutes` response into an itinerary.
///
/// Returns `None` when there is no route, and when the route cannot be
/// measured (no arrival time for a transit route, no duration for a walk).
pub fn convert_response(
    response: &ComputeRoutesResponse,
    requested: LocalDateTime,
) -> Option<Itinerary> {
    let route = response.routes.first()?;
    let itinerary = convert_route(route, requested);

    if itinerary.is_none() {
        warn!(%requested, "route without usable timings, treating as no route");
    }

    itinerary
}

fn convert_route(route: &Route, requested: LocalDateTime) -> Option<Itinerary> {
    let steps = route
        .legs
        .first()
        .map(|leg| leg.steps.as_slice())
        .unwrap_or(&[]);

    let transit: Vec<&TransitDetails> = steps
        .iter()
        .filter_map(|s| s.transit_details.as_ref())
        .collect();

    let (total, wait) = if transit.is_empty() {
        let duration = parse_duration(route.duration.as_deref()?)?;
        (whole_minutes(duration), 0)
    } else {
        let arrival = transit
            .iter()
            .rev()
            .find_map(|td| td.stop_details.as_ref()?.arrival_time.as_deref())?;
        let arrival = parse_instant(arrival, requested)?;

        let departure = transit
            .iter()
            .find_map(|td| td.stop_details.as_ref()?.departure_time.as_deref())
            .and_then(|s| parse_instant(s, requested));
        let wait = departure.map_or(0, |d| whole_minutes(d - requested));

        (whole_minutes(arrival - requested), wait)
    };

    let itinerary = Itinerary::new(total, wait, build_legs(steps));

    Some(match route.distance_meters {
        Some(meters) => itinerary.with_distance(meters),
        None => itinerary,
    })
}

/// Turn steps into legs, merging consecutive walking steps.
fn build_legs(steps: &[Step]) -> Vec<Leg> {
    let mut legs = Vec::new();
    let mut walking = false;
    let mut last_stop: Option<String> = None;

    for step in steps {
        let Some(details) = &step.transit_details else {
            walking = true;
            continue;
        };

        let stops = details.stop_details.as_ref();
        let from = stops
            .and_then(|s| s.departure_stop.as_ref())
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| "?".to_string());
        let to = stops
            .and_then(|s| s.arrival_stop.as_ref())
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| "?".to_string());

        if walking {
            let start = last_stop.take().unwrap_or_else(|| ORIGIN.to_string());
            legs.push(Leg::new(TransitMode::Walk, "", start, from.clone()));
            walking = false;
        }

        let (mode, line) = classify_line(details);
        legs.push(Leg::new(mode, line, from, to.clone()));
        last_stop = Some(to);
    }

    if walking {
        let start = last_stop.unwrap_or_else(|| ORIGIN.to_string());
        legs.push(Leg::new(TransitMode::Walk, "", start, DESTINATION));
    }

    legs
}

/// Vehicle mode and display name of a transit line.
fn classify_line(details: &TransitDetails) -> (TransitMode, String) {
    let line = details.transit_line.as_ref();

    let name = line
        .and_then(|l| l.name_short.clone().or_else(|| l.name.clone()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "?".to_string());

    let vehicle = line
        .and_then(|l| l.vehicle.as_ref())
        .and_then(|v| v.vehicle_type.as_deref())
        .unwrap_or("");

    let mode = match vehicle {
        "SUBWAY" | "METRO_RAIL" | "HEAVY_RAIL" | "COMMUTER_TRAIN" | "RAIL" | "MONORAIL" => {
            TransitMode::Subway
        }
        "BUS" | "INTERCITY_BUS" | "TROLLEYBUS" => {
            let short = line.and_then(|l| l.name_short.as_deref()).unwrap_or("");
            if short.starts_with('N') {
                TransitMode::NightBus
            } else {
                TransitMode::Bus
            }
        }
        _ => TransitMode::Other,
    };

    (mode, name)
}

/// Parse an RFC 3339 timestamp into the offset of `reference`.
fn parse_instant(s: &str, reference: LocalDateTime) -> Option<LocalDateTime> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&reference.timezone()))
}

/// Parse a protobuf duration string such as "3720s" or "95.5s".
fn parse_duration(s: &str) -> Option<Duration> {
    let secs: f64 = s.strip_suffix('s')?.parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::milliseconds((secs * 1000.0) as i64))
}
