//! Google Routes API request and response DTOs.
//!
//! The response types only cover the fields requested through the field
//! mask. Google omits empty fields instead of sending nulls, so nearly
//! everything is optional.

use serde::{Deserialize, Serialize};

/// Body of a `computeRoutes` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRoutesRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    /// Always "TRANSIT" for this service.
    pub travel_mode: &'static str,
    /// RFC 3339 timestamp in UTC, e.g. "2024-03-15T14:00:00Z".
    pub departure_time: String,
    pub language_code: String,
    pub region_code: String,
}

/// Either a free-text address or a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Waypoint {
    Address(String),
    Location {
        #[serde(rename = "latLng")]
        lat_lng: LatLng,
    },
}

/// Coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response from `computeRoutes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRoutesResponse {
    /// Empty or missing when there is no route at all.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One alternative route. The first is the recommended one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Total travel time as seconds with an "s" suffix, e.g. "3720s".
    pub duration: Option<String>,

    pub distance_meters: Option<u64>,

    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// A route leg between two waypoints. Transit requests have exactly one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A single instruction: a stretch of walking or one transit ride.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// "WALK" or "TRANSIT".
    pub travel_mode: Option<String>,

    /// Present on transit steps only.
    pub transit_details: Option<TransitDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitDetails {
    pub stop_details: Option<StopDetails>,
    pub transit_line: Option<TransitLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDetails {
    pub departure_stop: Option<Stop>,
    pub arrival_stop: Option<Stop>,
    /// RFC 3339 timestamp in UTC.
    pub departure_time: Option<String>,
    /// RFC 3339 timestamp in UTC.
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stop {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitLine {
    pub name: Option<String>,
    pub name_short: Option<String>,
    pub vehicle: Option<Vehicle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vehicle {
    /// Vehicle type, e.g. "SUBWAY", "BUS", "HEAVY_RAIL".
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}
