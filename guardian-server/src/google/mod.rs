//! Google Routes API client.
//!
//! Answers the advisor's one question, "what is the best transit itinerary
//! leaving at this instant?", using the `computeRoutes` endpoint.
//!
//! Key characteristics of the Routes API:
//! - Departure and stop times are RFC 3339 timestamps in UTC
//! - Durations are strings of seconds with an "s" suffix ("3720s")
//! - Only fields named in the `X-Goog-FieldMask` header are returned
//! - An empty response body (no `routes`) means no route at all

mod client;
mod convert;
mod error;
mod types;

pub use client::{RoutesClient, RoutesConfig};
pub use convert::convert_response;
pub use error::RoutesError;
pub use types::{
    ComputeRoutesRequest, ComputeRoutesResponse, LatLng, Route, RouteLeg, Step, StopDetails,
    TransitDetails, TransitLine, Waypoint,
};
