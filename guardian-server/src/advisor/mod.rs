//! Last-departure estimation.
//!
//! The routing service can only answer "what itinerary do I get if I leave
//! at time T?". This module turns that single question into:
//!
//! - the last departure using any transit, and the last one that still
//!   includes the subway (bisection over the night window)
//! - a recommended departure before trips become uncomfortably long
//! - an urgency level for the current time

mod advisory;
mod config;
mod feasibility;
mod oracle;
mod recommend;
mod search;
mod urgency;

#[cfg(test)]
mod search_tests;

pub use advisory::{NightTravelAdvisory, compute_night_travel_advisory};
pub use config::AdvisorConfig;
pub use feasibility::{SearchMode, Verdict, classify};
pub use oracle::{OracleError, RoutingOracle};
pub use recommend::{Recommendation, recommend_departure, sample_grid};
pub use search::{EstimationError, EstimationResult, find_last_departure};
pub use urgency::{HURRY_MINS, RUN_NOW_MINS, Urgency};
