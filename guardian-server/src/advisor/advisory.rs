//! The full night-travel advisory for one trip.

use tracing::info;

use crate::domain::{Itinerary, LocalDateTime, SearchWindow, TripQuery, truncate_to_minute};

use super::config::AdvisorConfig;
use super::feasibility::{SearchMode, classify};
use super::oracle::RoutingOracle;
use super::recommend::{Recommendation, recommend_departure};
use super::search::{EstimationError, EstimationResult, find_last_departure, probe};

/// Everything the advisor worked out for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct NightTravelAdvisory {
    /// Last departure using any transit.
    pub any_transit: EstimationResult,

    /// Last departure that still includes a subway leg.
    /// `None` when no subway route is usable anywhere in the window.
    pub subway_only: Option<EstimationResult>,

    /// When to leave for a comfortable trip.
    pub recommendation: Recommendation,

    /// Itinerary if leaving right now.
    pub current_route: Option<Itinerary>,

    /// Trip duration right now, used to judge degradation.
    pub baseline_duration_mins: i64,
}

impl NightTravelAdvisory {
    /// Routing-service calls made by both searches.
    pub fn search_calls(&self) -> usize {
        self.any_transit.oracle_calls + self.subway_only.as_ref().map_or(0, |r| r.oracle_calls)
    }
}

/// Compute the advisory for `query` at `now`.
///
/// The baseline probe and both searches run concurrently; the
/// recommendation follows once the any-transit last departure is known.
/// Fails with `NoFeasibleDeparture` when nothing usable runs tonight.
pub async fn compute_night_travel_advisory<O: RoutingOracle>(
    oracle: &O,
    query: &TripQuery,
    window: &SearchWindow,
    now: LocalDateTime,
    config: &AdvisorConfig,
) -> Result<NightTravelAdvisory, EstimationError> {
    let (current, any, subway) = tokio::join!(
        probe(oracle, query, now, config),
        find_last_departure(oracle, query, window, SearchMode::Any, config),
        find_last_departure(oracle, query, window, SearchMode::SubwayOnly, config),
    );

    let current_route = current?;
    let any_transit = any?;
    let subway_only = match subway {
        Ok(result) => Some(result),
        Err(EstimationError::NoFeasibleDeparture { .. }) => None,
        Err(e) => return Err(e),
    };

    // A route that only works by waiting for the morning is no baseline
    let baseline_duration_mins = current_route
        .as_ref()
        .filter(|it| classify(Some(*it), SearchMode::Any, config).is_available())
        .unwrap_or(&any_transit.best_known_itinerary)
        .total_duration_mins();

    let recommendation = recommend_departure(
        oracle,
        query,
        truncate_to_minute(now),
        any_transit.last_feasible_departure,
        baseline_duration_mins,
        config,
    )
    .await?;

    let advisory = NightTravelAdvisory {
        any_transit,
        subway_only,
        recommendation,
        current_route,
        baseline_duration_mins,
    };

    info!(
        origin = %query.origin,
        destination = %query.destination,
        any_last = %advisory.any_transit.last_feasible_departure,
        subway_last = ?advisory.subway_only.as_ref().map(|r| r.last_feasible_departure),
        recommended = %advisory.recommendation.depart_at,
        degraded = advisory.recommendation.degraded,
        baseline_duration_mins,
        search_calls = advisory.search_calls(),
        "advisory computed"
    );

    Ok(advisory)
}
