//! Last-departure bisection search.
//!
//! Finds the latest instant in a night window that still yields a usable
//! itinerary, assuming feasibility is monotonic inside the window (leaving
//! later never makes a trip possible that was impossible earlier).
//!
//! The search does a fixed number of bisection steps instead of stopping on
//! interval width, so every search costs the same number of routing-service
//! calls: two boundary probes plus `bisection_steps`.

use chrono::Duration;
use tracing::debug;

use crate::domain::{Itinerary, LocalDateTime, SearchWindow, TripQuery};

use super::config::AdvisorConfig;
use super::feasibility::{SearchMode, classify};
use super::oracle::{OracleError, RoutingOracle};

/// Error from last-departure estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    /// Nothing usable in the window (already past the last service, or no
    /// night service at all)
    #[error("no feasible departure between {earliest} and {latest}")]
    NoFeasibleDeparture {
        earliest: LocalDateTime,
        latest: LocalDateTime,
    },

    /// The routing service failed; the search was abandoned
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Result of one last-departure search.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    /// Which itineraries counted.
    pub mode: SearchMode,

    /// Latest instant known to be feasible.
    pub last_feasible_departure: LocalDateTime,

    /// Half the width of the final bisection interval.
    /// Zero when the whole window was feasible.
    pub tolerance: Duration,

    /// Itinerary observed at `last_feasible_departure`.
    pub best_known_itinerary: Itinerary,

    /// Number of routing-service calls this search made.
    pub oracle_calls: usize,
}

impl EstimationResult {
    /// Tolerance in (fractional) minutes.
    pub fn tolerance_mins(&self) -> f64 {
        self.tolerance.num_milliseconds() as f64 / 60_000.0
    }
}

/// Query the routing service once, bounded by the configured timeout.
///
/// Waiting for one of the oracle's call slots is not timed; only the call
/// itself is.
pub(crate) async fn probe<O: RoutingOracle>(
    oracle: &O,
    query: &TripQuery,
    depart_at: LocalDateTime,
    config: &AdvisorConfig,
) -> Result<Option<Itinerary>, OracleError> {
    let _permit = match oracle.call_limit() {
        Some(slots) => Some(
            slots
                .acquire()
                .await
                .map_err(|_| OracleError::Unavailable("routing client shut down".to_string()))?,
        ),
        None => None,
    };

    let limit = config.oracle_timeout();
    let call = oracle.query_itinerary(&query.origin, &query.destination, depart_at);

    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout(limit)),
    }
}

/// Keep an itinerary only if it classifies as available.
fn usable(
    itinerary: Option<Itinerary>,
    mode: SearchMode,
    config: &AdvisorConfig,
) -> Option<Itinerary> {
    itinerary.filter(|it| classify(Some(it), mode, config).is_available())
}

/// Find the last feasible departure inside `window`.
///
/// Fails with `NoFeasibleDeparture` when the window start is already
/// infeasible; no further calls are made in that case. Any routing-service
/// failure aborts the search immediately.
pub async fn find_last_departure<O: RoutingOracle>(
    oracle: &O,
    query: &TripQuery,
    window: &SearchWindow,
    mode: SearchMode,
    config: &AdvisorConfig,
) -> Result<EstimationResult, EstimationError> {
    let earliest = window.earliest();
    let latest = window.latest();
    let mut oracle_calls = 0;
    debug!(%mode, %earliest, %latest, span_mins = window.span().num_minutes(), "search started");

    oracle_calls += 1;
    let at_start = usable(probe(oracle, query, earliest, config).await?, mode, config);
    debug!(%mode, at = %earliest, available = at_start.is_some(), "window start");
    let Some(mut best) = at_start else {
        return Err(EstimationError::NoFeasibleDeparture { earliest, latest });
    };

    oracle_calls += 1;
    let at_end = usable(probe(oracle, query, latest, config).await?, mode, config);
    debug!(%mode, at = %latest, available = at_end.is_some(), "window end");
    if let Some(itinerary) = at_end {
        return Ok(EstimationResult {
            mode,
            last_feasible_departure: latest,
            tolerance: Duration::zero(),
            best_known_itinerary: itinerary,
            oracle_calls,
        });
    }

    // lo is always feasible, hi never is
    let mut lo = earliest;
    let mut hi = latest;

    for step in 0..config.bisection_steps {
        let mid = lo + (hi - lo) / 2;

        oracle_calls += 1;
        let at_mid = usable(probe(oracle, query, mid, config).await?, mode, config);
        debug!(%mode, step, at = %mid, available = at_mid.is_some(), "bisection step");
        match at_mid {
            Some(itinerary) => {
                lo = mid;
                best = itinerary;
            }
            None => hi = mid,
        }
    }

    let tolerance = (hi - lo) / 2;
    debug!(%mode, last = %lo, tolerance_secs = tolerance.num_seconds(), "last departure found");

    Ok(EstimationResult {
        mode,
        last_feasible_departure: lo,
        tolerance,
        best_known_itinerary: best,
        oracle_calls,
    })
}
