//! Departure recommendation.
//!
//! Night schedules thin out gradually: long before the last train, trips
//! already take much longer than during the day. The recommendation is the
//! latest departure on a coarse grid before the trip duration inflates past
//! a multiple of the baseline (the duration measured right now).

use chrono::Duration;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::domain::{Itinerary, LocalDateTime, TripQuery};

use super::config::AdvisorConfig;
use super::oracle::{OracleError, RoutingOracle};
use super::search::probe;

/// Suggested departure time.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// When to leave.
    pub depart_at: LocalDateTime,

    /// Trip duration observed for `depart_at`.
    /// `None` only when the routing service had no itinerary for it.
    pub projected_duration_mins: Option<i64>,

    /// True when no sample stayed within the comfort threshold and
    /// `depart_at` is only the earliest option.
    pub degraded: bool,
}

/// Sample instants from `from` towards `to`, spaced by the sample interval.
///
/// Starts at `from` unless capped. When the span would need more than
/// `max_samples` points, the earliest points (`from` included) are dropped so
/// the grid still ends as close to `to` as the spacing allows. A span that is
/// empty or inverted yields `[from]` alone.
pub fn sample_grid(
    from: LocalDateTime,
    to: LocalDateTime,
    config: &AdvisorConfig,
) -> Vec<LocalDateTime> {
    let step = config.sample_interval();

    let count = if to > from && step > Duration::zero() {
        ((to - from).num_seconds() / step.num_seconds()) as usize + 1
    } else {
        1
    };

    let limit = config.max_samples.max(1);
    let skip = count.saturating_sub(limit);
    if skip > 0 {
        warn!(
            count,
            limit, "recommendation grid exceeds sample limit, dropping earliest samples"
        );
    }

    (skip..count).map(|i| from + step * i as i32).collect()
}

/// Pick the recommendation from `(instant, duration)` samples in time order.
///
/// Takes the last sample within `factor * baseline` before the first one
/// above it. Samples without a duration are skipped. Samples after `to`
/// never qualify.
fn pick(
    samples: &[(LocalDateTime, Option<i64>)],
    from: LocalDateTime,
    to: LocalDateTime,
    baseline_mins: i64,
    factor: f64,
) -> Recommendation {
    let threshold = factor * baseline_mins as f64;

    let mut chosen = None;
    for &(at, duration) in samples {
        if at > to {
            break;
        }
        let Some(duration) = duration else {
            continue;
        };
        if duration as f64 > threshold {
            break;
        }
        chosen = Some((at, duration));
    }

    if let Some((depart_at, duration)) = chosen {
        return Recommendation {
            depart_at,
            projected_duration_mins: Some(duration),
            degraded: false,
        };
    }

    let (depart_at, projected_duration_mins) = samples
        .iter()
        .find(|(_, duration)| duration.is_some())
        .or_else(|| samples.first())
        .copied()
        .unwrap_or((from, None));

    Recommendation {
        depart_at,
        projected_duration_mins,
        degraded: true,
    }
}

/// Recommend a departure between `from` and `to`.
///
/// Grid samples are independent and queried concurrently. A failed sample
/// fails the whole recommendation.
pub async fn recommend_departure<O: RoutingOracle>(
    oracle: &O,
    query: &TripQuery,
    from: LocalDateTime,
    to: LocalDateTime,
    baseline_mins: i64,
    config: &AdvisorConfig,
) -> Result<Recommendation, OracleError> {
    let grid = sample_grid(from, to, config);

    let itineraries =
        try_join_all(grid.iter().map(|at| probe(oracle, query, *at, config))).await?;

    let samples: Vec<(LocalDateTime, Option<i64>)> = grid
        .into_iter()
        .zip(
            itineraries
                .iter()
                .map(|it| it.as_ref().map(Itinerary::total_duration_mins)),
        )
        .collect();

    let recommendation = pick(&samples, from, to, baseline_mins, config.degradation_factor);
    debug!(
        samples = samples.len(),
        baseline_mins,
        depart_at = %recommendation.depart_at,
        degraded = recommendation.degraded,
        "recommendation picked"
    );

    Ok(recommendation)
}
