//! Unit tests for the last-departure search.

use super::*;
use crate::domain::{Itinerary, Leg, LocalDateTime, Location, SearchWindow, TransitMode, TripQuery};
use chrono::{DateTime, Duration};
use std::sync::Mutex;

fn t(s: &str) -> LocalDateTime {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn window() -> SearchWindow {
    SearchWindow::new(t("2024-03-15T20:30:00+09:00"), t("2024-03-16T02:00:00+09:00")).unwrap()
}

fn query() -> TripQuery {
    TripQuery::new(Location::address("Hongik Univ."), Location::address("Suwon"))
}

fn subway_trip() -> Itinerary {
    Itinerary::new(
        70,
        4,
        vec![
            Leg::new(TransitMode::Walk, "", "origin", "Hongik Univ."),
            Leg::new(TransitMode::Subway, "2", "Hongik Univ.", "Sindorim"),
            Leg::new(TransitMode::Subway, "1", "Sindorim", "Suwon"),
        ],
    )
}

fn bus_trip() -> Itinerary {
    Itinerary::new(
        95,
        12,
        vec![Leg::new(TransitMode::NightBus, "N26", "Hapjeong", "Suwon")],
    )
}

/// Waits at a stop for the first morning train.
fn morning_trip() -> Itinerary {
    Itinerary::new(
        320,
        250,
        vec![Leg::new(TransitMode::Subway, "1", "Sindorim", "Suwon")],
    )
}

/// Mock oracle with a scripted timetable.
///
/// Subway trips until `subway_until`, then night buses until `bus_until`,
/// then whatever `after` is.
struct MockOracle {
    subway_until: LocalDateTime,
    bus_until: LocalDateTime,
    after: Option<Itinerary>,
    fail_on_call: Option<usize>,
    probes: Mutex<Vec<LocalDateTime>>,
}

impl MockOracle {
    fn flip_at(s: &str) -> Self {
        Self {
            subway_until: t(s),
            bus_until: t(s),
            after: None,
            fail_on_call: None,
            probes: Mutex::new(Vec::new()),
        }
    }

    fn with_buses_until(mut self, s: &str) -> Self {
        self.bus_until = t(s);
        self
    }

    fn call_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    fn probes(&self) -> Vec<LocalDateTime> {
        self.probes.lock().unwrap().clone()
    }
}

impl RoutingOracle for MockOracle {
    async fn query_itinerary(
        &self,
        _origin: &Location,
        _destination: &Location,
        depart_at: LocalDateTime,
    ) -> Result<Option<Itinerary>, OracleError> {
        let call = {
            let mut probes = self.probes.lock().unwrap();
            probes.push(depart_at);
            probes.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(OracleError::Unavailable("HTTP 503".into()));
        }

        if depart_at <= self.subway_until {
            Ok(Some(subway_trip()))
        } else if depart_at <= self.bus_until {
            Ok(Some(bus_trip()))
        } else {
            Ok(self.after.clone())
        }
    }
}

#[tokio::test]
async fn finds_flip_within_tolerance() {
    let oracle = MockOracle::flip_at("2024-03-15T23:17:00+09:00");
    let config = AdvisorConfig::default();

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config)
        .await
        .unwrap();

    let flip = t("2024-03-15T23:17:00+09:00");
    assert!(result.last_feasible_departure <= flip);
    assert!(flip - result.last_feasible_departure <= Duration::minutes(6));

    // Two boundary probes plus one per bisection step
    assert_eq!(oracle.call_count(), 8);
    assert_eq!(result.oracle_calls, 8);

    // 330 minutes halved six times, then halved again
    assert!((result.tolerance_mins() - 330.0 / 128.0).abs() < 0.01);
    assert_eq!(result.best_known_itinerary, subway_trip());
    assert_eq!(result.mode, SearchMode::Any);
}

#[tokio::test]
async fn bisection_keeps_feasible_low_and_infeasible_high() {
    let oracle = MockOracle::flip_at("2024-03-16T00:41:00+09:00");
    let config = AdvisorConfig::default();

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config)
        .await
        .unwrap();

    let flip = t("2024-03-16T00:41:00+09:00");
    let probes = oracle.probes();

    // Every probe after the first two is the midpoint of the tightest
    // known feasible/infeasible pair at that moment
    let mut lo = probes[0];
    let mut hi = probes[1];
    for &mid in &probes[2..] {
        assert_eq!(mid, lo + (hi - lo) / 2);
        if mid <= flip {
            lo = mid;
        } else {
            hi = mid;
        }
        assert!(lo <= flip && flip < hi);
    }

    assert_eq!(result.last_feasible_departure, lo);
    assert_eq!(result.tolerance * 2, hi - lo);
}

#[tokio::test]
async fn unavailable_at_window_start() {
    let oracle = MockOracle::flip_at("2024-03-15T20:00:00+09:00");
    let config = AdvisorConfig::default();

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config).await;

    assert_eq!(
        result,
        Err(EstimationError::NoFeasibleDeparture {
            earliest: window().earliest(),
            latest: window().latest(),
        })
    );
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn available_at_window_end() {
    let oracle = MockOracle::flip_at("2024-03-16T05:00:00+09:00");
    let config = AdvisorConfig::default();

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config)
        .await
        .unwrap();

    assert_eq!(result.last_feasible_departure, window().latest());
    assert_eq!(result.tolerance, Duration::zero());
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn morning_itineraries_count_as_unavailable() {
    let oracle = MockOracle {
        after: Some(morning_trip()),
        ..MockOracle::flip_at("2024-03-15T23:50:00+09:00")
    };
    let config = AdvisorConfig::default();

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config)
        .await
        .unwrap();

    let flip = t("2024-03-15T23:50:00+09:00");
    assert!(result.last_feasible_departure <= flip);
    assert!(flip - result.last_feasible_departure <= Duration::minutes(6));
}

#[tokio::test]
async fn subway_search_ignores_bus_routes() {
    let oracle = MockOracle::flip_at("2024-03-15T23:30:00+09:00")
        .with_buses_until("2024-03-16T01:20:00+09:00");
    let config = AdvisorConfig::default();

    let any = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config)
        .await
        .unwrap();
    let subway =
        find_last_departure(&oracle, &query(), &window(), SearchMode::SubwayOnly, &config)
            .await
            .unwrap();

    let any_error = any.last_feasible_departure - t("2024-03-16T01:20:00+09:00");
    let subway_error = subway.last_feasible_departure - t("2024-03-15T23:30:00+09:00");
    assert!(any_error.num_minutes().abs() <= 6);
    assert!(subway_error.num_minutes().abs() <= 6);
    assert!(subway.best_known_itinerary.includes_subway());
    assert_eq!(any.best_known_itinerary, bus_trip());
    assert_eq!(subway.mode, SearchMode::SubwayOnly);
}

#[tokio::test]
async fn no_subway_at_all() {
    let oracle = MockOracle::flip_at("2024-03-15T20:00:00+09:00")
        .with_buses_until("2024-03-16T01:20:00+09:00");
    let config = AdvisorConfig::default();

    let result =
        find_last_departure(&oracle, &query(), &window(), SearchMode::SubwayOnly, &config).await;

    assert!(matches!(
        result,
        Err(EstimationError::NoFeasibleDeparture { .. })
    ));
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn oracle_error_aborts_search() {
    let oracle = MockOracle {
        fail_on_call: Some(4),
        ..MockOracle::flip_at("2024-03-15T23:17:00+09:00")
    };
    let config = AdvisorConfig::default();

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config).await;

    assert_eq!(
        result,
        Err(EstimationError::Oracle(OracleError::Unavailable(
            "HTTP 503".into()
        )))
    );
    assert_eq!(oracle.call_count(), 4);
}

#[tokio::test]
async fn fewer_steps_widen_tolerance() {
    let oracle = MockOracle::flip_at("2024-03-15T23:17:00+09:00");
    let config = AdvisorConfig {
        bisection_steps: 0,
        ..AdvisorConfig::default()
    };

    let result = find_last_departure(&oracle, &query(), &window(), SearchMode::Any, &config)
        .await
        .unwrap();

    assert_eq!(result.last_feasible_departure, window().earliest());
    assert_eq!(result.tolerance, Duration::minutes(165));
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_oracle_times_out() {
    struct Stuck;

    impl RoutingOracle for Stuck {
        async fn query_itinerary(
            &self,
            _origin: &Location,
            _destination: &Location,
            _depart_at: LocalDateTime,
        ) -> Result<Option<Itinerary>, OracleError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    let config = AdvisorConfig {
        oracle_timeout_secs: 3,
        ..AdvisorConfig::default()
    };

    let result = find_last_departure(&Stuck, &query(), &window(), SearchMode::Any, &config).await;

    assert_eq!(
        result,
        Err(EstimationError::Oracle(OracleError::Timeout(
            std::time::Duration::from_secs(3)
        )))
    );
}

#[tokio::test(start_paused = true)]
async fn waiting_for_a_call_slot_is_not_timed() {
    /// One call in flight at a time, two seconds each.
    struct SingleLane {
        lane: tokio::sync::Semaphore,
    }

    impl RoutingOracle for SingleLane {
        fn call_limit(&self) -> Option<&tokio::sync::Semaphore> {
            Some(&self.lane)
        }

        async fn query_itinerary(
            &self,
            _origin: &Location,
            _destination: &Location,
            depart_at: LocalDateTime,
        ) -> Result<Option<Itinerary>, OracleError> {
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            Ok((depart_at <= t("2024-03-15T23:17:00+09:00")).then(subway_trip))
        }
    }

    let oracle = SingleLane {
        lane: tokio::sync::Semaphore::new(1),
    };
    let config = AdvisorConfig {
        oracle_timeout_secs: 3,
        ..AdvisorConfig::default()
    };

    // Both searches compete for the lane; every call queues for up to 2s
    let (q1, w1) = (query(), window());
    let (q2, w2) = (query(), window());
    let (any, subway) = tokio::join!(
        find_last_departure(&oracle, &q1, &w1, SearchMode::Any, &config),
        find_last_departure(&oracle, &q2, &w2, SearchMode::SubwayOnly, &config),
    );

    assert_eq!(any.unwrap().oracle_calls, 8);
    assert_eq!(subway.unwrap().oracle_calls, 8);
}
