//! Caching layer for routing-service answers.
//!
//! One advisory makes dozens of routing queries, and the two searches start
//! from the same window boundaries. Answers are cached per minute of
//! departure, so repeated and concurrent requests for the same trip share
//! the work. Concurrent misses on the same key are coalesced into a single
//! upstream call.
//!
//! Only answers are cached ("this itinerary" or "no route"); failures are
//! not, so the next request retries.
//!
//! The routing service is asked about the start of the minute, so every
//! caller within that minute gets the same durations whichever of them
//! missed first.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::Semaphore;

use crate::advisor::{OracleError, RoutingOracle};
use crate::domain::{Itinerary, LocalDateTime, Location, truncate_to_minute};
use crate::google::RoutesClient;

/// Cache key: (origin, destination, departure minute as a Unix timestamp).
type RouteKey = (String, String, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Routing oracle with caching.
///
/// Wraps the Google Routes client by default; any oracle can be wrapped.
pub struct CachedRoutesClient<O = RoutesClient> {
    client: O,
    routes: MokaCache<RouteKey, Option<Itinerary>>,
}

impl<O: RoutingOracle> CachedRoutesClient<O> {
    /// Create a new cached client.
    pub fn new(client: O, cache_config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(cache_config.ttl)
            .max_capacity(cache_config.max_capacity)
            .build();

        Self { client, routes }
    }

    fn key(origin: &Location, destination: &Location, minute: LocalDateTime) -> RouteKey {
        (origin.to_string(), destination.to_string(), minute.timestamp())
    }
}

impl<O: RoutingOracle> RoutingOracle for CachedRoutesClient<O> {
    fn call_limit(&self) -> Option<&Semaphore> {
        self.client.call_limit()
    }

    async fn query_itinerary(
        &self,
        origin: &Location,
        destination: &Location,
        depart_at: LocalDateTime,
    ) -> Result<Option<Itinerary>, OracleError> {
        let minute = truncate_to_minute(depart_at);
        let key = Self::key(origin, destination, minute);

        self.routes
            .try_get_with(key, self.client.query_itinerary(origin, destination, minute))
            .await
            .map_err(|e: Arc<OracleError>| (*e).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, TransitMode};
    use chrono::DateTime;
    use std::sync::Mutex;

    fn t(s: &str) -> LocalDateTime {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    /// Records upstream departures; fails while `failing` is set.
    #[derive(Default)]
    struct Upstream {
        asked: Mutex<Vec<LocalDateTime>>,
        failing: Mutex<bool>,
    }

    impl Upstream {
        fn calls(&self) -> usize {
            self.asked.lock().unwrap().len()
        }
    }

    struct CountingOracle(Arc<Upstream>);

    impl RoutingOracle for CountingOracle {
        async fn query_itinerary(
            &self,
            _origin: &Location,
            destination: &Location,
            depart_at: LocalDateTime,
        ) -> Result<Option<Itinerary>, OracleError> {
            self.0.asked.lock().unwrap().push(depart_at);

            if *self.0.failing.lock().unwrap() {
                return Err(OracleError::Unavailable("HTTP 503".into()));
            }

            if depart_at.format("%H").to_string() == "03" {
                return Ok(None);
            }

            let legs = vec![Leg::new(TransitMode::Bus, "N13", "A", destination.to_string())];
            Ok(Some(Itinerary::new(40, 5, legs)))
        }
    }

    fn cached() -> (CachedRoutesClient<CountingOracle>, Arc<Upstream>) {
        let upstream = Arc::new(Upstream::default());
        let cache = CachedRoutesClient::new(
            CountingOracle(Arc::clone(&upstream)),
            &CacheConfig::default(),
        );
        (cache, upstream)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn same_minute_hits_cache() {
        let (cache, upstream) = cached();
        let a = Location::address("Jamsil");
        let b = Location::address("Bundang");

        let first = cache
            .query_itinerary(&a, &b, t("2024-03-15T23:10:55+09:00"))
            .await
            .unwrap();
        let second = cache
            .query_itinerary(&a, &b, t("2024-03-15T23:10:05+09:00"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn upstream_is_asked_about_the_minute() {
        let (cache, upstream) = cached();
        let a = Location::address("Jamsil");
        let b = Location::address("Bundang");

        cache
            .query_itinerary(&a, &b, t("2024-03-15T23:10:55.500+09:00"))
            .await
            .unwrap();

        assert_eq!(*upstream.asked.lock().unwrap(), vec![t("2024-03-15T23:10:00+09:00")]);
    }

    #[tokio::test]
    async fn different_keys_miss() {
        let (cache, upstream) = cached();
        let a = Location::address("Jamsil");
        let b = Location::address("Bundang");
        let c = Location::coordinates(37.39, 127.11);

        cache.query_itinerary(&a, &b, t("2024-03-15T23:10:00+09:00")).await.unwrap();
        cache.query_itinerary(&a, &b, t("2024-03-15T23:11:00+09:00")).await.unwrap();
        cache.query_itinerary(&a, &c, t("2024-03-15T23:10:00+09:00")).await.unwrap();

        assert_eq!(upstream.calls(), 3);
    }

    #[tokio::test]
    async fn no_route_is_cached() {
        let (cache, upstream) = cached();
        let a = Location::address("Jamsil");
        let b = Location::address("Bundang");

        for _ in 0..3 {
            let answer = cache
                .query_itinerary(&a, &b, t("2024-03-16T03:30:00+09:00"))
                .await
                .unwrap();
            assert_eq!(answer, None);
        }

        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let (cache, upstream) = cached();
        let a = Location::address("Jamsil");
        let b = Location::address("Bundang");
        let at = t("2024-03-15T23:10:00+09:00");

        *upstream.failing.lock().unwrap() = true;
        let err = cache.query_itinerary(&a, &b, at).await.unwrap_err();
        assert_eq!(err, OracleError::Unavailable("HTTP 503".into()));

        *upstream.failing.lock().unwrap() = false;
        assert!(cache.query_itinerary(&a, &b, at).await.unwrap().is_some());
        assert_eq!(upstream.calls(), 2);
    }

    #[test]
    fn call_limit_is_the_wrapped_oracles() {
        let (cache, _) = cached();
        assert!(cache.call_limit().is_none());
    }
}
