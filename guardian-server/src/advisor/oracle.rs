//! Routing-service boundary.
//!
//! The advisor only ever asks one question of the outside world: "what is
//! the best transit itinerary if I leave at this instant?". Everything it
//! knows about last departures is inferred from the answers.

use std::future::Future;

use tokio::sync::Semaphore;

use crate::domain::{Itinerary, LocalDateTime, Location};

/// Failure to get an answer from the routing service.
///
/// Both kinds are transient infrastructure failures and are never confused
/// with "no itinerary".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// Network, authentication, quota or malformed-response failure
    #[error("routing service unavailable: {0}")]
    Unavailable(String),

    /// No answer within the allowed wait
    #[error("routing service timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Source of transit itineraries.
///
/// This abstraction allows the advisor to be tested against scripted
/// itineraries instead of the live routing service.
pub trait RoutingOracle: Send + Sync {
    /// Limit on calls in flight, shared by everyone using this oracle.
    ///
    /// Callers hold a permit while `query_itinerary` runs; the per-call
    /// time limit starts once the permit is granted, so waiting for a free
    /// slot never counts as a timeout. Implementations that return a limit
    /// must not also acquire it inside `query_itinerary`.
    fn call_limit(&self) -> Option<&Semaphore> {
        None
    }

    /// Best itinerary from `origin` to `destination` departing at `depart_at`.
    ///
    /// Returns `Ok(None)` when the routing service has no itinerary at all
    /// for that instant.
    fn query_itinerary(
        &self,
        origin: &Location,
        destination: &Location,
        depart_at: LocalDateTime,
    ) -> impl Future<Output = Result<Option<Itinerary>, OracleError>> + Send;
}
