//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::advisor::{EstimationResult, NightTravelAdvisory, Recommendation, Urgency};
use crate::domain::{Leg, LocalDateTime, TripQuery, format_hhmm, whole_minutes};

/// Request for a night-travel advisory.
///
/// Both fields are optional at the extractor level so a missing one is
/// reported as a JSON `bad_request` rather than a plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AdvisoryRequest {
    /// Place name, address, or "lat,lng"
    pub origin: Option<String>,

    /// Place name, address, or "lat,lng"
    pub destination: Option<String>,
}

/// Full advisory response.
#[derive(Debug, Serialize)]
pub struct AdvisoryResponse {
    pub origin: String,
    pub destination: String,

    /// When the advisory was computed (RFC 3339)
    pub generated_at: String,

    /// Trip distance of the current route, in kilometres
    pub distance_km: Option<f64>,

    /// Legs of the itinerary if leaving now
    pub current_route: Vec<LegResult>,

    /// Trip duration right now, in minutes
    pub baseline_duration_mins: i64,

    /// Last departure using any transit
    pub any_transit: EstimateResult,

    /// Last departure including the subway, if there is one tonight
    pub subway_only: Option<EstimateResult>,

    /// Suggested departure
    pub recommended: RecommendationResult,

    pub urgency: UrgencyResult,
}

/// A last-departure estimate.
#[derive(Debug, Serialize)]
pub struct EstimateResult {
    /// Last departure as "HH:MM"
    pub departure: String,

    /// Last departure (RFC 3339)
    pub departure_time: String,

    /// Trip duration when leaving at the last departure
    pub duration_mins: i64,

    /// Minutes from now until the last departure; negative once gone
    pub minutes_left: i64,

    /// Uncertainty of the estimate, in minutes either side
    pub tolerance_mins: f64,

    /// Number of routing queries made by the search
    pub oracle_calls: usize,

    /// The route at the last departure rides a night bus
    pub night_bus: bool,
}

/// A recommended departure.
#[derive(Debug, Serialize)]
pub struct RecommendationResult {
    /// Departure as "HH:MM"
    pub departure: String,

    /// Departure (RFC 3339)
    pub departure_time: String,

    /// Expected trip duration
    pub duration_mins: Option<i64>,

    /// Minutes from now until the recommended departure
    pub minutes_left: i64,

    /// True when every option is already much slower than now
    pub degraded: bool,
}

/// Urgency classification.
#[derive(Debug, Serialize)]
pub struct UrgencyResult {
    /// Machine-readable level, e.g. "hurry"
    pub level: String,
    pub headline: String,
    pub advice: String,
}

/// One leg of an itinerary.
#[derive(Debug, Serialize)]
pub struct LegResult {
    /// "subway", "bus", "night bus", "walk" or "transit"
    pub mode: String,
    pub icon: String,
    /// Line name; empty for walks
    pub line: String,
    pub from: String,
    pub to: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Stable error category, e.g. "no_route"
    pub kind: String,
}

// Conversion implementations

impl AdvisoryResponse {
    /// Create from a computed advisory.
    pub fn from_advisory(
        query: &TripQuery,
        advisory: &NightTravelAdvisory,
        now: LocalDateTime,
    ) -> Self {
        let current_route = advisory
            .current_route
            .as_ref()
            .map(|it| it.legs().iter().map(LegResult::from_leg).collect())
            .unwrap_or_default();

        let distance_km = advisory
            .current_route
            .as_ref()
            .and_then(|it| it.distance_meters())
            .map(|m| m as f64 / 1000.0);

        let urgency = Urgency::assess(
            now,
            Some(advisory.any_transit.last_feasible_departure),
            advisory
                .subway_only
                .as_ref()
                .map(|r| r.last_feasible_departure),
        );

        Self {
            origin: query.origin.to_string(),
            destination: query.destination.to_string(),
            generated_at: now.to_rfc3339(),
            distance_km,
            current_route,
            baseline_duration_mins: advisory.baseline_duration_mins,
            any_transit: EstimateResult::from_estimate(&advisory.any_transit, now),
            subway_only: advisory
                .subway_only
                .as_ref()
                .map(|r| EstimateResult::from_estimate(r, now)),
            recommended: RecommendationResult::from_recommendation(&advisory.recommendation, now),
            urgency: UrgencyResult::from_urgency(&urgency),
        }
    }
}

impl EstimateResult {
    /// Create from a search result.
    pub fn from_estimate(result: &EstimationResult, now: LocalDateTime) -> Self {
        let departure = result.last_feasible_departure;
        Self {
            departure: format_hhmm(departure),
            departure_time: departure.to_rfc3339(),
            duration_mins: result.best_known_itinerary.total_duration_mins(),
            minutes_left: whole_minutes(departure - now),
            tolerance_mins: (result.tolerance_mins() * 10.0).round() / 10.0,
            oracle_calls: result.oracle_calls,
            night_bus: result.best_known_itinerary.has_night_bus(),
        }
    }
}

impl RecommendationResult {
    /// Create from a recommendation.
    pub fn from_recommendation(rec: &Recommendation, now: LocalDateTime) -> Self {
        Self {
            departure: format_hhmm(rec.depart_at),
            departure_time: rec.depart_at.to_rfc3339(),
            duration_mins: rec.projected_duration_mins,
            minutes_left: whole_minutes(rec.depart_at - now),
            degraded: rec.degraded,
        }
    }
}

impl UrgencyResult {
    /// Create from an urgency level.
    pub fn from_urgency(urgency: &Urgency) -> Self {
        Self {
            level: urgency.kind().to_string(),
            headline: urgency.headline().to_string(),
            advice: urgency.advice(),
        }
    }
}

impl LegResult {
    /// Create from a domain Leg.
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            mode: leg.mode.label().to_string(),
            icon: leg.mode.icon().to_string(),
            line: leg.line_name.clone(),
            from: leg.from_stop.clone(),
            to: leg.to_stop.clone(),
        }
    }
}
