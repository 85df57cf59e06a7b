//! Itinerary types.
//!
//! An `Itinerary` is the routing service's best answer for one requested
//! departure instant, reduced to the handful of facts the advisor reasons
//! about: how long the trip takes, how long you stand around before the
//! first vehicle, and which kinds of vehicles are involved.

use std::fmt;

/// Kind of movement in one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitMode {
    /// Metro or other rail
    Subway,
    /// Regular bus
    Bus,
    /// Late-night bus (N-prefixed lines)
    NightBus,
    /// Walking between stops or to/from the endpoints
    Walk,
    /// Anything else (ferry, tram, cable car, ...)
    Other,
}

impl TransitMode {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransitMode::Subway => "subway",
            TransitMode::Bus => "bus",
            TransitMode::NightBus => "night bus",
            TransitMode::Walk => "walk",
            TransitMode::Other => "transit",
        }
    }

    /// Pictogram for display.
    pub fn icon(&self) -> &'static str {
        match self {
            TransitMode::Subway => "🚇",
            TransitMode::Bus | TransitMode::NightBus => "🚌",
            TransitMode::Walk => "🚶",
            TransitMode::Other => "🚃",
        }
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub mode: TransitMode,
    /// Line name as shown to riders ("2", "N61", ...); empty for walks
    pub line_name: String,
    pub from_stop: String,
    pub to_stop: String,
}

impl Leg {
    /// Create a new leg.
    pub fn new(
        mode: TransitMode,
        line_name: impl Into<String>,
        from_stop: impl Into<String>,
        to_stop: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            line_name: line_name.into(),
            from_stop: from_stop.into(),
            to_stop: to_stop.into(),
        }
    }
}

/// A routing-service itinerary for one requested departure.
///
/// # Invariants
///
/// - `wait_before_departure_mins() >= 0`
/// - `includes_subway()` is true exactly when some leg is `Subway`
///
/// # Examples
///
/// ```
/// use guardian_server::domain::{Itinerary, Leg, TransitMode};
///
/// let itinerary = Itinerary::new(
///     75,
///     -3,
///     vec![
///         Leg::new(TransitMode::Subway, "1", "Incheon Nat'l Univ.", "Bupyeong"),
///         Leg::new(TransitMode::Subway, "2", "Sindorim", "Gangnam"),
///     ],
/// );
///
/// assert!(itinerary.includes_subway());
/// assert_eq!(itinerary.wait_before_departure_mins(), 0); // clamped
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    total_duration_mins: i64,
    wait_before_departure_mins: i64,
    legs: Vec<Leg>,
    includes_subway: bool,
    distance_meters: Option<u64>,
}

impl Itinerary {
    /// Construct an itinerary, deriving the subway flag from its legs.
    ///
    /// Negative waits are clamped to zero.
    pub fn new(total_duration_mins: i64, wait_before_departure_mins: i64, legs: Vec<Leg>) -> Self {
        let includes_subway = legs.iter().any(|leg| leg.mode == TransitMode::Subway);
        Self {
            total_duration_mins,
            wait_before_departure_mins: wait_before_departure_mins.max(0),
            legs,
            includes_subway,
            distance_meters: None,
        }
    }

    /// Attach the route distance reported by the routing service.
    pub fn with_distance(mut self, meters: u64) -> Self {
        self.distance_meters = Some(meters);
        self
    }

    /// Minutes from the requested departure until arrival.
    pub fn total_duration_mins(&self) -> i64 {
        self.total_duration_mins
    }

    /// Minutes from the requested departure until the first vehicle leaves.
    pub fn wait_before_departure_mins(&self) -> i64 {
        self.wait_before_departure_mins
    }

    /// All legs in travel order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Whether any leg is a subway leg.
    pub fn includes_subway(&self) -> bool {
        self.includes_subway
    }

    /// Whether any leg is a night bus.
    pub fn has_night_bus(&self) -> bool {
        self.legs.iter().any(|leg| leg.mode == TransitMode::NightBus)
    }

    /// Route distance in meters, if the routing service reported it.
    pub fn distance_meters(&self) -> Option<u64> {
        self.distance_meters
    }
}
