//! Feasibility classification.
//!
//! The routing service happily returns an itinerary at 01:30 that sits at a
//! bus stop until 05:10 for the first morning bus. Such an answer is "a
//! route" but not a night route. The classifier decides whether an
//! itinerary is something a person could actually take right now.

use std::fmt;

use crate::domain::Itinerary;

use super::config::AdvisorConfig;

/// Which itineraries count for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Any combination of transit
    Any,
    /// Only itineraries with at least one subway leg
    SubwayOnly,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Any => f.write_str("any"),
            SearchMode::SubwayOnly => f.write_str("subway"),
        }
    }
}

/// Outcome of classifying one itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Available,
    Unavailable,
}

impl Verdict {
    /// Returns true for `Available`.
    pub fn is_available(&self) -> bool {
        matches!(self, Verdict::Available)
    }
}

/// Decide whether an itinerary is usable for the given mode.
///
/// Checks run in order and the first failing one decides:
/// no itinerary, no subway leg in subway mode, trip too long, wait too long.
pub fn classify(
    itinerary: Option<&Itinerary>,
    mode: SearchMode,
    config: &AdvisorConfig,
) -> Verdict {
    let Some(itinerary) = itinerary else {
        return Verdict::Unavailable;
    };

    if mode == SearchMode::SubwayOnly && !itinerary.includes_subway() {
        return Verdict::Unavailable;
    }

    // Waiting for the first morning service rather than a night route
    if itinerary.total_duration_mins() > config.max_total_mins {
        return Verdict::Unavailable;
    }

    if itinerary.wait_before_departure_mins() > config.max_wait_mins {
        return Verdict::Unavailable;
    }

    Verdict::Available
}
