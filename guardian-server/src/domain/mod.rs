//! Domain types for the last-departure advisor.
//!
//! This module contains the value objects that flow through one advisory
//! request. Types that carry invariants enforce them at construction time,
//! so code that receives them can trust their validity.

mod error;
mod itinerary;
mod query;
mod time;

pub use error::DomainError;
pub use itinerary::{Itinerary, Leg, TransitMode};
pub use query::{Location, TripQuery};
pub use time::{LocalDateTime, SearchWindow, format_hhmm, truncate_to_minute, whole_minutes};
