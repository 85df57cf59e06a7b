//! Trip endpoints.
//!
//! The advisor never resolves places itself. A `Location` is handed to the
//! routing service untouched, either as free-form address text or as a
//! latitude/longitude pair.

use std::fmt;

use super::DomainError;

/// An origin or destination as understood by the routing service.
///
/// # Examples
///
/// ```
/// use guardian_server::domain::Location;
///
/// let station = Location::parse("Gangnam Station").unwrap();
/// assert_eq!(station, Location::address("Gangnam Station"));
///
/// let point = Location::parse("37.4979, 127.0276").unwrap();
/// assert_eq!(point, Location::coordinates(37.4979, 127.0276));
///
/// assert!(Location::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Free-form place text, geocoded by the routing service
    Address(String),
    /// WGS84 coordinates in degrees
    Coordinates { latitude: f64, longitude: f64 },
}

impl Location {
    /// Create an address location.
    pub fn address(text: impl Into<String>) -> Self {
        Location::Address(text.into())
    }

    /// Create a coordinate location.
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Location::Coordinates {
            latitude,
            longitude,
        }
    }

    /// Interpret user text as a location.
    ///
    /// `"<lat>,<lng>"` where both halves are numbers is a coordinate pair and
    /// must be in range. Any other non-blank text is an address.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidLocation("location must not be blank"));
        }

        if let Some((lat, lng)) = s.split_once(',') {
            if let (Ok(latitude), Ok(longitude)) =
                (lat.trim().parse::<f64>(), lng.trim().parse::<f64>())
            {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude)
                {
                    return Err(DomainError::InvalidLocation("coordinates out of range"));
                }
                return Ok(Self::coordinates(latitude, longitude));
            }
        }

        Ok(Self::address(s))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Address(text) => f.write_str(text),
            Location::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{latitude},{longitude}"),
        }
    }
}

/// Origin and destination of one advisory request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub origin: Location,
    pub destination: Location,
}

impl TripQuery {
    /// Create a new trip query.
    pub fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
        }
    }
}
