//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from routing-service and HTTP errors.

use chrono::NaiveDateTime;

use super::LocalDateTime;

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Search window is empty or inverted
    #[error("search window must start before it ends ({earliest} >= {latest})")]
    InvalidWindow {
        earliest: LocalDateTime,
        latest: LocalDateTime,
    },

    /// A local time that cannot be represented in the configured offset
    #[error("local time {0} cannot be represented")]
    InvalidLocalTime(NaiveDateTime),

    /// Calendar arithmetic ran off the supported date range
    #[error("date out of range")]
    DateOutOfRange,

    /// Location text could not be interpreted
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidLocation("location must not be blank");
        assert_eq!(err.to_string(), "invalid location: location must not be blank");

        let err = DomainError::DateOutOfRange;
        assert_eq!(err.to_string(), "date out of range");

        let earliest = DateTime::parse_from_rfc3339("2024-03-15T23:00:00+09:00").unwrap();
        let latest = DateTime::parse_from_rfc3339("2024-03-15T22:00:00+09:00").unwrap();
        let err = DomainError::InvalidWindow { earliest, latest };
        assert!(err.to_string().starts_with("search window must start before it ends"));
    }
}
