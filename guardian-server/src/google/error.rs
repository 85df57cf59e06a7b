//! Google Routes client error types.

use std::fmt;
use std::time::Duration;

use crate::advisor::OracleError;

/// Errors from the Google Routes HTTP client.
#[derive(Debug)]
pub enum RoutesError {
    /// HTTP request failed (connection refused, DNS, TLS, ...)
    Http(reqwest::Error),

    /// No response within the client timeout
    Timeout(Duration),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Quota exhausted
    RateLimited,

    /// Missing or invalid API key
    Unauthorized,

    /// Client could not be built from its configuration
    NotConfigured(String),
}

impl fmt::Display for RoutesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutesError::Http(e) => write!(f, "HTTP error: {e}"),
            RoutesError::Timeout(after) => write!(f, "request timed out after {after:?}"),
            RoutesError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RoutesError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            RoutesError::RateLimited => write!(f, "rate limited by Routes API"),
            RoutesError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            RoutesError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for RoutesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoutesError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RoutesError {
    fn from(err: reqwest::Error) -> Self {
        RoutesError::Http(err)
    }
}

impl From<RoutesError> for OracleError {
    fn from(err: RoutesError) -> Self {
        match err {
            RoutesError::Timeout(after) => OracleError::Timeout(after),
            other => OracleError::Unavailable(other.to_string()),
        }
    }
}
