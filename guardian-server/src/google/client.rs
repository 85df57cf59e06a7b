//! Google Routes HTTP client.
//!
//! Sends `computeRoutes` transit requests and converts the answer into a
//! domain itinerary. Authentication and the response field mask are sent as
//! default headers on every request.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::advisor::{OracleError, RoutingOracle};
use crate::domain::{Itinerary, LocalDateTime, Location};

use super::convert::convert_response;
use super::error::RoutesError;
use super::types::{ComputeRoutesRequest, ComputeRoutesResponse, LatLng, Waypoint};

/// Default base URL for the Routes API.
const DEFAULT_BASE_URL: &str = "https://routes.googleapis.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Response fields requested from the API.
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.legs.steps";

/// Configuration for the Routes client.
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Language for stop and line names
    pub language_code: String,
    /// Region used to bias address lookup
    pub region_code: String,
}

impl RoutesConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
            language_code: "ko".to_string(),
            region_code: "KR".to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set language and region codes.
    pub fn with_locale(mut self, language: impl Into<String>, region: impl Into<String>) -> Self {
        self.language_code = language.into();
        self.region_code = region.into();
        self
    }
}

/// Google Routes API client.
///
/// Uses a semaphore to limit concurrent requests, since one advisory fans
/// out into dozens of queries. The semaphore is exposed through
/// `RoutingOracle::call_limit`; callers hold a permit around each request.
#[derive(Debug, Clone)]
pub struct RoutesClient {
    http: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
    language_code: String,
    region_code: String,
    semaphore: Arc<Semaphore>,
}

impl RoutesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RoutesConfig) -> Result<Self, RoutesError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| RoutesError::NotConfigured("invalid API key format".to_string()))?;
        headers.insert("X-Goog-Api-Key", api_key);
        headers.insert("X-Goog-FieldMask", HeaderValue::from_static(FIELD_MASK));

        let timeout = std::time::Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            timeout,
            language_code: config.language_code,
            region_code: config.region_code,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Raw `computeRoutes` response for a transit trip.
    async fn compute_routes(
        &self,
        origin: &Location,
        destination: &Location,
        depart_at: LocalDateTime,
    ) -> Result<ComputeRoutesResponse, RoutesError> {
        let url = format!("{}/directions/v2:computeRoutes", self.base_url);
        let request = self.build_request(origin, destination, depart_at);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RoutesError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutesError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutesError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&body).map_err(|e| RoutesError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Best transit itinerary departing at `depart_at`, if any.
    ///
    /// Does not take a permit; callers throttle through `call_limit`.
    pub async fn best_itinerary(
        &self,
        origin: &Location,
        destination: &Location,
        depart_at: LocalDateTime,
    ) -> Result<Option<Itinerary>, RoutesError> {
        let response = self.compute_routes(origin, destination, depart_at).await?;
        let itinerary = convert_response(&response, depart_at);

        debug!(
            %origin,
            %destination,
            %depart_at,
            routes = response.routes.len(),
            total_mins = itinerary.as_ref().map(Itinerary::total_duration_mins),
            "routes fetched"
        );

        Ok(itinerary)
    }

    fn build_request(
        &self,
        origin: &Location,
        destination: &Location,
        depart_at: LocalDateTime,
    ) -> ComputeRoutesRequest {
        ComputeRoutesRequest {
            origin: waypoint(origin),
            destination: waypoint(destination),
            travel_mode: "TRANSIT",
            departure_time: depart_at
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            language_code: self.language_code.clone(),
            region_code: self.region_code.clone(),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> RoutesError {
        if err.is_timeout() {
            RoutesError::Timeout(self.timeout)
        } else {
            RoutesError::Http(err)
        }
    }
}

fn waypoint(location: &Location) -> Waypoint {
    match location {
        Location::Address(text) => Waypoint::Address(text.clone()),
        Location::Coordinates {
            latitude,
            longitude,
        } => Waypoint::Location {
            lat_lng: LatLng {
                latitude: *latitude,
                longitude: *longitude,
            },
        },
    }
}

impl RoutingOracle for RoutesClient {
    fn call_limit(&self) -> Option<&Semaphore> {
        Some(&self.semaphore)
    }

    async fn query_itinerary(
        &self,
        origin: &Location,
        destination: &Location,
        depart_at: LocalDateTime,
    ) -> Result<Option<Itinerary>, OracleError> {
        Ok(self.best_itinerary(origin, destination, depart_at).await?)
    }
}
