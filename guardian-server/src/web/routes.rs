//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::advisor::{EstimationError, OracleError, compute_night_travel_advisory};
use crate::domain::{Location, TripQuery};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/advisory", get(advisory))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the trip form.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Parse one required location parameter.
fn parse_location(value: Option<&str>, field: &str) -> Result<Location, AppError> {
    let value = value.ok_or_else(|| AppError::BadRequest {
        message: format!("missing {field}"),
    })?;
    Location::parse(value).map_err(|e| AppError::BadRequest {
        message: format!("invalid {field}: {e}"),
    })
}

/// Compute tonight's advisory for a trip.
async fn advisory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<AdvisoryRequest>,
) -> Response {
    let html = accepts_html(&headers);

    match build_advisory(&state, &req).await {
        Ok(response) if html => {
            let template = AdvisoryTemplate {
                advisory: AdvisoryView::from_response(&response),
            };
            match template.render() {
                Ok(page) => Html(page).into_response(),
                Err(e) => AppError::Internal {
                    message: format!("Template error: {}", e),
                }
                .into_response(),
            }
        }
        Ok(response) => Json(response).into_response(),
        Err(e) if html => e.into_html_response(),
        Err(e) => e.into_response(),
    }
}

async fn build_advisory(
    state: &AppState,
    req: &AdvisoryRequest,
) -> Result<AdvisoryResponse, AppError> {
    let origin = parse_location(req.origin.as_deref(), "origin")?;
    let destination = parse_location(req.destination.as_deref(), "destination")?;
    let query = TripQuery::new(origin, destination);

    let now = state.now();
    let window = state.config.window_at(now).map_err(|e| AppError::Internal {
        message: e.to_string(),
    })?;

    let advisory =
        compute_night_travel_advisory(state.routes.as_ref(), &query, &window, now, &state.config)
            .await?;

    Ok(AdvisoryResponse::from_advisory(&query, &advisory, now))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NoRoute { message: String },
    OracleUnavailable { message: String },
    OracleTimeout { message: String },
    Internal { message: String },
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "bad_request", message),
            AppError::NoRoute { message } => (StatusCode::NOT_FOUND, "no_route", message),
            AppError::OracleUnavailable { message } => {
                (StatusCode::BAD_GATEWAY, "oracle_unavailable", message)
            }
            AppError::OracleTimeout { message } => {
                (StatusCode::GATEWAY_TIMEOUT, "oracle_timeout", message)
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        }
    }

    fn log(&self) {
        let (status, kind, message) = self.parts();
        if status.is_server_error() {
            error!(%status, kind, detail = message, "request failed");
        } else {
            warn!(%status, kind, detail = message, "request rejected");
        }
    }

    /// Render as an HTML error page with the same status.
    pub fn into_html_response(self) -> Response {
        self.log();
        let (status, kind, message) = self.parts();

        let title = match &self {
            AppError::BadRequest { .. } => "Check your input",
            AppError::NoRoute { .. } => "No transit tonight",
            AppError::OracleUnavailable { .. } | AppError::OracleTimeout { .. } => {
                "Routing service unavailable"
            }
            AppError::Internal { .. } => "Something went wrong",
        };
        let template = ErrorTemplate {
            title: title.to_string(),
            message: message.to_string(),
            details: Some(kind.to_string()),
        };

        match template.render() {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => (status, format!("Template error: {}", e)).into_response(),
        }
    }
}

impl From<EstimationError> for AppError {
    fn from(e: EstimationError) -> Self {
        match e {
            EstimationError::NoFeasibleDeparture { .. } => AppError::NoRoute {
                message: "no transit route tonight".to_string(),
            },
            EstimationError::Oracle(OracleError::Timeout(_)) => AppError::OracleTimeout {
                message: e.to_string(),
            },
            EstimationError::Oracle(OracleError::Unavailable(_)) => AppError::OracleUnavailable {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        let (status, kind, message) = self.parts();

        let body = Json(ErrorResponse {
            error: message.to_string(),
            kind: kind.to_string(),
        });
        (status, body).into_response()
    }
}
