//! Web layer for the last-departure advisor.
//!
//! Provides the HTML form, the advisory endpoint (HTML or JSON) and a
//! health check.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
