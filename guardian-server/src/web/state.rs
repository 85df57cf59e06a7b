//! Application state for the web layer.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};

use crate::advisor::AdvisorConfig;
use crate::cache::CachedRoutesClient;
use crate::domain::LocalDateTime;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached routing client
    pub routes: Arc<CachedRoutesClient>,

    /// Advisor thresholds and window bounds
    pub config: Arc<AdvisorConfig>,

    /// Local offset every advisory is computed in
    pub offset: FixedOffset,
}

impl AppState {
    /// Create a new app state.
    pub fn new(routes: CachedRoutesClient, config: AdvisorConfig, offset: FixedOffset) -> Self {
        Self {
            routes: Arc::new(routes),
            config: Arc::new(config),
            offset,
        }
    }

    /// Current time in the local offset.
    pub fn now(&self) -> LocalDateTime {
        Utc::now().with_timezone(&self.offset)
    }
}
