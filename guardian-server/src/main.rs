use std::net::SocketAddr;

use chrono::FixedOffset;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use guardian_server::advisor::AdvisorConfig;
use guardian_server::cache::{CacheConfig, CachedRoutesClient};
use guardian_server::google::{RoutesClient, RoutesConfig};
use guardian_server::web::{AppState, create_router};

/// Korea Standard Time.
const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

const DEFAULT_PORT: u16 = 8000;

/// Read a numeric environment variable, falling back on absence or garbage.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "ignoring unparseable environment variable");
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("guardian_server=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("GOOGLE_API_KEY").unwrap_or_else(|_| {
        warn!("GOOGLE_API_KEY not set. Routing queries will fail.");
        String::new()
    });

    let offset_hours = env_or("GUARDIAN_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS);
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .expect("GUARDIAN_UTC_OFFSET_HOURS must be between -23 and 23");

    let advisor_config = AdvisorConfig {
        oracle_timeout_secs: env_or("GUARDIAN_ORACLE_TIMEOUT_SECS", 10),
        ..AdvisorConfig::default()
    };

    // Create routing client; the HTTP timeout matches the per-call limit
    let routes_config = RoutesConfig::new(api_key).with_timeout(advisor_config.oracle_timeout_secs);
    let routes_client = RoutesClient::new(routes_config).expect("Failed to create Routes client");

    // Create cached client
    let cache_config = CacheConfig::default();
    let cached_routes = CachedRoutesClient::new(routes_client, &cache_config);

    // Build app state
    let state = AppState::new(cached_routes, advisor_config, offset);

    // Create router
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    let app = create_router(state, static_dir);

    // Bind and serve
    let port = env_or("PORT", DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, %offset, "Last Guardian listening");
    info!("  GET /                                  - Trip form");
    info!("  GET /health                            - Health check");
    info!("  GET /advisory?origin=..&destination=.. - Night travel advisory");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
