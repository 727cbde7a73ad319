//! JSON HTTP front end for aiscout.
//!
//! `POST /analyze` fetches and scores a page, `GET /analyses/{id}` returns a
//! stored report and `GET /health` reports liveness. `POST /analyze-competitive`
//! compares several pages and `POST /generate-rewrites` suggests rewrites for
//! one.

pub mod routes;
pub mod store;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use aiscout_core::{Analyzer, AnthropicAdvisor};
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use store::{MemoryStore, ResultStore, StoredAnalysis};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STORE_TTL_SECS: u64 = 3600;
/// Upper bound on one request, covering fetch, probes and the advisor.
pub const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub store_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, store_ttl: Duration::from_secs(DEFAULT_STORE_TTL_SECS) }
    }
}

impl ServerConfig {
    /// Reads `PORT` and `AISCOUT_STORE_TTL_SECS`, keeping defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_vars(env::var("PORT").ok().as_deref(), env::var("AISCOUT_STORE_TTL_SECS").ok().as_deref())
    }

    fn from_vars(port: Option<&str>, ttl: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(port) = port {
            match port.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(value = port, "ignoring invalid PORT"),
            }
        }
        if let Some(ttl) = ttl {
            match ttl.trim().parse() {
                Ok(secs) => config.store_ttl = Duration::from_secs(secs),
                Err(_) => tracing::warn!(value = ttl, "ignoring invalid AISCOUT_STORE_TTL_SECS"),
            }
        }
        config
    }
}

/// Shared by every request. The analyzer is immutable; the store locks internally.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub advisor: Option<Arc<AnthropicAdvisor>>,
    pub store: Arc<dyn ResultStore>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, advisor: Option<AnthropicAdvisor>, store: Arc<dyn ResultStore>) -> Self {
        Self { analyzer: Arc::new(analyzer), advisor: advisor.map(Arc::new), store }
    }
}

/// Builds the router with its middleware stack.
pub fn app(state: AppState) -> Router {
    app_with_timeout(state, Duration::from_secs(REQUEST_TIMEOUT_SECS))
}

/// Like [`app`], answering `408 Request Timeout` once a request runs past `timeout`.
pub fn app_with_timeout(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/analyze", post(routes::analyze))
        .route("/analyze-competitive", post(routes::analyze_competitive))
        .route("/generate-rewrites", post(routes::generate_rewrites))
        .route("/analyses/{id}", get(routes::get_analysis))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Evicts stored reports older than `ttl`, checking at most once a minute.
pub fn spawn_eviction(store: Arc<dyn ResultStore>, ttl: Duration) -> tokio::task::JoinHandle<()> {
    let period = ttl.min(Duration::from_secs(60)).max(Duration::from_secs(1));
    let max_age = time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = store.evict_older_than(max_age);
            if evicted > 0 {
                tracing::debug!(evicted, remaining = store.len(), "evicted stored reports");
            }
        }
    })
}
