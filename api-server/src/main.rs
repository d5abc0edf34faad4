//! QuantumEyes API Server
//!
//! HTTP transport for the traffic analysis pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    QUANTUMEYES SERVER                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────┐   ┌─────────────────┐  │
//! │  │  API      │──▶│  Config store    │──▶│  Pipeline       │  │
//! │  │  (Axum)   │   │  (RwLock, owned  │   │  (blocking pool)│  │
//! │  │           │   │   by transport)  │   │                 │  │
//! │  └───────────┘   └──────────────────┘   └────────┬────────┘  │
//! │                                                  ▼           │
//! │                                       ┌─────────────────────┐│
//! │                                       │ External classifier ││
//! │                                       │ (optional, fallback)││
//! │                                       └─────────────────────┘│
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quantumeyes_core::constants::{APP_NAME, APP_VERSION};
use quantumeyes_core::PipelineConfig;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let production = std::env::var("ENVIRONMENT").map(|e| e == "production").unwrap_or(false);

    // Initialize logging (also captures the core's `log` records)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quantumeyes_server=debug,quantumeyes_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if production {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = config::Config::from_env();

    tracing::info!("{} server v{} starting...", APP_NAME, APP_VERSION);
    tracing::info!(
        "Scorer: {} (fallback: {}), backend: {}",
        config.pipeline.scorer.as_str(),
        config.pipeline.fallback.as_str(),
        config.pipeline.backend.endpoint.as_deref().unwrap_or("not configured")
    );

    // Build application state
    let state = AppState::new(config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Current pipeline configuration; handlers work on a snapshot
    pub pipeline: Arc<RwLock<PipelineConfig>>,
    pub config: config::Config,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            pipeline: Arc::new(RwLock::new(config.pipeline.clone())),
            config,
            started_at: Utc::now(),
        }
    }

    /// Immutable copy of the current configuration
    pub fn snapshot(&self) -> PipelineConfig {
        self.pipeline.read().clone()
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/status", get(handlers::status::status))
        .route("/api/v1/configure", post(handlers::status::configure))
        .route("/api/v1/graph", post(handlers::analysis::graph))
        .route("/api/v1/features", post(handlers::analysis::features))
        .route("/api/v1/detect", post(handlers::analysis::detect))
        .route("/api/v1/demo-data", get(handlers::demo::demo_data));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
