//! Health check handler

use axum::Json;
use serde::Serialize;

use quantumeyes_core::constants::{APP_NAME, APP_VERSION};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: APP_NAME,
        version: APP_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
