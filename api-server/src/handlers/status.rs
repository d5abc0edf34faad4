//! Status & configuration handlers

use axum::{body::Bytes, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use quantumeyes_core::logic::features::LayoutInfo;
use quantumeyes_core::{ConfigUpdate, PipelineConfig};

use crate::models::{parse_json, ConfigureRequest};
use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    environment: String,
    started_at: DateTime<Utc>,
    backend_configured: bool,
    config: PipelineConfig,
    feature_layout: LayoutInfo,
}

#[derive(Serialize)]
pub struct ConfigureResponse {
    status: &'static str,
    message: &'static str,
    config: PipelineConfig,
}

/// Current configuration and feature layout
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let config = state.snapshot();
    Json(StatusResponse {
        status: "running",
        environment: state.config.environment.clone(),
        started_at: state.started_at,
        backend_configured: config.backend_configured(),
        config,
        feature_layout: LayoutInfo::current(),
    })
}

/// Apply a partial update; on any error the stored configuration is kept
pub async fn configure(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ConfigureResponse>> {
    let req: ConfigureRequest = parse_json(&body)?;
    req.validate()?;
    let update = ConfigUpdate::from(req);

    let config = {
        let mut current = state.pipeline.write();
        let next = current.apply(&update)?;
        *current = next.clone();
        next
    };

    tracing::info!(
        "Pipeline reconfigured: scorer={}, fallback={}, backend={}",
        config.scorer.as_str(),
        config.fallback.as_str(),
        config.backend.endpoint.as_deref().unwrap_or("none")
    );

    Ok(Json(ConfigureResponse {
        status: "success",
        message: "Configuration updated",
        config,
    }))
}
