//! Analysis handlers: graph, features, detection
//!
//! Pipeline work runs on the blocking pool; the external scorer makes a
//! blocking HTTP call.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use quantumeyes_core::constants::{DEFAULT_DETECT_SAMPLE_SIZE, DEFAULT_GRAPH_SAMPLE_SIZE};
use quantumeyes_core::logic::features::LayoutInfo;
use quantumeyes_core::{detect as run_detection, extract, summarize_graph, AnomalyReport, FeatureMatrix, GraphSummary};

use crate::models::TrafficInput;
use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct FeaturesResponse {
    layout: LayoutInfo,
    connections_analyzed: usize,
    skipped_records: usize,
    source_count: usize,
    features: FeatureMatrix,
}

/// POST /api/v1/graph
pub async fn graph(State(state): State<AppState>, body: Bytes) -> AppResult<Json<GraphSummary>> {
    let input = TrafficInput::parse(&body)?;
    let seed = state.snapshot().seed;

    let summary = tokio::task::spawn_blocking(move || {
        let traffic = input.resolve(DEFAULT_GRAPH_SAMPLE_SIZE, seed)?;
        Ok::<_, quantumeyes_core::CoreError>(summarize_graph(&traffic))
    })
    .await??;

    Ok(Json(summary))
}

/// POST /api/v1/features
pub async fn features(State(state): State<AppState>, body: Bytes) -> AppResult<Json<FeaturesResponse>> {
    let input = TrafficInput::parse(&body)?;
    let seed = state.snapshot().seed;

    let response = tokio::task::spawn_blocking(move || {
        let traffic = input.resolve(DEFAULT_GRAPH_SAMPLE_SIZE, seed)?;
        let features = extract(&traffic);
        Ok::<_, quantumeyes_core::CoreError>(FeaturesResponse {
            layout: LayoutInfo::current(),
            connections_analyzed: traffic.len(),
            skipped_records: traffic.skipped_count(),
            source_count: features.len(),
            features,
        })
    })
    .await??;

    Ok(Json(response))
}

/// POST /api/v1/detect
pub async fn detect(State(state): State<AppState>, body: Bytes) -> AppResult<Json<AnomalyReport>> {
    let input = TrafficInput::parse(&body)?;
    let config = state.snapshot();

    let report = tokio::task::spawn_blocking(move || {
        let traffic = input.resolve(DEFAULT_DETECT_SAMPLE_SIZE, config.seed)?;
        Ok::<_, quantumeyes_core::CoreError>(run_detection(&traffic, &config))
    })
    .await??;

    if report.fallback_used {
        tracing::warn!(
            "Detection {} used fallback scorer '{}': {}",
            report.id,
            report.scorer,
            report.fallback_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(Json(report))
}
