//! Demo data handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

use quantumeyes_core::constants::{DEFAULT_DEMO_ANOMALY_RATIO, DEFAULT_GRAPH_SAMPLE_SIZE};
use quantumeyes_core::{GeneratorConfig, TrafficGenerator, TrafficSet};

use crate::models::DemoDataQuery;
use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct DemoDataResponse {
    status: &'static str,
    count: usize,
    anomalies: usize,
    labels: Vec<u8>,
    data: TrafficSet,
}

/// GET /api/v1/demo-data?count=&seed=&anomaly_ratio=
pub async fn demo_data(
    State(state): State<AppState>,
    query: Result<Query<DemoDataQuery>, QueryRejection>,
) -> AppResult<Json<DemoDataResponse>> {
    let Query(query) = query?;
    query.validate()?;

    let count = query.count.unwrap_or(DEFAULT_GRAPH_SAMPLE_SIZE);
    let ratio = query.anomaly_ratio.unwrap_or(DEFAULT_DEMO_ANOMALY_RATIO);
    let seed = query.seed.or(state.snapshot().seed);

    let traffic = tokio::task::spawn_blocking(move || {
        TrafficGenerator::from_seed(GeneratorConfig::default(), seed)
            .map(|mut generator| generator.sample(count, ratio))
    })
    .await??;

    Ok(Json(DemoDataResponse {
        status: "success",
        count: traffic.len(),
        anomalies: traffic.anomaly_count(),
        labels: traffic.labels(),
        data: traffic,
    }))
}
