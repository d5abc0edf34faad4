//! Router tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use quantumeyes_core::{PipelineConfig, ScorerKind};

use crate::config::Config;
use crate::{create_router, AppState};

fn make_state() -> AppState {
    AppState::new(Config {
        port: 0,
        environment: "test".to_string(),
        pipeline: PipelineConfig {
            seed: Some(7),
            ..Default::default()
        },
    })
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let app = create_router(state.clone());
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 10_000_000).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(state, request).await
}

async fn post_raw(state: &AppState, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(state, request).await
}

async fn post(state: &AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(state, uri, &body.to_string()).await
}

fn scenario() -> Value {
    json!([
        {"source_ip": "A", "destination_ip": "B", "protocol": "TCP", "destination_port": 22},
        {"source_ip": "A", "destination_ip": "B", "protocol": "TCP", "destination_port": 23},
        {"source_ip": "C", "destination_ip": "B", "protocol": "UDP", "destination_port": 53}
    ])
}

// --- /health, /status ---

#[tokio::test]
async fn test_health() {
    let (status, json) = get(&make_state(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "QuantumEyes");
}

#[tokio::test]
async fn test_status_reports_config() {
    let (status, json) = get(&make_state(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["scorer"], "statistical");
    assert_eq!(json["config"]["quantum"]["num_qubits"], 4);
    assert_eq!(json["backend_configured"], false);
    assert_eq!(json["feature_layout"]["feature_count"], 5);
}

// --- /configure ---

#[tokio::test]
async fn test_configure_updates_store() {
    let state = make_state();
    let (status, json) = post(
        &state,
        "/api/v1/configure",
        json!({"scorer": "mock", "qubits": 6, "feature_map": "iqp"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["scorer"], "mock");
    assert_eq!(state.snapshot().scorer, ScorerKind::Mock);
    assert_eq!(state.snapshot().quantum.num_qubits, 6);
}

#[tokio::test]
async fn test_configure_rejects_unknown_name_and_keeps_config() {
    let state = make_state();
    let (status, json) = post(
        &state,
        "/api/v1/configure",
        json!({"scorer": "mock", "feature_map": "heisenberg"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("feature map"));
    assert_eq!(state.snapshot().scorer, ScorerKind::Statistical);
}

#[tokio::test]
async fn test_configure_validates_ranges() {
    let state = make_state();
    let (status, _) = post(&state, "/api/v1/configure", json!({"shots": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.snapshot().quantum.shots, 1024);
}

#[tokio::test]
async fn test_configure_invalid_json() {
    let (status, json) = post_raw(&make_state(), "/api/v1/configure", "{scorer:").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("invalid JSON"));
}

// --- /graph, /features ---

#[tokio::test]
async fn test_graph_scenario() {
    let (status, json) = post(&make_state(), "/api/v1/graph", scenario()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metrics"]["node_count"], 3);
    assert_eq!(json["metrics"]["edge_count"], 2);
    let density = json["metrics"]["density"].as_f64().unwrap();
    assert!((density - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(json["edges"][0]["port"], 23);
}

#[tokio::test]
async fn test_graph_wrapped_body_and_skipped_count() {
    let body = json!({"connections": [
        {"source_ip": "A", "destination_ip": "B", "protocol": "TCP", "destination_port": 22},
        {"destination_ip": "B", "protocol": "TCP", "destination_port": 22}
    ]});
    let (status, json) = post(&make_state(), "/api/v1/graph", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["skipped_records"], 1);
    assert_eq!(json["metrics"]["node_count"], 2);
}

#[tokio::test]
async fn test_graph_empty_body_generates() {
    let (status, json) = post_raw(&make_state(), "/api/v1/graph", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["metrics"]["node_count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_graph_invalid_json() {
    let (status, json) = post_raw(&make_state(), "/api/v1/graph", "[{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_graph_null_endpoint_skipped() {
    let body = json!([
        {"source_ip": null, "destination_ip": "B", "protocol": "TCP", "destination_port": 22},
        {"source_ip": "A", "destination_ip": "B", "protocol": "TCP", "destination_port": 22}
    ]);
    let (status, json) = post(&make_state(), "/api/v1/graph", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["skipped_records"], 1);
    assert_eq!(json["metrics"]["edge_count"], 1);
}

#[tokio::test]
async fn test_graph_null_body_generates() {
    let (status, json) = post_raw(&make_state(), "/api/v1/graph", "null").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["metrics"]["node_count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_graph_wrong_shape() {
    let (status, _) = post(&make_state(), "/api/v1/graph", json!(42)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_features_per_source() {
    let (status, json) = post(&make_state(), "/api/v1/features", scenario()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source_count"], 2);
    assert_eq!(json["features"]["features"]["A"]["connection_count"], 2);
    assert_eq!(json["features"]["features"]["A"]["unique_port_count"], 2);
    assert_eq!(json["layout"]["version"], 1);
}

#[tokio::test]
async fn test_features_empty_body_generates_fifty() {
    let (status, json) = post_raw(&make_state(), "/api/v1/features", "  ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["connections_analyzed"], 50);
}

// --- /detect ---

#[tokio::test]
async fn test_detect_generated_traffic() {
    let (status, json) = post_raw(&make_state(), "/api/v1/detect", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["connections_analyzed"], 100);
    assert_eq!(json["scorer"], "statistical");
    assert_eq!(json["fallback_used"], false);
    assert!(json["id"].as_str().is_some());
    for finding in json["findings"].as_array().unwrap() {
        assert!(finding["connection_index"].as_u64().unwrap() < 100);
        let score = finding["anomaly_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));
    }
}

#[tokio::test]
async fn test_detect_external_without_backend_falls_back() {
    let state = make_state();
    let (status, _) = post(&state, "/api/v1/configure", json!({"scorer": "external"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post(&state, "/api/v1/detect", scenario()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fallback_used"], true);
    assert_eq!(json["scorer"], "statistical");
    assert!(json["fallback_reason"].as_str().is_some());
}

#[tokio::test]
async fn test_detect_mock_scorer() {
    let state = make_state();
    post(&state, "/api/v1/configure", json!({"scorer": "mock"})).await;

    let (status, json) = post(&state, "/api/v1/detect", scenario()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["authoritative"], false);
    assert_eq!(json["anomalies_detected"], 1);
    assert_eq!(json["findings"][0]["anomaly_type"], "port_scan");
}

// --- /demo-data ---

#[tokio::test]
async fn test_demo_data_default() {
    let (status, json) = get(&make_state(), "/api/v1/demo-data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 50);
    assert_eq!(json["data"].as_array().unwrap().len(), 50);
    assert_eq!(json["labels"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_demo_data_seeded_reproducible() {
    let state = make_state();
    let (_, a) = get(&state, "/api/v1/demo-data?count=30&seed=11").await;
    let (_, b) = get(&state, "/api/v1/demo-data?count=30&seed=11").await;

    assert_eq!(a["count"], 30);
    assert_eq!(a["data"], b["data"]);
    assert_eq!(a["labels"], b["labels"]);
}

#[tokio::test]
async fn test_demo_data_malformed_query_is_json_error() {
    let (status, json) = get(&make_state(), "/api/v1/demo-data?count=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_demo_data_count_out_of_range() {
    let (status, json) = get(&make_state(), "/api/v1/demo-data?count=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}
