//! External Scorer - Remote Classifier Client
//!
//! Posts the layout descriptor, circuit settings, feature matrix and raw
//! records to a classifier backend (quantum or classical) and expects
//! `{ "findings": [...] }` back. Any failure is reported as
//! `BackendUnavailable` so the caller can fall back.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::AnomalyFinding;
use super::AnomalyScorer;
use crate::error::{CoreError, CoreResult};
use crate::logic::config::{BackendConfig, QuantumSettings};
use crate::logic::features::{FeatureMatrix, LayoutInfo};
use crate::logic::graph::TrafficGraph;
use crate::logic::traffic::TrafficSet;

#[derive(Serialize)]
struct ScoreRequest<'a> {
    layout: LayoutInfo,
    quantum: &'a QuantumSettings,
    features: &'a FeatureMatrix,
    connections: &'a TrafficSet,
}

#[derive(Deserialize)]
struct ScoreResponse {
    findings: Vec<AnomalyFinding>,
}

#[derive(Debug, Clone)]
pub struct ExternalScorer {
    endpoint: Option<String>,
    timeout: Duration,
    quantum: QuantumSettings,
}

impl ExternalScorer {
    pub fn new(backend: &BackendConfig, quantum: QuantumSettings) -> Self {
        Self {
            endpoint: backend.endpoint.clone(),
            timeout: Duration::from_millis(backend.timeout_ms),
            quantum,
        }
    }

    fn unavailable(message: impl Into<String>) -> CoreError {
        CoreError::BackendUnavailable(message.into())
    }
}

impl AnomalyScorer for ExternalScorer {
    fn score(
        &self,
        traffic: &TrafficSet,
        _graph: &TrafficGraph,
        features: &FeatureMatrix,
    ) -> CoreResult<Vec<AnomalyFinding>> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| Self::unavailable("no backend endpoint configured"))?;

        let request = ScoreRequest {
            layout: LayoutInfo::current(),
            quantum: &self.quantum,
            features,
            connections: traffic,
        };
        let body = serde_json::to_string(&request)?;

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .post(endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body);

        let text = match response {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| Self::unavailable(format!("unreadable response: {}", e)))?,
            Err(ureq::Error::Status(code, _)) => {
                return Err(Self::unavailable(format!("backend returned HTTP {}", code)));
            }
            Err(e) => return Err(Self::unavailable(e.to_string())),
        };

        let parsed: ScoreResponse = serde_json::from_str(&text)
            .map_err(|e| Self::unavailable(format!("malformed response: {}", e)))?;

        if let Some(bad) = parsed.findings.iter().find(|f| !f.is_valid_for(traffic.len())) {
            return Err(Self::unavailable(format!(
                "finding out of range (index {}, score {})",
                bad.connection_index, bad.anomaly_score
            )));
        }

        log::debug!("External scorer returned {} findings from {}", parsed.findings.len(), endpoint);
        Ok(parsed.findings)
    }

    fn name(&self) -> &str {
        "external"
    }
}
