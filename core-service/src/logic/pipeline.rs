//! Pipeline - build → extract → score
//!
//! Each call takes its configuration by reference and returns fresh data;
//! concurrent calls share nothing.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::config::{FallbackKind, PipelineConfig, QuantumSettings, ScorerKind};
use crate::logic::features::extract;
use crate::logic::graph::{build, GraphMetrics, GraphSummary};
use crate::logic::scoring::{
    score_with_fallback, AnomalyFinding, AnomalyScorer, ExternalScorer, MockScorer,
    StatisticalScorer,
};
use crate::logic::traffic::TrafficSet;

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Scorer that produced the findings
    pub scorer: String,
    pub authoritative: bool,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub connections_analyzed: usize,
    pub skipped_records: usize,
    pub metrics: GraphMetrics,
    pub anomalies_detected: usize,
    pub findings: Vec<AnomalyFinding>,
    pub execution_time_ms: f64,
    pub quantum: QuantumSettings,
}

// ============================================================================
// SCORER SELECTION
// ============================================================================

/// Primary scorer named by the configuration
pub fn primary_scorer(config: &PipelineConfig) -> Box<dyn AnomalyScorer> {
    match config.scorer {
        ScorerKind::Mock => Box::new(MockScorer::from_seed(config.seed)),
        ScorerKind::Statistical => Box::new(StatisticalScorer::new(config.thresholds.clone())),
        ScorerKind::External => Box::new(ExternalScorer::new(&config.backend, config.quantum.clone())),
    }
}

/// In-process scorer used when the primary fails
pub fn fallback_scorer(config: &PipelineConfig) -> Box<dyn AnomalyScorer> {
    match config.fallback {
        FallbackKind::Mock => Box::new(MockScorer::from_seed(config.seed)),
        FallbackKind::Statistical => Box::new(StatisticalScorer::new(config.thresholds.clone())),
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Full detection run over one TrafficSet
pub fn detect(traffic: &TrafficSet, config: &PipelineConfig) -> AnomalyReport {
    let started = Instant::now();

    let (graph, metrics) = build(traffic);
    let features = extract(traffic);

    let primary = primary_scorer(config);
    let fallback = fallback_scorer(config);
    let outcome = score_with_fallback(primary.as_ref(), fallback.as_ref(), traffic, &graph, &features);

    let execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    log::info!(
        "Detection over {} records: {} findings via '{}' in {:.2}ms",
        traffic.len(),
        outcome.findings.len(),
        outcome.scorer,
        execution_time_ms
    );

    AnomalyReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        fallback_used: outcome.fallback_used(),
        scorer: outcome.scorer,
        authoritative: outcome.authoritative,
        fallback_reason: outcome.fallback_reason,
        connections_analyzed: traffic.len(),
        skipped_records: traffic.skipped_count(),
        metrics,
        anomalies_detected: outcome.findings.len(),
        findings: outcome.findings,
        execution_time_ms,
        quantum: config.quantum.clone(),
    }
}

/// Graph, metrics and skipped-record count for the rendering layer
pub fn summarize_graph(traffic: &TrafficSet) -> GraphSummary {
    let (graph, metrics) = build(traffic);
    GraphSummary::new(&graph, metrics, traffic.skipped_count())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::config::ConfigUpdate;
    use crate::logic::generator::{GeneratorConfig, TrafficGenerator};
    use crate::logic::traffic::{Protocol, TrafficRecord};

    fn traffic(seed: u64) -> TrafficSet {
        TrafficGenerator::seeded(GeneratorConfig::default(), seed)
            .unwrap()
            .generate_mixed(90, 30)
    }

    #[test]
    fn test_detect_statistical() {
        let traffic = traffic(4);
        let report = detect(&traffic, &PipelineConfig::default());

        assert_eq!(report.scorer, "statistical");
        assert!(report.authoritative);
        assert!(!report.fallback_used);
        assert_eq!(report.connections_analyzed, 120);
        assert_eq!(report.anomalies_detected, report.findings.len());
        assert!(report.metrics.node_count > 0);
        assert!(report.findings.iter().all(|f| f.is_valid_for(traffic.len())));
    }

    #[test]
    fn test_detect_mock_is_flagged_non_authoritative() {
        let config = PipelineConfig::default()
            .apply(&ConfigUpdate {
                scorer: Some("mock".to_string()),
                seed: Some(1),
                ..Default::default()
            })
            .unwrap();

        let report = detect(&traffic(2), &config);
        assert_eq!(report.scorer, "mock");
        assert!(!report.authoritative);
        assert_eq!(report.anomalies_detected, 12);
    }

    #[test]
    fn test_detect_external_falls_back() {
        let config = PipelineConfig {
            scorer: ScorerKind::External,
            fallback: FallbackKind::Mock,
            seed: Some(3),
            ..Default::default()
        };

        let report = detect(&traffic(5), &config);
        assert!(report.fallback_used);
        assert_eq!(report.scorer, "mock");
        assert!(report.fallback_reason.is_some());
    }

    #[test]
    fn test_detect_empty_traffic() {
        let report = detect(&TrafficSet::new(), &PipelineConfig::default());
        assert_eq!(report.connections_analyzed, 0);
        assert!(report.findings.is_empty());
        assert_eq!(report.metrics, GraphMetrics::default());
    }

    #[test]
    fn test_summarize_graph_counts_skipped() {
        let traffic: TrafficSet = vec![
            TrafficRecord::new("A", "B", Protocol::Tcp, 22),
            TrafficRecord::new("", "B", Protocol::Tcp, 22),
        ]
        .into();

        let summary = summarize_graph(&traffic);
        assert_eq!(summary.skipped_records, 1);
        assert_eq!(summary.nodes.len(), 2);
        assert_eq!(summary.edges.len(), 1);
    }
}
