//! Mock Scorer
//!
//! Non-authoritative demo scorer: flags every 10th record with a high random
//! score and cycles the anomaly type by index. Ignores graph and features.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{AnomalyFinding, AnomalyType};
use super::AnomalyScorer;
use crate::error::CoreResult;
use crate::logic::features::FeatureMatrix;
use crate::logic::graph::TrafficGraph;
use crate::logic::traffic::TrafficSet;

/// Every n-th record is flagged
pub const MOCK_FLAG_INTERVAL: usize = 10;

/// Score range of flagged records
pub const MOCK_MIN_SCORE: f64 = 0.85;
pub const MOCK_MAX_SCORE: f64 = 0.99;

#[derive(Debug, Clone, Default)]
pub struct MockScorer {
    seed: Option<u64>,
}

impl MockScorer {
    /// Entropy-seeded per call
    pub fn new() -> Self {
        Self::default()
    }

    /// Same seed, same scores
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn anomaly_type(index: usize) -> AnomalyType {
        match index % 3 {
            0 => AnomalyType::PortScan,
            1 => AnomalyType::DataExfiltration,
            _ => AnomalyType::Ddos,
        }
    }
}

impl AnomalyScorer for MockScorer {
    fn score(
        &self,
        traffic: &TrafficSet,
        _graph: &TrafficGraph,
        _features: &FeatureMatrix,
    ) -> CoreResult<Vec<AnomalyFinding>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let findings = traffic
            .iter()
            .enumerate()
            .step_by(MOCK_FLAG_INTERVAL)
            .map(|(index, record)| AnomalyFinding {
                connection_index: index,
                source_ip: record.source_ip.clone(),
                destination_ip: record.destination_ip.clone(),
                protocol: record.protocol.clone(),
                port: record.destination_port,
                anomaly_score: rng.gen_range(MOCK_MIN_SCORE..=MOCK_MAX_SCORE),
                anomaly_type: Self::anomaly_type(index),
            })
            .collect();

        Ok(findings)
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn authoritative(&self) -> bool {
        false
    }
}
