//! Scoring Module - Pluggable Anomaly Scorers
//!
//! Separates feature/graph production from classification. Each backend is
//! its own type implementing [`AnomalyScorer`].
//!
//! ## Structure
//! - `types`: AnomalyFinding, AnomalyType
//! - `rules`: thresholds and score formula
//! - `statistical`: threshold rules (the real detection policy)
//! - `mock`: non-authoritative demo scorer
//! - `external`: remote classifier client
//!
//! The scoring boundary is the only stage that talks to something that can
//! fail; [`score_with_fallback`] absorbs those failures.

pub mod external;
pub mod mock;
pub mod rules;
pub mod statistical;
pub mod types;


use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::logic::features::FeatureMatrix;
use crate::logic::graph::TrafficGraph;
use crate::logic::traffic::TrafficSet;

pub use external::ExternalScorer;
pub use mock::MockScorer;
pub use rules::StatisticalThresholds;
pub use statistical::StatisticalScorer;
pub use types::{AnomalyFinding, AnomalyType};

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// Turns a TrafficSet (plus its graph and features) into findings.
///
/// Implementations must only return findings whose `connection_index` is a
/// valid index into `traffic` and whose `anomaly_score` is in [0, 1].
pub trait AnomalyScorer: Send + Sync {
    fn score(
        &self,
        traffic: &TrafficSet,
        graph: &TrafficGraph,
        features: &FeatureMatrix,
    ) -> CoreResult<Vec<AnomalyFinding>>;

    fn name(&self) -> &str {
        "custom"
    }

    /// False for scorers whose output is unrelated to the data
    fn authoritative(&self) -> bool {
        true
    }
}

// ============================================================================
// FALLBACK BOUNDARY
// ============================================================================

/// Findings plus which scorer actually produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub findings: Vec<AnomalyFinding>,
    pub scorer: String,
    pub authoritative: bool,
    /// Why the primary scorer was bypassed, if it was
    pub fallback_reason: Option<String>,
}

impl ScoreOutcome {
    pub fn fallback_used(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Drop findings pointing outside `traffic` and clamp scores into [0, 1]
pub fn sanitize(findings: Vec<AnomalyFinding>, traffic_len: usize) -> Vec<AnomalyFinding> {
    findings
        .into_iter()
        .filter(|f| f.connection_index < traffic_len && !f.anomaly_score.is_nan())
        .map(|mut f| {
            f.anomaly_score = f.anomaly_score.clamp(0.0, 1.0);
            f
        })
        .collect()
}

/// Run `primary`; on error log it and run `fallback` instead.
///
/// Never fails: if the fallback errors too, the outcome carries no findings
/// and both reasons.
pub fn score_with_fallback(
    primary: &dyn AnomalyScorer,
    fallback: &dyn AnomalyScorer,
    traffic: &TrafficSet,
    graph: &TrafficGraph,
    features: &FeatureMatrix,
) -> ScoreOutcome {
    let primary_err = match primary.score(traffic, graph, features) {
        Ok(findings) => {
            return ScoreOutcome {
                findings: sanitize(findings, traffic.len()),
                scorer: primary.name().to_string(),
                authoritative: primary.authoritative(),
                fallback_reason: None,
            };
        }
        Err(e) => e,
    };

    log::warn!(
        "Scorer '{}' failed ({}), falling back to '{}'",
        primary.name(),
        primary_err,
        fallback.name()
    );

    match fallback.score(traffic, graph, features) {
        Ok(findings) => ScoreOutcome {
            findings: sanitize(findings, traffic.len()),
            scorer: fallback.name().to_string(),
            authoritative: fallback.authoritative(),
            fallback_reason: Some(primary_err.to_string()),
        },
        Err(fallback_err) => {
            log::error!("Fallback scorer '{}' failed: {}", fallback.name(), fallback_err);
            ScoreOutcome {
                findings: Vec::new(),
                scorer: fallback.name().to_string(),
                authoritative: false,
                fallback_reason: Some(format!("{}; fallback: {}", primary_err, fallback_err)),
            }
        }
    }
}
