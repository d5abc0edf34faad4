//! QuantumEyes Core - Traffic Analysis Pipeline
//!
//! Turns raw connection records into a typed traffic graph, structural graph
//! metrics and a fixed-width feature vector per source entity, then hands them
//! to a pluggable anomaly scorer.
//!
//! ```text
//! Generator ─▶ TrafficSet ─▶ Graph Builder ─▶ (Graph, Metrics)
//!                   │                               │
//!                   └──────▶ Feature Extractor ─────┴─▶ Scorer ─▶ AnomalyReport
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{CoreError, CoreResult};
pub use logic::config::{ConfigUpdate, PipelineConfig, ScorerKind};
pub use logic::features::{extract, FeatureMatrix, FeatureVector};
pub use logic::generator::{AnomalyKind, AnomalyMix, GeneratorConfig, TrafficGenerator};
pub use logic::graph::{build, GraphMetrics, GraphSummary, NodeKind, TrafficGraph};
pub use logic::pipeline::{detect, summarize_graph, AnomalyReport};
pub use logic::scoring::{AnomalyFinding, AnomalyScorer, AnomalyType};
pub use logic::traffic::{Protocol, Timestamp, TrafficRecord, TrafficSet};
