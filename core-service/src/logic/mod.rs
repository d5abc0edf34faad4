//! Logic Module - Pipeline Stages
//!
//! - `traffic/` - Data model (records, sets)
//! - `generator/` - Synthetic traffic with labeled anomalies
//! - `graph/` - Traffic graph and structural metrics
//! - `features/` - Per-source feature vectors
//! - `scoring/` - Pluggable anomaly scorers
//! - `dataset/` - Sample dataset persistence
//! - `config` / `pipeline` - Per-request configuration and orchestration

pub mod traffic;
pub mod generator;
pub mod graph;
pub mod features;
pub mod scoring;
pub mod dataset;
pub mod config;
pub mod pipeline;
