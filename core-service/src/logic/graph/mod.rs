//! Graph Module - Traffic Graph Construction
//!
//! ## Structure
//! - `types`: Node / edge attributes, `TrafficGraph`, `GraphSummary`
//! - `builder`: TrafficSet → TrafficGraph
//! - `metrics`: Density, degree, components, clustering
//!
//! Multiple records between the same pair collapse into one edge whose
//! protocol/port reflect the last record processed. The graph is a summary,
//! not an audit log.

pub mod types;
pub mod builder;
pub mod metrics;


pub use builder::{build, build_graph};
pub use metrics::GraphMetrics;
pub use types::{EdgeView, GraphSummary, NodeKind, TrafficEdge, TrafficGraph, TrafficNode};
