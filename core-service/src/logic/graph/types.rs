//! Graph Types
//!
//! Node / edge attributes, the graph container and its serializable views.

use std::collections::HashMap;
use std::net::IpAddr;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::metrics::GraphMetrics;
use crate::logic::traffic::Protocol;

// ============================================================================
// NODE KIND
// ============================================================================

/// Where a network entity sits relative to the monitored network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Internal,
    External,
    Unknown,
}

impl NodeKind {
    /// Classify an identifier: private / loopback / link-local addresses are
    /// internal, other IPs external, anything unparseable unknown.
    pub fn classify(id: &str) -> Self {
        match id.parse::<IpAddr>() {
            Ok(IpAddr::V4(v4)) => {
                if v4.is_private() || v4.is_loopback() || v4.is_link_local() {
                    NodeKind::Internal
                } else {
                    NodeKind::External
                }
            }
            Ok(IpAddr::V6(v6)) => {
                let segment = v6.segments()[0];
                let unique_local = (segment & 0xfe00) == 0xfc00;
                let link_local = (segment & 0xffc0) == 0xfe80;
                if v6.is_loopback() || unique_local || link_local {
                    NodeKind::Internal
                } else {
                    NodeKind::External
                }
            }
            Err(_) => NodeKind::Unknown,
        }
    }
}

// ============================================================================
// NODE & EDGE ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficNode {
    pub id: String,
    pub kind: NodeKind,
}

/// Edge attributes. `protocol` and `port` come from the most recently
/// processed record on the pair; `weight` counts collapsed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficEdge {
    pub protocol: Protocol,
    pub port: u16,
    pub weight: u32,
}

/// Flattened edge for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub protocol: Protocol,
    pub port: u16,
    pub weight: u32,
}

// ============================================================================
// TRAFFIC GRAPH
// ============================================================================

/// Undirected summary graph of communicating entities
#[derive(Debug, Clone, Default)]
pub struct TrafficGraph {
    pub(super) graph: UnGraph<TrafficNode, TrafficEdge>,
    pub(super) index: HashMap<String, NodeIndex>,
}

impl TrafficGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node if absent; an existing node keeps its first-seen kind
    pub(super) fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(id) {
            return *idx;
        }
        let idx = self.graph.add_node(TrafficNode {
            id: id.to_string(),
            kind: NodeKind::classify(id),
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Insert or overwrite the edge between two nodes (last write wins)
    pub(super) fn upsert_edge(&mut self, a: NodeIndex, b: NodeIndex, protocol: Protocol, port: u16) {
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                if let Some(attrs) = self.graph.edge_weight_mut(edge) {
                    attrs.protocol = protocol;
                    attrs.port = port;
                    attrs.weight += 1;
                }
            }
            None => {
                self.graph.add_edge(a, b, TrafficEdge { protocol, port, weight: 1 });
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_kind(&self, id: &str) -> Option<NodeKind> {
        self.index.get(id).map(|idx| self.graph[*idx].kind)
    }

    pub fn degree(&self, id: &str) -> usize {
        self.index
            .get(id)
            .map(|idx| self.graph.neighbors(*idx).count())
            .unwrap_or(0)
    }

    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(idx) => self
                .graph
                .neighbors(*idx)
                .map(|n| self.graph[n].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Edge attributes between two entities, in either direction
    pub fn edge(&self, a: &str, b: &str) -> Option<&TrafficEdge> {
        let (ia, ib) = (self.index.get(a)?, self.index.get(b)?);
        let edge = self.graph.find_edge(*ia, *ib)?;
        self.graph.edge_weight(edge)
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> Vec<TrafficNode> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Edges in first-seen order
    pub fn edges(&self) -> Vec<EdgeView> {
        self.graph
            .edge_references()
            .map(|e| EdgeView {
                source: self.graph[e.source()].id.clone(),
                target: self.graph[e.target()].id.clone(),
                protocol: e.weight().protocol.clone(),
                port: e.weight().port,
                weight: e.weight().weight,
            })
            .collect()
    }
}

// ============================================================================
// GRAPH SUMMARY
// ============================================================================

/// Everything the transport / rendering layers need about one graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub metrics: GraphMetrics,
    pub nodes: Vec<TrafficNode>,
    pub edges: Vec<EdgeView>,
    pub skipped_records: usize,
}

impl GraphSummary {
    pub fn new(graph: &TrafficGraph, metrics: GraphMetrics, skipped_records: usize) -> Self {
        Self {
            metrics,
            nodes: graph.nodes(),
            edges: graph.edges(),
            skipped_records,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_classification() {
        assert_eq!(NodeKind::classify("192.168.1.4"), NodeKind::Internal);
        assert_eq!(NodeKind::classify("10.0.0.1"), NodeKind::Internal);
        assert_eq!(NodeKind::classify("127.0.0.1"), NodeKind::Internal);
        assert_eq!(NodeKind::classify("fd00::1"), NodeKind::Internal);
        assert_eq!(NodeKind::classify("203.0.113.5"), NodeKind::External);
        assert_eq!(NodeKind::classify("2001:db8::1"), NodeKind::External);
        assert_eq!(NodeKind::classify("host-a"), NodeKind::Unknown);
    }

    #[test]
    fn test_ensure_node_idempotent() {
        let mut graph = TrafficGraph::new();
        let a = graph.ensure_node("10.0.0.1");
        let b = graph.ensure_node("10.0.0.1");
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_upsert_edge_last_write_wins() {
        let mut graph = TrafficGraph::new();
        let a = graph.ensure_node("a");
        let b = graph.ensure_node("b");
        graph.upsert_edge(a, b, Protocol::Tcp, 22);
        graph.upsert_edge(b, a, Protocol::Udp, 53);

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge("a", "b").unwrap();
        assert_eq!(edge.protocol, Protocol::Udp);
        assert_eq!(edge.port, 53);
        assert_eq!(edge.weight, 2);
    }
}
