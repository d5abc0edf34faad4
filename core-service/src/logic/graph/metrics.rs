//! Graph Metrics
//!
//! Structural metrics over the undirected traffic graph. Pure functions of
//! the graph, recomputed on every call.

use std::collections::HashSet;

use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::types::TrafficGraph;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// edges / (n·(n−1)/2), 0 when n ≤ 1
    pub density: f64,
    /// 2·edges / n, 0 when n = 0
    pub average_degree: f64,
    pub connected_component_count: usize,
    /// Mean local clustering coefficient, 0 when n ≤ 1
    pub average_clustering_coefficient: f64,
}

impl GraphMetrics {
    pub fn compute(graph: &TrafficGraph) -> Self {
        let nodes = graph.node_count();
        let edges = graph.edge_count();

        let density = if nodes > 1 {
            edges as f64 / (nodes as f64 * (nodes as f64 - 1.0) / 2.0)
        } else {
            0.0
        };

        let average_degree = if nodes > 0 {
            2.0 * edges as f64 / nodes as f64
        } else {
            0.0
        };

        Self {
            node_count: nodes,
            edge_count: edges,
            density,
            average_degree,
            connected_component_count: connected_components(&graph.graph),
            average_clustering_coefficient: average_clustering(graph),
        }
    }
}

/// Local clustering of one node: closed triangles over possible neighbor pairs
fn local_clustering(graph: &TrafficGraph, node: NodeIndex) -> f64 {
    let neighbors: HashSet<NodeIndex> = graph.graph.neighbors(node).filter(|n| *n != node).collect();
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }

    let neighbor_set = &neighbors;
    let links = neighbors
        .iter()
        .flat_map(|&u| {
            graph
                .graph
                .neighbors(u)
                .filter(move |w| *w != u && neighbor_set.contains(w))
        })
        .count()
        / 2;

    2.0 * links as f64 / (k as f64 * (k as f64 - 1.0))
}

fn average_clustering(graph: &TrafficGraph) -> f64 {
    let n = graph.node_count();
    if n <= 1 {
        return 0.0;
    }
    let total: f64 = graph
        .graph
        .node_indices()
        .map(|idx| local_clustering(graph, idx))
        .sum();
    total / n as f64
}
