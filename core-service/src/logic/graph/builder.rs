//! Graph Builder
//!
//! TrafficSet → TrafficGraph. Records with an empty endpoint are skipped,
//! node insertion is first-write-wins, edge attributes are last-write-wins.
//! A record from an entity to itself becomes a self-loop edge.

use super::metrics::GraphMetrics;
use super::types::TrafficGraph;
use crate::logic::traffic::TrafficSet;

/// Build the graph and its metrics
pub fn build(traffic: &TrafficSet) -> (TrafficGraph, GraphMetrics) {
    let graph = build_graph(traffic);
    let metrics = GraphMetrics::compute(&graph);
    (graph, metrics)
}

pub fn build_graph(traffic: &TrafficSet) -> TrafficGraph {
    let mut graph = TrafficGraph::new();
    let mut skipped = 0usize;

    for record in traffic {
        if !record.is_well_formed() {
            skipped += 1;
            continue;
        }

        let source = graph.ensure_node(&record.source_ip);
        let destination = graph.ensure_node(&record.destination_ip);
        graph.upsert_edge(source, destination, record.protocol.clone(), record.destination_port);
    }

    if skipped > 0 {
        log::debug!("Graph builder skipped {} malformed records", skipped);
    }

    graph
}
