//! Feature Extractor
//!
//! Groups records by the literal source identifier and summarizes each group.
//! No randomness: the same TrafficSet always yields the same matrix.

use std::collections::{BTreeMap, HashSet};

use super::vector::{FeatureMatrix, FeatureVector};
use crate::logic::traffic::TrafficSet;

/// Running totals for one source
#[derive(Default)]
struct SourceStats<'a> {
    connections: usize,
    destinations: HashSet<&'a str>,
    ports: HashSet<u16>,
    bytes: u64,
}

impl SourceStats<'_> {
    fn finish(&self) -> FeatureVector {
        if self.connections == 0 {
            return FeatureVector::default();
        }
        let connections = self.connections as f64;
        FeatureVector {
            connection_count: self.connections,
            unique_destination_count: self.destinations.len(),
            unique_port_count: self.ports.len(),
            mean_packet_size: self.bytes as f64 / connections,
            port_to_connection_ratio: self.ports.len() as f64 / connections,
        }
    }
}

/// Build one FeatureVector per source entity, skipping malformed records
pub fn extract(traffic: &TrafficSet) -> FeatureMatrix {
    let mut groups: BTreeMap<&str, SourceStats> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in traffic {
        if !record.is_well_formed() {
            skipped += 1;
            continue;
        }
        let stats = groups.entry(record.source_ip.as_str()).or_default();
        stats.connections += 1;
        stats.destinations.insert(record.destination_ip.as_str());
        stats.ports.insert(record.destination_port);
        stats.bytes += u64::from(record.packet_size);
    }

    if skipped > 0 {
        log::debug!("Feature extraction skipped {} malformed records", skipped);
    }

    let mut matrix = FeatureMatrix::new();
    for (source, stats) in groups {
        matrix.insert(source, stats.finish());
    }
    matrix
}
