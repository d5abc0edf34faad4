//! Statistical Scorer
//!
//! Threshold rules over per-source features and the traffic graph. Every
//! rule that fires on a record proposes a (type, score); the record keeps the
//! highest score, ties broken by [`AnomalyType::precedence`].

use std::collections::{HashMap, HashSet};

use super::rules::{rule_score, StatisticalThresholds, SUSPICIOUS_PORT_SCORE};
use super::types::{AnomalyFinding, AnomalyType};
use super::AnomalyScorer;
use crate::error::CoreResult;
use crate::logic::features::FeatureMatrix;
use crate::logic::graph::{NodeKind, TrafficGraph};
use crate::logic::traffic::TrafficSet;

#[derive(Debug, Clone, Default)]
pub struct StatisticalScorer {
    thresholds: StatisticalThresholds,
}

impl StatisticalScorer {
    pub fn new(thresholds: StatisticalThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &StatisticalThresholds {
        &self.thresholds
    }

    /// Port scan score per scanning source
    fn scanning_sources<'a>(&self, features: &'a FeatureMatrix) -> HashMap<&'a str, f64> {
        let t = &self.thresholds;
        features
            .iter()
            .filter(|(_, f)| {
                f.unique_port_count >= t.scan_min_unique_ports
                    && f.port_to_connection_ratio >= t.scan_min_port_ratio
            })
            .map(|(id, f)| {
                let score = rule_score(f.unique_port_count as f64, t.scan_min_unique_ports as f64);
                (id.as_str(), score)
            })
            .collect()
    }

    /// DDoS score per flooded (destination, port) pair
    fn flooded_targets<'a>(&self, traffic: &'a TrafficSet) -> HashMap<(&'a str, u16), f64> {
        let mut sources: HashMap<(&str, u16), HashSet<&str>> = HashMap::new();
        for record in traffic.iter().filter(|r| r.is_well_formed()) {
            sources
                .entry((record.destination_ip.as_str(), record.destination_port))
                .or_default()
                .insert(record.source_ip.as_str());
        }

        let min_sources = self.thresholds.ddos_min_sources;
        sources
            .into_iter()
            .filter(|(_, s)| s.len() >= min_sources)
            .map(|(target, s)| (target, rule_score(s.len() as f64, min_sources as f64)))
            .collect()
    }

    /// Exfiltration score per bulk-sending source
    fn bulk_sources<'a>(&self, features: &'a FeatureMatrix) -> HashMap<&'a str, f64> {
        let threshold = self.thresholds.exfil_min_mean_packet_size;
        features
            .iter()
            .filter(|(_, f)| f.mean_packet_size >= threshold)
            .map(|(id, f)| (id.as_str(), rule_score(f.mean_packet_size, threshold)))
            .collect()
    }
}

impl AnomalyScorer for StatisticalScorer {
    fn score(
        &self,
        traffic: &TrafficSet,
        graph: &TrafficGraph,
        features: &FeatureMatrix,
    ) -> CoreResult<Vec<AnomalyFinding>> {
        let t = &self.thresholds;
        let scanners = self.scanning_sources(features);
        let floods = self.flooded_targets(traffic);
        let bulk = self.bulk_sources(features);

        let mut findings = Vec::new();

        for (index, record) in traffic.iter().enumerate() {
            if !record.is_well_formed() {
                continue;
            }
            let source = record.source_ip.as_str();
            let mut candidates: Vec<(AnomalyType, f64)> = Vec::with_capacity(4);

            if let Some(score) = scanners.get(source) {
                candidates.push((AnomalyType::PortScan, *score));
            }
            if let Some(score) = floods.get(&(record.destination_ip.as_str(), record.destination_port)) {
                candidates.push((AnomalyType::Ddos, *score));
            }
            if let Some(score) = bulk.get(source) {
                let external = graph.node_kind(&record.destination_ip) == Some(NodeKind::External);
                if external && record.packet_size >= t.exfil_min_packet_size {
                    candidates.push((AnomalyType::DataExfiltration, *score));
                }
            }
            if t.suspicious_ports.contains(&record.destination_port) {
                candidates.push((AnomalyType::Other, SUSPICIOUS_PORT_SCORE));
            }

            let best = candidates.into_iter().max_by(|a, b| {
                a.1.total_cmp(&b.1)
                    .then_with(|| a.0.precedence().cmp(&b.0.precedence()))
            });

            if let Some((anomaly_type, score)) = best {
                if score >= t.min_score {
                    findings.push(AnomalyFinding {
                        connection_index: index,
                        source_ip: record.source_ip.clone(),
                        destination_ip: record.destination_ip.clone(),
                        protocol: record.protocol.clone(),
                        port: record.destination_port,
                        anomaly_score: score,
                        anomaly_type,
                    });
                }
            }
        }

        log::debug!(
            "Statistical scorer: {} findings ({} scanners, {} flooded targets, {} bulk senders)",
            findings.len(),
            scanners.len(),
            floods.len(),
            bulk.len()
        );

        Ok(findings)
    }

    fn name(&self) -> &str {
        "statistical"
    }
}
