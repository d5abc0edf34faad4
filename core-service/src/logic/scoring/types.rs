//! Scoring Types
//!
//! Findings returned across the scoring boundary. No scoring logic here.

use serde::{Deserialize, Serialize};

use crate::logic::traffic::Protocol;

// ============================================================================
// ANOMALY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    PortScan,
    Ddos,
    #[serde(alias = "data_exfil")]
    DataExfiltration,
    Other,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::PortScan => "port_scan",
            AnomalyType::Ddos => "ddos",
            AnomalyType::DataExfiltration => "data_exfiltration",
            AnomalyType::Other => "other",
        }
    }

    /// Tie-break order when two rules give a record the same score
    /// (higher wins)
    pub fn precedence(&self) -> u8 {
        match self {
            AnomalyType::PortScan => 3,
            AnomalyType::Ddos => 2,
            AnomalyType::DataExfiltration => 1,
            AnomalyType::Other => 0,
        }
    }
}

impl std::fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ANOMALY FINDING
// ============================================================================

/// A scored, typed flag on one connection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    /// Index into the scored TrafficSet
    pub connection_index: usize,
    pub source_ip: String,
    pub destination_ip: String,
    pub protocol: Protocol,
    pub port: u16,
    /// In [0, 1]
    pub anomaly_score: f64,
    pub anomaly_type: AnomalyType,
}

impl AnomalyFinding {
    /// Holds for a TrafficSet of `traffic_len` records
    pub fn is_valid_for(&self, traffic_len: usize) -> bool {
        self.connection_index < traffic_len && (0.0..=1.0).contains(&self.anomaly_score)
    }
}
