//! Statistical Scoring Rules & Thresholds
//!
//! Constants and the configurable threshold set. No scoring logic here
//! beyond the shared score formula.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// THRESHOLDS (defaults)
// ============================================================================

/// A source probing at least this many distinct ports...
pub const SCAN_MIN_UNIQUE_PORTS: usize = 8;

/// ...with at least this ports/connections ratio is scanning
pub const SCAN_MIN_PORT_RATIO: f64 = 0.8;

/// Distinct sources hitting one (destination, port) pair for a flood
pub const DDOS_MIN_SOURCES: usize = 5;

/// Mean packet size (bytes) of a source shipping bulk data
pub const EXFIL_MIN_MEAN_PACKET_SIZE: f64 = 1000.0;

/// Packet size (bytes) of an individual exfiltration record
pub const EXFIL_MIN_PACKET_SIZE: u32 = 1000;

/// Ports commonly used by backdoors and reverse shells
pub const SUSPICIOUS_PORTS: &[u16] = &[4444, 5555, 9999, 1234, 31337, 12345];

/// Findings below this score are dropped
pub const MIN_SCORE: f64 = 0.5;

// ============================================================================
// SCORES
// ============================================================================

/// Lowest score a fired rule can produce
pub const RULE_SCORE_FLOOR: f64 = 0.5;

/// Fixed score for traffic to a suspicious port
pub const SUSPICIOUS_PORT_SCORE: f64 = 0.6;

/// Score of a fired rule: reaching the threshold gives the floor, twice the
/// threshold gives 1.0
pub fn rule_score(value: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (value / (2.0 * threshold)).clamp(RULE_SCORE_FLOOR, 1.0)
}

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticalThresholds {
    pub scan_min_unique_ports: usize,
    pub scan_min_port_ratio: f64,
    pub ddos_min_sources: usize,
    pub exfil_min_mean_packet_size: f64,
    pub exfil_min_packet_size: u32,
    pub suspicious_ports: Vec<u16>,
    pub min_score: f64,
}

impl Default for StatisticalThresholds {
    fn default() -> Self {
        Self {
            scan_min_unique_ports: SCAN_MIN_UNIQUE_PORTS,
            scan_min_port_ratio: SCAN_MIN_PORT_RATIO,
            ddos_min_sources: DDOS_MIN_SOURCES,
            exfil_min_mean_packet_size: EXFIL_MIN_MEAN_PACKET_SIZE,
            exfil_min_packet_size: EXFIL_MIN_PACKET_SIZE,
            suspicious_ports: SUSPICIOUS_PORTS.to_vec(),
            min_score: MIN_SCORE,
        }
    }
}

impl StatisticalThresholds {
    /// High sensitivity - lower thresholds, more findings
    pub fn high_sensitivity() -> Self {
        Self {
            scan_min_unique_ports: 5,
            scan_min_port_ratio: 0.6,
            ddos_min_sources: 3,
            exfil_min_mean_packet_size: 800.0,
            exfil_min_packet_size: 800,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.scan_min_unique_ports == 0 || self.ddos_min_sources == 0 {
            return Err(CoreError::Configuration(
                "count thresholds must be at least 1".to_string(),
            ));
        }
        if !(self.scan_min_port_ratio > 0.0 && self.scan_min_port_ratio <= 1.0) {
            return Err(CoreError::Configuration(format!(
                "scan_min_port_ratio must be in (0, 1], got {}",
                self.scan_min_port_ratio
            )));
        }
        if !(self.exfil_min_mean_packet_size > 0.0) {
            return Err(CoreError::Configuration(
                "exfil_min_mean_packet_size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(CoreError::Configuration(format!(
                "min_score must be in [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
