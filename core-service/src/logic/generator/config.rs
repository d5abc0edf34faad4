//! Generator Configuration
//!
//! Address pools, port sets and anomaly mix. No generation logic here.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXTERNAL_PROBABILITY, DEFAULT_TIMESTAMP_JITTER_MS, MAX_PACKET_SIZE, MIN_PACKET_SIZE,
    SEEDED_EPOCH_SECS,
};
use crate::error::{CoreError, CoreResult};
use crate::logic::traffic::Protocol;

// ============================================================================
// ADDRESS POOLS & PORTS
// ============================================================================

/// Known-bad addresses used as attackers / exfiltration sinks
pub const MALICIOUS_IPS: &[&str] = &[
    "185.143.223.12",
    "91.121.87.45",
    "45.95.168.112",
    "194.5.249.157",
    "194.36.191.35",
];

/// Well-known service ports used by normal traffic and DDoS targets
pub const COMMON_PORTS: &[u16] = &[80, 443, 22, 25, 53, 123, 389, 636, 3389];

/// Protocols drawn for normal traffic
pub const NORMAL_PROTOCOLS: &[Protocol] = &[
    Protocol::Tcp,
    Protocol::Udp,
    Protocol::Icmp,
    Protocol::Http,
    Protocol::Https,
    Protocol::Dns,
    Protocol::Ntp,
];

/// Protocols drawn for DDoS floods
pub const DDOS_PROTOCOLS: &[Protocol] = &[Protocol::Tcp, Protocol::Udp, Protocol::Icmp];

/// Protocols drawn for data exfiltration
pub const EXFIL_PROTOCOLS: &[Protocol] = &[Protocol::Http, Protocol::Https, Protocol::Dns];

fn internal_pool() -> Vec<String> {
    (1..=30).map(|i| format!("192.168.1.{}", i)).collect()
}

fn external_pool() -> Vec<String> {
    (1..20)
        .map(|i| format!("203.0.113.{}", i))
        .chain((1..20).map(|i| format!("198.51.100.{}", i)))
        .collect()
}

// ============================================================================
// ANOMALY KIND & MIX
// ============================================================================

/// Synthetic anomaly archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    PortScan,
    Ddos,
    #[serde(alias = "data_exfil")]
    DataExfiltration,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 3] = [
        AnomalyKind::PortScan,
        AnomalyKind::Ddos,
        AnomalyKind::DataExfiltration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::PortScan => "port_scan",
            AnomalyKind::Ddos => "ddos",
            AnomalyKind::DataExfiltration => "data_exfiltration",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnomalyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "port_scan" => Ok(AnomalyKind::PortScan),
            "ddos" => Ok(AnomalyKind::Ddos),
            "data_exfiltration" | "data_exfil" => Ok(AnomalyKind::DataExfiltration),
            other => Err(CoreError::Configuration(format!(
                "unsupported anomaly type '{}'",
                other
            ))),
        }
    }
}

/// Relative weights of the three archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyMix {
    pub port_scan: u32,
    pub ddos: u32,
    pub data_exfiltration: u32,
}

impl AnomalyMix {
    /// Equal share for every archetype
    pub fn even() -> Self {
        Self {
            port_scan: 1,
            ddos: 1,
            data_exfiltration: 1,
        }
    }

    /// A single archetype
    pub fn only(kind: AnomalyKind) -> Self {
        let mut mix = Self {
            port_scan: 0,
            ddos: 0,
            data_exfiltration: 0,
        };
        match kind {
            AnomalyKind::PortScan => mix.port_scan = 1,
            AnomalyKind::Ddos => mix.ddos = 1,
            AnomalyKind::DataExfiltration => mix.data_exfiltration = 1,
        }
        mix
    }

    pub fn weight(&self, kind: AnomalyKind) -> u32 {
        match kind {
            AnomalyKind::PortScan => self.port_scan,
            AnomalyKind::Ddos => self.ddos,
            AnomalyKind::DataExfiltration => self.data_exfiltration,
        }
    }

    /// Split `total` across archetypes by weight.
    ///
    /// Each share is `floor(total * weight / sum)`; the remainder is dropped,
    /// so the allocated sum may be less than `total`.
    pub fn allocate(&self, total: usize) -> [(AnomalyKind, usize); 3] {
        let sum: u64 = AnomalyKind::ALL.iter().map(|k| self.weight(*k) as u64).sum();
        AnomalyKind::ALL.map(|kind| {
            let share = if sum == 0 {
                0
            } else {
                (total as u64 * self.weight(kind) as u64 / sum) as usize
            };
            (kind, share)
        })
    }
}

impl Default for AnomalyMix {
    fn default() -> Self {
        Self::even()
    }
}

// ============================================================================
// GENERATOR CONFIG
// ============================================================================

/// Generator Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Addresses treated as inside the monitored network
    pub internal_ips: Vec<String>,

    /// Benign outside addresses
    pub external_ips: Vec<String>,

    /// Attacker / sink addresses
    pub malicious_ips: Vec<String>,

    /// Destination ports for normal traffic
    pub common_ports: Vec<u16>,

    /// Protocols for normal traffic
    pub protocols: Vec<Protocol>,

    /// Probability a normal connection targets an external address
    pub external_probability: f64,

    /// Packet size bounds (inclusive) for normal traffic
    pub packet_size_range: (u32, u32),

    /// First generated timestamp; `None` anchors seeded generators at
    /// [`SEEDED_EPOCH_SECS`] and entropy-seeded ones at the current time
    pub start_time: Option<DateTime<Utc>>,

    /// Max gap between consecutive timestamps (ms)
    pub max_jitter_ms: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            internal_ips: internal_pool(),
            external_ips: external_pool(),
            malicious_ips: MALICIOUS_IPS.iter().map(|s| s.to_string()).collect(),
            common_ports: COMMON_PORTS.to_vec(),
            protocols: NORMAL_PROTOCOLS.to_vec(),
            external_probability: DEFAULT_EXTERNAL_PROBABILITY,
            packet_size_range: (MIN_PACKET_SIZE, MAX_PACKET_SIZE),
            start_time: None,
            max_jitter_ms: DEFAULT_TIMESTAMP_JITTER_MS,
        }
    }
}

impl GeneratorConfig {
    /// Replace the normal-traffic protocol set, rejecting unknown names
    pub fn with_protocols(mut self, names: &[&str]) -> CoreResult<Self> {
        let protocols = names
            .iter()
            .map(|name| Protocol::parse_supported(name))
            .collect::<CoreResult<Vec<_>>>()?;
        if protocols.is_empty() {
            return Err(CoreError::Configuration(
                "at least one protocol is required".to_string(),
            ));
        }
        self.protocols = protocols;
        Ok(self)
    }

    pub fn with_external_probability(mut self, probability: f64) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(CoreError::Configuration(format!(
                "external probability {} outside [0, 1]",
                probability
            )));
        }
        self.external_probability = probability;
        Ok(self)
    }

    /// Clock anchor for a generator; seeded runs never read the wall clock
    pub fn start_for(&self, seeded: bool) -> DateTime<Utc> {
        match self.start_time {
            Some(start) => start,
            None if seeded => Utc
                .timestamp_opt(SEEDED_EPOCH_SECS, 0)
                .single()
                .unwrap_or_default(),
            None => Utc::now(),
        }
    }

    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Check pools and ranges are usable
    pub fn validate(&self) -> CoreResult<()> {
        if self.internal_ips.len() < 2 {
            return Err(CoreError::Configuration(
                "internal pool needs at least two addresses".to_string(),
            ));
        }
        if self.external_ips.is_empty() || self.malicious_ips.is_empty() {
            return Err(CoreError::Configuration(
                "external and malicious pools must not be empty".to_string(),
            ));
        }
        if self.common_ports.is_empty() || self.protocols.is_empty() {
            return Err(CoreError::Configuration(
                "port and protocol sets must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.external_probability) {
            return Err(CoreError::Configuration(format!(
                "external probability {} outside [0, 1]",
                self.external_probability
            )));
        }
        let (lo, hi) = self.packet_size_range;
        if lo > hi {
            return Err(CoreError::Configuration(format!(
                "invalid packet size range [{}, {}]",
                lo, hi
            )));
        }
        if self.max_jitter_ms < 1 {
            return Err(CoreError::Configuration(
                "timestamp jitter must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.internal_ips.len(), 30);
        assert_eq!(config.external_ips.len(), 38);
    }

    #[test]
    fn test_with_protocols_rejects_unknown() {
        let result = GeneratorConfig::default().with_protocols(&["tcp", "carrier-pigeon"]);
        assert!(matches!(result, Err(CoreError::Configuration(_))));

        let config = GeneratorConfig::default().with_protocols(&["dns"]).unwrap();
        assert_eq!(config.protocols, vec![Protocol::Dns]);
    }

    #[test]
    fn test_even_mix_drops_remainder() {
        let shares = AnomalyMix::even().allocate(31);
        let total: usize = shares.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 30);
        assert!(shares.iter().all(|(_, n)| *n == 10));
    }

    #[test]
    fn test_weighted_mix() {
        let mix = AnomalyMix {
            port_scan: 2,
            ddos: 1,
            data_exfiltration: 0,
        };
        let shares = mix.allocate(9);
        assert_eq!(shares[0], (AnomalyKind::PortScan, 6));
        assert_eq!(shares[1], (AnomalyKind::Ddos, 3));
        assert_eq!(shares[2], (AnomalyKind::DataExfiltration, 0));
    }

    #[test]
    fn test_zero_mix_allocates_nothing() {
        let mix = AnomalyMix {
            port_scan: 0,
            ddos: 0,
            data_exfiltration: 0,
        };
        assert!(mix.allocate(12).iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_anomaly_kind_parse() {
        assert_eq!("data_exfil".parse::<AnomalyKind>().unwrap(), AnomalyKind::DataExfiltration);
        assert!("brute_force".parse::<AnomalyKind>().is_err());
    }
}
