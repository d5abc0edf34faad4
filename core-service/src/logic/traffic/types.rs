//! Traffic Types
//!
//! Core data model: one connection record and the ordered set of them.
//! No pipeline logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// PROTOCOL
// ============================================================================

/// Transport / application protocol of a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Http,
    Https,
    Dns,
    Ntp,
    Smtp,
    Ftp,
    Ssh,
    /// Anything seen on the wire that is not in the known set
    Other(String),
}

impl Protocol {
    /// All protocols with a dedicated variant
    pub const KNOWN: [Protocol; 10] = [
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Icmp,
        Protocol::Http,
        Protocol::Https,
        Protocol::Dns,
        Protocol::Ntp,
        Protocol::Smtp,
        Protocol::Ftp,
        Protocol::Ssh,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
            Protocol::Dns => "DNS",
            Protocol::Ntp => "NTP",
            Protocol::Smtp => "SMTP",
            Protocol::Ftp => "FTP",
            Protocol::Ssh => "SSH",
            Protocol::Other(name) => name,
        }
    }

    /// Lenient parse for incoming records, never fails
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        Self::KNOWN
            .iter()
            .find(|p| p.as_str() == upper)
            .cloned()
            .unwrap_or(Protocol::Other(upper))
    }

    /// Strict parse for configuration, unknown names are rejected
    pub fn parse_supported(name: &str) -> CoreResult<Self> {
        match Self::from_name(name) {
            Protocol::Other(other) => Err(CoreError::Configuration(format!(
                "unsupported protocol '{}'",
                other
            ))),
            known => Ok(known),
        }
    }

    /// Well-known destination port implied by the protocol, if any
    pub fn implied_port(&self) -> Option<u16> {
        match self {
            Protocol::Http => Some(80),
            Protocol::Https => Some(443),
            _ => None,
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::Tcp
    }
}

impl From<String> for Protocol {
    fn from(name: String) -> Self {
        Protocol::from_name(&name)
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        protocol.as_str().to_string()
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TIMESTAMP
// ============================================================================

/// Ordering key of a record: arrival sequence number or wall clock instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Sequence(u64),
    Wall(DateTime<Utc>),
}

// ============================================================================
// TRAFFIC RECORD
// ============================================================================

/// `null` reads as the field's default, same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One observed or synthesized connection event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: Protocol,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_port: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination_port: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub packet_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    /// Ground-truth label, only present on synthetic / labeled data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anomaly: Option<bool>,
}

impl TrafficRecord {
    pub fn new(
        source_ip: impl Into<String>,
        destination_ip: impl Into<String>,
        protocol: Protocol,
        destination_port: u16,
    ) -> Self {
        Self {
            source_ip: source_ip.into(),
            destination_ip: destination_ip.into(),
            protocol,
            source_port: 0,
            destination_port,
            packet_size: 0,
            timestamp: None,
            is_anomaly: None,
        }
    }

    pub fn with_source_port(mut self, port: u16) -> Self {
        self.source_port = port;
        self
    }

    pub fn with_packet_size(mut self, size: u32) -> Self {
        self.packet_size = size;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_label(mut self, is_anomaly: bool) -> Self {
        self.is_anomaly = Some(is_anomaly);
        self
    }

    /// Both endpoints are present
    pub fn is_well_formed(&self) -> bool {
        !self.source_ip.is_empty() && !self.destination_ip.is_empty()
    }

    pub fn is_labeled_anomaly(&self) -> bool {
        self.is_anomaly.unwrap_or(false)
    }
}

// ============================================================================
// TRAFFIC SET
// ============================================================================

/// Ordered sequence of records; insertion order is arrival order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrafficSet {
    records: Vec<TrafficRecord>,
}

impl TrafficSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TrafficRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrafficRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrafficRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TrafficRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TrafficRecord> {
        self.records
    }

    /// Parallel 0/1 label array (unlabeled records count as 0)
    pub fn labels(&self) -> Vec<u8> {
        self.records
            .iter()
            .map(|r| u8::from(r.is_labeled_anomaly()))
            .collect()
    }

    pub fn anomaly_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_labeled_anomaly()).count()
    }

    /// Records that the graph builder and feature extractor will skip
    pub fn skipped_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_well_formed()).count()
    }
}

impl From<Vec<TrafficRecord>> for TrafficSet {
    fn from(records: Vec<TrafficRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<TrafficRecord> for TrafficSet {
    fn from_iter<I: IntoIterator<Item = TrafficRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<TrafficRecord> for TrafficSet {
    fn extend<I: IntoIterator<Item = TrafficRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TrafficSet {
    type Item = &'a TrafficRecord;
    type IntoIter = std::slice::Iter<'a, TrafficRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
