//! Central Configuration Constants
//!
//! Single source of truth for pipeline defaults.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "QuantumEyes";

// ============================================
// Synthetic traffic
// ============================================

/// Probability that a normal connection leaves the internal network
pub const DEFAULT_EXTERNAL_PROBABILITY: f64 = 0.8;

/// Packet size range for normal and DDoS traffic (bytes)
pub const MIN_PACKET_SIZE: u32 = 64;
pub const MAX_PACKET_SIZE: u32 = 1500;

/// Probe packet size used by port scans
pub const PROBE_PACKET_SIZE: u32 = 64;

/// Bulk transfer packet size range used by data exfiltration
pub const EXFIL_MIN_PACKET_SIZE: u32 = 1000;
pub const EXFIL_MAX_PACKET_SIZE: u32 = 8000;

/// Share of data exfiltration records sent to 443 (rest go to 53)
pub const EXFIL_HTTPS_PROBABILITY: f64 = 0.7;

/// Ephemeral source port range
pub const EPHEMERAL_PORT_MIN: u16 = 49152;
pub const EPHEMERAL_PORT_MAX: u16 = 65535;

/// Upper bound of the random port scan start offset
pub const PORT_SCAN_MAX_START: u16 = 1000;

/// Clock anchor of seeded generators: 2024-01-01T00:00:00Z
pub const SEEDED_EPOCH_SECS: i64 = 1_704_067_200;

/// Max jitter between consecutive generated timestamps (milliseconds)
pub const DEFAULT_TIMESTAMP_JITTER_MS: i64 = 2_000;

// ============================================
// Transport defaults
// ============================================

/// Records generated when a graph/features request has no body
pub const DEFAULT_GRAPH_SAMPLE_SIZE: usize = 50;

/// Records generated when a detect request has no body
pub const DEFAULT_DETECT_SAMPLE_SIZE: usize = 100;

/// Share of anomalies in generated demo traffic
pub const DEFAULT_DEMO_ANOMALY_RATIO: f64 = 0.1;

/// External backend request timeout (milliseconds)
pub const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 5_000;

// ============================================
// Dataset
// ============================================

pub const SAMPLE_DATA_FILE: &str = "sample_network_data.json";
pub const SAMPLE_LABELS_FILE: &str = "sample_labels.json";
