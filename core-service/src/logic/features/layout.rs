//! Feature Layout - Per-Source Feature Schema
//!
//! ## Rules
//! 1. Add, remove or reorder a feature → increment FEATURE_VERSION
//! 2. External backends reject vectors whose layout hash differs
//!
//! The hash covers the version byte and every name, so a backend trained on
//! one layout cannot silently score another.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Feature names in the order they appear in a vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "connection_count",         // 0: records sent by the source
    "unique_destination_count", // 1: distinct destination identifiers
    "unique_port_count",        // 2: distinct destination ports
    "mean_packet_size",         // 3: mean packet size in bytes
    "port_to_connection_ratio", // 4: unique ports / connections
];

/// Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 5;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version byte and the null-separated feature names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// What a classifier needs to know to interpret a row of features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,
    /// Column names, in row order
    pub features: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        let features: Vec<String> = FEATURE_LAYOUT.iter().map(|name| (*name).to_owned()).collect();
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            feature_count: features.len(),
            features,
        }
    }

    /// Same version and hash as the running layout
    pub fn is_current(&self) -> bool {
        validate_layout(self.version, self.layout_hash).is_ok()
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Reject a (version, hash) pair that does not describe the current layout
pub fn validate_layout(version: u8, hash: u32) -> Result<(), CoreError> {
    let expected = layout_hash();
    if version == FEATURE_VERSION && hash == expected {
        return Ok(());
    }
    Err(CoreError::InvalidInput(format!(
        "feature layout mismatch: expected v{} ({:08x}), got v{} ({:08x})",
        FEATURE_VERSION, expected, version, hash
    )))
}

/// Column of a named feature
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|candidate| *candidate == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_width_matches_vector() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_stable() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_feature_lookup() {
        assert_eq!(feature_index("connection_count"), Some(0));
        assert_eq!(feature_index("port_to_connection_ratio"), Some(4));
        assert_eq!(feature_index("cpu_percent"), None);
    }

    #[test]
    fn test_layout_descriptor() {
        let mut info = LayoutInfo::current();
        assert_eq!(info.features[3], "mean_packet_size");
        assert_eq!(info.feature_count, FEATURE_COUNT);
        assert!(info.is_current());

        info.layout_hash ^= 1;
        assert!(!info.is_current());
    }
}
