//! Feature Vector - Per-Source Behaviour Summary
//!
//! One vector per source entity, plus the versioned matrix that carries the
//! whole mapping to a classifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layout::{feature_index, layout_hash, validate_layout, FEATURE_COUNT, FEATURE_VERSION};
use crate::error::CoreResult;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Fixed-width numeric summary of one source entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub connection_count: usize,
    pub unique_destination_count: usize,
    pub unique_port_count: usize,
    pub mean_packet_size: f64,
    pub port_to_connection_ratio: f64,
}

impl FeatureVector {
    /// Values in FEATURE_LAYOUT order
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.connection_count as f64,
            self.unique_destination_count as f64,
            self.unique_port_count as f64,
            self.mean_packet_size,
            self.port_to_connection_ratio,
        ]
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.as_array().get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }
}

impl From<FeatureVector> for [f64; FEATURE_COUNT] {
    fn from(vector: FeatureVector) -> Self {
        vector.as_array()
    }
}

// ============================================================================
// FEATURE MATRIX
// ============================================================================

/// Source id → FeatureVector, ordered by id, tagged with the layout it was
/// built against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub version: u8,
    pub layout_hash: u32,
    pub features: BTreeMap<String, FeatureVector>,
}

impl FeatureMatrix {
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            features: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, source: impl Into<String>, vector: FeatureVector) {
        self.features.insert(source.into(), vector);
    }

    pub fn get(&self, source: &str) -> Option<&FeatureVector> {
        self.features.get(source)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureVector)> {
        self.features.iter()
    }

    /// Source ids plus a row-major numeric matrix in the same order
    pub fn to_rows(&self) -> (Vec<String>, Vec<[f64; FEATURE_COUNT]>) {
        self.features
            .iter()
            .map(|(id, vector)| (id.clone(), vector.as_array()))
            .unzip()
    }

    /// Check the matrix was built against the current layout
    pub fn validate(&self) -> CoreResult<()> {
        validate_layout(self.version, self.layout_hash)
    }
}

impl Default for FeatureMatrix {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
