//! Features Module - Per-Source Feature Extraction
//!
//! Versioned layout, vector/matrix types and the extractor itself.

pub mod extractor;
pub mod layout;
pub mod vector;


pub use extractor::extract;
pub use layout::{layout_hash, validate_layout, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{FeatureMatrix, FeatureVector};
