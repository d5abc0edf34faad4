//! Generator Module - Synthetic Traffic
//!
//! Labeled traffic for demos, tests and offline training.
//!
//! ## Usage
//! ```ignore
//! let mut generator = TrafficGenerator::seeded(GeneratorConfig::default(), 42)?;
//! let traffic = generator.generate_mixed(100, 30);
//! assert_eq!(traffic.len(), 130);
//! ```

pub mod config;
pub mod engine;

#[cfg(test)]
mod tests;

pub use config::{AnomalyKind, AnomalyMix, GeneratorConfig};
pub use engine::TrafficGenerator;
