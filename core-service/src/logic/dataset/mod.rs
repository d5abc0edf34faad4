//! Dataset Module - Sample Traffic Persistence
//!
//! A sample dataset is two JSON documents in one directory: the array of
//! records and a parallel 0/1 label array. Nothing else is persisted.

pub mod writer;


use std::path::PathBuf;

pub use writer::{load_sample, save_sample, SamplePaths};

/// Default directory for sample datasets
pub fn default_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quantumeyes")
        .join("dataset")
}
