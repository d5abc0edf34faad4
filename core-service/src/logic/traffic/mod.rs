//! Traffic Module - Connection Records
//!
//! The data model every pipeline stage consumes.

pub mod types;

pub use types::{Protocol, Timestamp, TrafficRecord, TrafficSet};
