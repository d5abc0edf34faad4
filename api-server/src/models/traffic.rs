//! Traffic request bodies
//!
//! Accepted shapes: a bare array of records, or `{ "connections": [...] }`.
//! An empty or `null` body (or an object without `connections`) asks for
//! generated traffic.

use serde::Deserialize;

use quantumeyes_core::constants::DEFAULT_DEMO_ANOMALY_RATIO;
use quantumeyes_core::{CoreResult, GeneratorConfig, TrafficGenerator, TrafficSet};

use crate::{AppError, AppResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum TrafficBody {
    Bare(TrafficSet),
    Wrapped {
        #[serde(default)]
        connections: Option<TrafficSet>,
    },
}

/// Traffic supplied by the caller, or a request to generate some
#[derive(Debug, Clone, PartialEq)]
pub enum TrafficInput {
    Provided(TrafficSet),
    Generate,
}

impl TrafficInput {
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(TrafficInput::Generate);
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AppError::ValidationError(format!("invalid JSON body: {}", e)))?;
        if value.is_null() {
            return Ok(TrafficInput::Generate);
        }
        let parsed: TrafficBody = serde_json::from_value(value).map_err(|_| {
            AppError::ValidationError(
                "expected an array of connection records or {\"connections\": [...]}".to_string(),
            )
        })?;

        Ok(match parsed {
            TrafficBody::Bare(set) => TrafficInput::Provided(set),
            TrafficBody::Wrapped { connections: Some(set) } => TrafficInput::Provided(set),
            TrafficBody::Wrapped { connections: None } => TrafficInput::Generate,
        })
    }

    /// Materialize; generated traffic has `default_size` records
    pub fn resolve(self, default_size: usize, seed: Option<u64>) -> CoreResult<TrafficSet> {
        match self {
            TrafficInput::Provided(set) => Ok(set),
            TrafficInput::Generate => {
                let mut generator = TrafficGenerator::from_seed(GeneratorConfig::default(), seed)?;
                Ok(generator.sample(default_size, DEFAULT_DEMO_ANOMALY_RATIO))
            }
        }
    }
}
