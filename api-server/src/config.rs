//! Configuration module

use std::env;

use quantumeyes_core::{ConfigUpdate, PipelineConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Initial pipeline configuration
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            pipeline: pipeline_from_env(),
        }
    }
}

/// Parse a numeric variable, warning on garbage
fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a number", name, raw);
            None
        }
    }
}

/// Each variable is applied on its own, so one bad value only resets itself
fn pipeline_from_env() -> PipelineConfig {
    let updates = [
        (
            "QUANTUMEYES_SCORER",
            ConfigUpdate {
                scorer: env::var("QUANTUMEYES_SCORER").ok(),
                ..Default::default()
            },
        ),
        (
            "QUANTUMEYES_FALLBACK",
            ConfigUpdate {
                fallback: env::var("QUANTUMEYES_FALLBACK").ok(),
                ..Default::default()
            },
        ),
        (
            "QUANTUMEYES_BACKEND_URL",
            ConfigUpdate {
                backend_url: env::var("QUANTUMEYES_BACKEND_URL").ok(),
                ..Default::default()
            },
        ),
        (
            "QUANTUMEYES_BACKEND_TIMEOUT_MS",
            ConfigUpdate {
                backend_timeout_ms: env_number("QUANTUMEYES_BACKEND_TIMEOUT_MS"),
                ..Default::default()
            },
        ),
        (
            "QUANTUMEYES_SEED",
            ConfigUpdate {
                seed: env_number("QUANTUMEYES_SEED"),
                ..Default::default()
            },
        ),
    ];

    updates
        .into_iter()
        .fold(PipelineConfig::default(), |config, (name, update)| {
            match config.apply(&update) {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", name, e);
                    config
                }
            }
        })
}
