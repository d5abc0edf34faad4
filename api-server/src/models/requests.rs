//! Request DTOs

use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use quantumeyes_core::logic::scoring::StatisticalThresholds;
use quantumeyes_core::ConfigUpdate;

use crate::{AppError, AppResult};

/// Parse a JSON body into `T`, reporting syntax errors as 400
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("invalid JSON body: {}", e)))
}

/// POST /api/v1/configure
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ConfigureRequest {
    pub scorer: Option<String>,
    pub fallback: Option<String>,
    pub backend_url: Option<String>,
    #[validate(range(min = 1, max = 600000))]
    pub backend_timeout_ms: Option<u64>,
    #[serde(alias = "qubits")]
    #[validate(range(min = 1, max = 32))]
    pub num_qubits: Option<u32>,
    pub feature_map: Option<String>,
    pub ansatz: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub reps: Option<u32>,
    #[validate(range(min = 100, max = 10000))]
    pub shots: Option<u32>,
    pub seed: Option<u64>,
    pub thresholds: Option<StatisticalThresholds>,
}

impl From<ConfigureRequest> for ConfigUpdate {
    fn from(req: ConfigureRequest) -> Self {
        ConfigUpdate {
            scorer: req.scorer,
            fallback: req.fallback,
            backend_url: req.backend_url,
            backend_timeout_ms: req.backend_timeout_ms,
            num_qubits: req.num_qubits,
            feature_map: req.feature_map,
            ansatz: req.ansatz,
            reps: req.reps,
            shots: req.shots,
            seed: req.seed,
            thresholds: req.thresholds,
        }
    }
}

/// GET /api/v1/demo-data
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DemoDataQuery {
    #[validate(range(min = 1, max = 10000))]
    pub count: Option<usize>,
    pub seed: Option<u64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub anomaly_ratio: Option<f64>,
}
