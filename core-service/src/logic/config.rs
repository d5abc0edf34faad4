//! Pipeline Configuration
//!
//! Immutable per-request settings. The transport layer owns the mutable
//! "current configuration" and hands a snapshot to every pipeline call;
//! updates produce a new value and never touch the old one.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BACKEND_TIMEOUT_MS;
use crate::error::{CoreError, CoreResult};
use crate::logic::scoring::StatisticalThresholds;

// ============================================================================
// LIMITS
// ============================================================================

pub const MIN_QUBITS: u32 = 1;
pub const MAX_QUBITS: u32 = 32;
pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 10;
pub const MIN_SHOTS: u32 = 100;
pub const MAX_SHOTS: u32 = 10_000;

// ============================================================================
// NAMED CHOICES
// ============================================================================

fn unsupported(what: &str, value: &str) -> CoreError {
    CoreError::Configuration(format!("unsupported {} '{}'", what, value))
}

/// Which scorer backs detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Mock,
    Statistical,
    External,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Mock => "mock",
            ScorerKind::Statistical => "statistical",
            ScorerKind::External => "external",
        }
    }
}

impl FromStr for ScorerKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ScorerKind::Mock),
            "statistical" => Ok(ScorerKind::Statistical),
            "external" | "quantum" => Ok(ScorerKind::External),
            _ => Err(unsupported("scorer", s)),
        }
    }
}

/// In-process scorer used when the primary fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    Mock,
    Statistical,
}

impl FallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackKind::Mock => "mock",
            FallbackKind::Statistical => "statistical",
        }
    }
}

impl FromStr for FallbackKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(FallbackKind::Mock),
            "statistical" => Ok(FallbackKind::Statistical),
            _ => Err(unsupported("fallback scorer", s)),
        }
    }
}

/// Classical-data-to-circuit encoding requested from a quantum backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMap {
    Zz,
    Pauli,
    Iqp,
}

impl FromStr for FeatureMap {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zz" => Ok(FeatureMap::Zz),
            "pauli" => Ok(FeatureMap::Pauli),
            "iqp" => Ok(FeatureMap::Iqp),
            _ => Err(unsupported("feature map", s)),
        }
    }
}

/// Variational form requested from a quantum backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ansatz {
    Real,
    Efficient,
}

impl FromStr for Ansatz {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" => Ok(Ansatz::Real),
            "efficient" => Ok(Ansatz::Efficient),
            _ => Err(unsupported("ansatz", s)),
        }
    }
}

// ============================================================================
// SETTINGS GROUPS
// ============================================================================

/// Circuit parameters forwarded verbatim to the external backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumSettings {
    pub num_qubits: u32,
    pub feature_map: FeatureMap,
    pub ansatz: Ansatz,
    pub reps: u32,
    pub shots: u32,
}

impl Default for QuantumSettings {
    fn default() -> Self {
        Self {
            num_qubits: 4,
            feature_map: FeatureMap::Zz,
            ansatz: Ansatz::Real,
            reps: 2,
            shots: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Classifier URL; `None` means no backend is configured
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: DEFAULT_BACKEND_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub scorer: ScorerKind,
    pub fallback: FallbackKind,
    pub thresholds: StatisticalThresholds,
    pub backend: BackendConfig,
    pub quantum: QuantumSettings,
    /// Seed for the mock scorer and generated demo traffic
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerKind::Statistical,
            fallback: FallbackKind::Statistical,
            thresholds: StatisticalThresholds::default(),
            backend: BackendConfig::default(),
            quantum: QuantumSettings::default(),
            seed: None,
        }
    }
}

/// Partial update; names arrive as strings and are parsed strictly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub scorer: Option<String>,
    pub fallback: Option<String>,
    pub backend_url: Option<String>,
    pub backend_timeout_ms: Option<u64>,
    pub num_qubits: Option<u32>,
    pub feature_map: Option<String>,
    pub ansatz: Option<String>,
    pub reps: Option<u32>,
    pub shots: Option<u32>,
    pub seed: Option<u64>,
    pub thresholds: Option<StatisticalThresholds>,
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> CoreResult<u32> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CoreError::Configuration(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )))
    }
}

impl PipelineConfig {
    /// Produce the updated configuration, or an error with `self` untouched
    pub fn apply(&self, update: &ConfigUpdate) -> CoreResult<PipelineConfig> {
        let mut next = self.clone();

        if let Some(scorer) = &update.scorer {
            next.scorer = scorer.parse()?;
        }
        if let Some(fallback) = &update.fallback {
            next.fallback = fallback.parse()?;
        }
        if let Some(url) = &update.backend_url {
            let url = url.trim();
            next.backend.endpoint = if url.is_empty() {
                None
            } else if url.starts_with("http://") || url.starts_with("https://") {
                Some(url.to_string())
            } else {
                return Err(CoreError::Configuration(format!(
                    "backend url must be http(s), got '{}'",
                    url
                )));
            };
        }
        if let Some(timeout) = update.backend_timeout_ms {
            if timeout == 0 {
                return Err(CoreError::Configuration(
                    "backend timeout must be positive".to_string(),
                ));
            }
            next.backend.timeout_ms = timeout;
        }
        if let Some(qubits) = update.num_qubits {
            next.quantum.num_qubits = check_range("num_qubits", qubits, MIN_QUBITS, MAX_QUBITS)?;
        }
        if let Some(map) = &update.feature_map {
            next.quantum.feature_map = map.parse()?;
        }
        if let Some(ansatz) = &update.ansatz {
            next.quantum.ansatz = ansatz.parse()?;
        }
        if let Some(reps) = update.reps {
            next.quantum.reps = check_range("reps", reps, MIN_REPS, MAX_REPS)?;
        }
        if let Some(shots) = update.shots {
            next.quantum.shots = check_range("shots", shots, MIN_SHOTS, MAX_SHOTS)?;
        }
        if let Some(seed) = update.seed {
            next.seed = Some(seed);
        }
        if let Some(thresholds) = &update.thresholds {
            thresholds.validate()?;
            next.thresholds = thresholds.clone();
        }

        Ok(next)
    }

    pub fn backend_configured(&self) -> bool {
        self.backend.endpoint.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.scorer, ScorerKind::Statistical);
        assert_eq!(config.quantum.num_qubits, 4);
        assert_eq!(config.quantum.shots, 1024);
        assert_eq!(config.backend.timeout_ms, 5000);
        assert!(!config.backend_configured());
    }

    #[test]
    fn test_apply_update() {
        let update = ConfigUpdate {
            scorer: Some("MOCK".to_string()),
            feature_map: Some("pauli".to_string()),
            num_qubits: Some(8),
            backend_url: Some("http://localhost:8000/score".to_string()),
            ..Default::default()
        };

        let next = PipelineConfig::default().apply(&update).unwrap();
        assert_eq!(next.scorer, ScorerKind::Mock);
        assert_eq!(next.quantum.feature_map, FeatureMap::Pauli);
        assert_eq!(next.quantum.num_qubits, 8);
        assert!(next.backend_configured());
    }

    #[test]
    fn test_apply_rejects_unknown_names() {
        let config = PipelineConfig::default();
        let update = ConfigUpdate {
            num_qubits: Some(6),
            feature_map: Some("heisenberg".to_string()),
            ..Default::default()
        };

        let err = config.apply(&update).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
        assert_eq!(config.quantum.num_qubits, 4);
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let config = PipelineConfig::default();
        for update in [
            ConfigUpdate { num_qubits: Some(0), ..Default::default() },
            ConfigUpdate { num_qubits: Some(33), ..Default::default() },
            ConfigUpdate { shots: Some(10), ..Default::default() },
            ConfigUpdate { backend_timeout_ms: Some(0), ..Default::default() },
            ConfigUpdate { backend_url: Some("ftp://x".to_string()), ..Default::default() },
        ] {
            assert!(config.apply(&update).is_err(), "{:?}", update);
        }
    }

    #[test]
    fn test_empty_backend_url_clears_endpoint() {
        let config = PipelineConfig::default()
            .apply(&ConfigUpdate {
                backend_url: Some("https://qml.local".to_string()),
                ..Default::default()
            })
            .unwrap();
        let cleared = config
            .apply(&ConfigUpdate {
                backend_url: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert!(!cleared.backend_configured());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"scorer": "mock"}"#).unwrap();
        assert_eq!(config.scorer, ScorerKind::Mock);
        assert_eq!(config.fallback, FallbackKind::Statistical);
    }
}
