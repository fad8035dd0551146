//! Pipeline configuration

use crate::aggregate::WeightTable;
use crate::error::{StegError, StegResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Tunables for a steganalysis run.
///
/// Every field has a default, so a partial JSON document such as
/// `{"detectedThreshold": 80}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Per-analyzer weights for the aggregate confidence
    pub weights: WeightTable,

    /// Aggregate confidence at or above which an image is detected (default: 70.0)
    pub detected_threshold: f64,

    /// Aggregate confidence at or above which an image is suspicious (default: 30.0)
    pub suspicious_threshold: f64,

    /// Run analyzers on the rayon pool (default: true)
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            detected_threshold: 70.0,
            suspicious_threshold: 30.0,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_value(value: &Value) -> StegResult<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| StegError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: &Path) -> StegResult<Self> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| StegError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_value(&value)
    }

    pub fn validate(&self) -> StegResult<()> {
        for (name, threshold) in [
            ("detectedThreshold", self.detected_threshold),
            ("suspiciousThreshold", self.suspicious_threshold),
        ] {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(StegError::Config(format!(
                    "{} must be within 0-100, got {}",
                    name, threshold
                )));
            }
        }

        if self.suspicious_threshold > self.detected_threshold {
            return Err(StegError::Config(
                "suspiciousThreshold must not exceed detectedThreshold".to_string(),
            ));
        }

        let weights = self
            .weights
            .weights
            .iter()
            .map(|(k, w)| (k.as_str(), *w))
            .chain(std::iter::once(("defaultWeight", self.weights.default_weight)));
        for (key, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(StegError::Config(format!(
                    "Weight for {} must be a non-negative number, got {}",
                    key, weight
                )));
            }
        }

        Ok(())
    }
}
