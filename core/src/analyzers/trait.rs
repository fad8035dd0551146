//! Analyzer trait - the core interface for all steganalysis techniques
//!
//! Every analyzer is a pure function of a pixel buffer: same pixels in,
//! same result out, no shared state. Results carry a bounded confidence plus
//! the metrics specific to the technique.

use crate::catalog::Signature;
use crate::pixels::PixelBuffer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Analyzer results keyed by analyzer key
pub type Details = BTreeMap<String, AnalyzerResult>;

/// Outcome of one analyzer over one image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerResult {
    /// Human-readable technique name (e.g., "Chi-Square Test")
    pub method: String,

    /// Heuristic confidence (0.0 - 100.0), one decimal
    pub confidence: f64,

    /// Technique-specific measurements
    #[serde(flatten)]
    pub metrics: Metrics,

    /// Qualitative classification
    pub description: String,
}

impl AnalyzerResult {
    /// Build a result, clamping and rounding the confidence
    pub fn new(
        method: impl Into<String>,
        confidence: f64,
        metrics: Metrics,
        description: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            confidence: round_to(clamp_confidence(confidence), 1),
            metrics,
            description: description.into(),
        }
    }

    /// Pattern detected by the pattern recognizer, if this is its result
    pub fn detected_pattern(&self) -> Option<Signature> {
        match &self.metrics {
            Metrics::Pattern {
                detected_pattern, ..
            } => Some(*detected_pattern),
            _ => None,
        }
    }
}

/// Measurements reported alongside the confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Metrics {
    ChiSquare {
        score: f64,
    },
    Rs {
        regular_groups: u64,
        singular_groups: u64,
        ratio: f64,
    },
    Histogram {
        anomalies: u32,
    },
    Pattern {
        patterns: BTreeMap<Signature, f64>,
        detected_pattern: Signature,
    },
    Pairs {
        total_pairs: usize,
        deviation: f64,
    },
}

/// The core Analyzer trait - implement this for each technique
pub trait Analyzer: Send + Sync {
    /// Stable key used in result details and weight tables
    fn key(&self) -> &str;

    /// Human-readable technique name
    fn method(&self) -> &str;

    /// Short explanation of what the analyzer measures
    fn description(&self) -> &str;

    /// Run the technique over the buffer
    fn analyze(&self, pixels: &PixelBuffer<'_>) -> AnalyzerResult;

    /// Confidence above which the result describes an anomaly.
    /// Compared against the clamped confidence before rounding.
    fn alert_threshold(&self) -> f64 {
        50.0
    }
}

pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_clamps_and_rounds() {
        let result = AnalyzerResult::new("X", 123.456, Metrics::Histogram { anomalies: 3 }, "d");
        assert_eq!(result.confidence, 100.0);

        let result = AnalyzerResult::new("X", -4.0, Metrics::Histogram { anomalies: 0 }, "d");
        assert_eq!(result.confidence, 0.0);

        let result = AnalyzerResult::new("X", 14.999999, Metrics::Histogram { anomalies: 0 }, "d");
        assert_eq!(result.confidence, 15.0);

        let result = AnalyzerResult::new("X", f64::NAN, Metrics::Histogram { anomalies: 0 }, "d");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_metrics_flatten_into_result() {
        let result = AnalyzerResult::new(
            "RS Analysis",
            15.0,
            Metrics::Rs {
                regular_groups: 2,
                singular_groups: 3,
                ratio: 0.4,
            },
            "Normal RS ratio",
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "method": "RS Analysis",
                "confidence": 15.0,
                "regularGroups": 2,
                "singularGroups": 3,
                "ratio": 0.4,
                "description": "Normal RS ratio"
            })
        );
    }

    #[test]
    fn test_detected_pattern_only_for_pattern_metrics() {
        let mut patterns = BTreeMap::new();
        patterns.insert(Signature::F5, 45.0);
        let pattern = AnalyzerResult::new(
            "Pattern Recognition",
            45.0,
            Metrics::Pattern {
                patterns,
                detected_pattern: Signature::F5,
            },
            "f5 pattern detected",
        );
        assert_eq!(pattern.detected_pattern(), Some(Signature::F5));

        let chi = AnalyzerResult::new("Chi-Square Test", 0.0, Metrics::ChiSquare { score: 0.0 }, "");
        assert_eq!(chi.detected_pattern(), None);
    }
}
