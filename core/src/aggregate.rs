//! Confidence aggregation
//!
//! Combines per-analyzer confidences into one weighted score and a status.
//! Weights are fixed design constants, not a calibrated model.

use crate::analyzers::AnalyzerResult;
use crate::detectors::{chi_square, histogram, pairs, pattern, rs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Weight applied to analyzers missing from the table
pub const DEFAULT_WEIGHT: f64 = 0.1;

/// Overall verdict for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Clean,
    Suspicious,
    Detected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Clean => "clean",
            Status::Suspicious => "suspicious",
            Status::Detected => "detected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-analyzer weights keyed by analyzer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightTable {
    pub weights: BTreeMap<String, f64>,
    pub default_weight: f64,
}

impl WeightTable {
    /// Empty table where every analyzer gets `default_weight`
    pub fn new(default_weight: f64) -> Self {
        Self {
            weights: BTreeMap::new(),
            default_weight,
        }
    }

    pub fn with(mut self, key: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(key.into(), weight);
        self
    }

    pub fn weight(&self, key: &str) -> f64 {
        self.weights.get(key).copied().unwrap_or(self.default_weight)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT)
            .with(chi_square::KEY, 0.30)
            .with(rs::KEY, 0.25)
            .with(histogram::KEY, 0.20)
            .with(pattern::KEY, 0.15)
            .with(pairs::KEY, 0.10)
    }
}

/// Weighted-vote ensemble over analyzer results
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceAggregator {
    weights: WeightTable,
    detected_threshold: f64,
    suspicious_threshold: f64,
}

impl ConfidenceAggregator {
    pub fn new(weights: WeightTable, detected_threshold: f64, suspicious_threshold: f64) -> Self {
        Self {
            weights,
            detected_threshold,
            suspicious_threshold,
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Weighted mean of the confidences; 0 when the total weight is 0
    pub fn combine<'a, I>(&self, results: I) -> f64
    where
        I: IntoIterator<Item = (&'a str, &'a AnalyzerResult)>,
    {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (key, result) in results {
            let weight = self.weights.weight(key);
            weighted_sum += result.confidence * weight;
            total_weight += weight;
        }

        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }

    pub fn status(&self, confidence: f64) -> Status {
        if confidence >= self.detected_threshold {
            Status::Detected
        } else if confidence >= self.suspicious_threshold {
            Status::Suspicious
        } else {
            Status::Clean
        }
    }

    pub fn aggregate<'a, I>(&self, results: I) -> (Status, f64)
    where
        I: IntoIterator<Item = (&'a str, &'a AnalyzerResult)>,
    {
        let confidence = self.combine(results);
        (self.status(confidence), confidence)
    }
}

impl Default for ConfidenceAggregator {
    fn default() -> Self {
        Self::new(WeightTable::default(), 70.0, 30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::Metrics;

    const KEYS: [&str; 5] = [
        chi_square::KEY,
        rs::KEY,
        histogram::KEY,
        pattern::KEY,
        pairs::KEY,
    ];

    fn results(confidences: [f64; 5]) -> Vec<(&'static str, AnalyzerResult)> {
        KEYS.iter()
            .zip(confidences)
            .map(|(&key, c)| {
                (
                    key,
                    AnalyzerResult::new(key, c, Metrics::Histogram { anomalies: 0 }, ""),
                )
            })
            .collect()
    }

    fn aggregate(aggregator: &ConfidenceAggregator, confidences: [f64; 5]) -> (Status, f64) {
        let results = results(confidences);
        aggregator.aggregate(results.iter().map(|(k, r)| (*k, r)))
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let total: f64 = WeightTable::default().weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_max_is_detected() {
        let (status, confidence) = aggregate(&ConfidenceAggregator::default(), [100.0; 5]);
        assert_eq!(status, Status::Detected);
        assert!((confidence - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_is_clean() {
        let (status, confidence) = aggregate(&ConfidenceAggregator::default(), [0.0; 5]);
        assert_eq!(status, Status::Clean);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_weighted_mean() {
        // Only chi-square fires: 100 * 0.30
        let (status, confidence) =
            aggregate(&ConfidenceAggregator::default(), [100.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((confidence - 30.0).abs() < 1e-9);
        assert_eq!(status, Status::Suspicious);
    }

    #[test]
    fn test_unknown_key_uses_default_weight() {
        let aggregator = ConfidenceAggregator::default();
        let extra = AnalyzerResult::new("Extra", 100.0, Metrics::Histogram { anomalies: 0 }, "");
        let mut results = results([0.0; 5]);
        results.push(("extra", extra));

        let confidence = aggregator.combine(results.iter().map(|(k, r)| (*k, r)));
        assert!((confidence - 100.0 * 0.1 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_substituted_weights() {
        let weights = WeightTable::new(0.0).with(rs::KEY, 1.0);
        let aggregator = ConfidenceAggregator::new(weights, 70.0, 30.0);

        let (status, confidence) = aggregate(&aggregator, [0.0, 80.0, 0.0, 0.0, 0.0]);
        assert_eq!(confidence, 80.0);
        assert_eq!(status, Status::Detected);
    }

    #[test]
    fn test_zero_total_weight() {
        let aggregator = ConfidenceAggregator::new(WeightTable::new(0.0), 70.0, 30.0);
        assert_eq!(aggregate(&aggregator, [100.0; 5]), (Status::Clean, 0.0));
    }

    #[test]
    fn test_status_thresholds() {
        let aggregator = ConfidenceAggregator::default();
        assert_eq!(aggregator.status(70.0), Status::Detected);
        assert_eq!(aggregator.status(69.9), Status::Suspicious);
        assert_eq!(aggregator.status(30.0), Status::Suspicious);
        assert_eq!(aggregator.status(29.9), Status::Clean);
    }
}
