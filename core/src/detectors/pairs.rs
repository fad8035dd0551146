//! Pairs of Values Analyzer
//!
//! Measures how far the occupancy of LSB-insensitive value buckets
//! (`value >> 1`, shared across channels) strays from a flat distribution.

use crate::analyzers::{clamp_confidence, round_to, Analyzer, AnalyzerResult, Metrics};
use crate::pixels::PixelBuffer;
use tracing::debug;

pub const KEY: &str = "pairsOfValues";
pub const METHOD: &str = "Pairs of Values";

pub struct PairsOfValuesAnalyzer;

impl PairsOfValuesAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Returns (buckets used, mean relative deviation from a flat spread)
    fn deviation(&self, pixels: &PixelBuffer<'_>) -> (usize, f64) {
        let mut buckets = [0u64; 128];
        let mut total = 0u64;
        for value in pixels.samples() {
            buckets[(value >> 1) as usize] += 1;
            total += 1;
        }

        let used: Vec<f64> = buckets
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| count as f64)
            .collect();
        if used.is_empty() {
            return (0, 0.0);
        }

        let expected = total as f64 / used.len() as f64;
        let deviation = used
            .iter()
            .map(|count| (count - expected).abs() / expected)
            .sum::<f64>()
            / used.len() as f64;

        (used.len(), deviation)
    }
}

impl Default for PairsOfValuesAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for PairsOfValuesAnalyzer {
    fn key(&self) -> &str {
        KEY
    }

    fn method(&self) -> &str {
        METHOD
    }

    fn description(&self) -> &str {
        "Mean relative deviation of value-pair bucket counts from a flat distribution."
    }

    fn alert_threshold(&self) -> f64 {
        40.0
    }

    fn analyze(&self, pixels: &PixelBuffer<'_>) -> AnalyzerResult {
        let (total_pairs, deviation) = self.deviation(pixels);
        let confidence = clamp_confidence(deviation * 25.0);

        let description = if confidence > self.alert_threshold() {
            "Unusual pair distribution detected"
        } else {
            "Normal pair distribution"
        };

        debug!(total_pairs, deviation, confidence, "pairs of values analysis");
        AnalyzerResult::new(
            METHOD,
            confidence,
            Metrics::Pairs {
                total_pairs,
                deviation: round_to(deviation, 2),
            },
            description,
        )
    }
}
