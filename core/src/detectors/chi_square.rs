//! Chi-Square Analyzer
//!
//! Classical pairs-of-values test over least significant bits. Values that
//! differ only in the LSB form a pair; naive LSB embedding pushes the even
//! and odd counts of each pair towards each other.

use crate::analyzers::{clamp_confidence, round_to, Analyzer, AnalyzerResult, Metrics};
use crate::pixels::PixelBuffer;
use tracing::debug;

pub const KEY: &str = "chiSquare";
pub const METHOD: &str = "Chi-Square Test";

/// Pairs with this many samples or fewer are too sparse to score
const MIN_PAIR_SAMPLES: u64 = 5;

/// Statistic expected from an unmodified image
const BASELINE: f64 = 0.5;

pub struct ChiSquareAnalyzer;

impl ChiSquareAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Chi-square statistic averaged over the qualifying pairs
    fn statistic(&self, pixels: &PixelBuffer<'_>) -> f64 {
        // [even, odd] counts per pair, indexed by value >> 1
        let mut pairs = [[0u64; 2]; 128];
        for value in pixels.samples() {
            pairs[(value >> 1) as usize][(value & 1) as usize] += 1;
        }

        let mut chi_square = 0.0;
        let mut valid_pairs = 0u32;

        for [even, odd] in pairs {
            let total = even + odd;
            if total <= MIN_PAIR_SAMPLES {
                continue;
            }
            let expected = total as f64 / 2.0;
            chi_square += (even as f64 - expected).powi(2) / expected;
            chi_square += (odd as f64 - expected).powi(2) / expected;
            valid_pairs += 1;
        }

        if valid_pairs > 0 {
            chi_square / valid_pairs as f64
        } else {
            0.0
        }
    }
}

impl Default for ChiSquareAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for ChiSquareAnalyzer {
    fn key(&self) -> &str {
        KEY
    }

    fn method(&self) -> &str {
        METHOD
    }

    fn description(&self) -> &str {
        "Pairs-of-values chi-square statistic over the LSBs of every color sample."
    }

    fn analyze(&self, pixels: &PixelBuffer<'_>) -> AnalyzerResult {
        let chi_square = self.statistic(pixels);
        let confidence = clamp_confidence((chi_square - BASELINE) * 50.0);

        let description = if confidence > self.alert_threshold() {
            "Anomalous LSB distribution detected"
        } else {
            "Normal LSB distribution"
        };

        debug!(chi_square, confidence, "chi-square analysis");
        AnalyzerResult::new(
            METHOD,
            confidence,
            Metrics::ChiSquare {
                score: round_to(chi_square, 2),
            },
            description,
        )
    }
}
