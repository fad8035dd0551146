//! Pattern Recognizer
//!
//! Scores known embedding techniques from the regularity of red-channel
//! LSB runs and from red/green LSB parity pairing. The rules are fixed
//! heuristics and several techniques may score at once.

use crate::analyzers::{clamp_confidence, Analyzer, AnalyzerResult, Metrics};
use crate::catalog::Signature;
use crate::pixels::{PixelBuffer, CHANNELS};
use std::collections::BTreeMap;
use tracing::debug;

pub const KEY: &str = "patternRecognition";
pub const METHOD: &str = "Pattern Recognition";

/// Share of red/green parity mismatches expected by chance
const PARITY_BASELINE: f64 = 0.25;

/// LSB transition counts over the red channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LsbStats {
    sequential: u64,
    random: u64,
    even_odd_pairs: u64,
}

impl LsbStats {
    fn total(&self) -> u64 {
        self.sequential + self.random
    }
}

pub struct PatternRecognizer;

impl PatternRecognizer {
    pub fn new() -> Self {
        Self
    }

    fn lsb_stats(&self, pixels: &PixelBuffer<'_>) -> LsbStats {
        let data = pixels.data();
        let mut stats = LsbStats::default();

        // The final two pixels never start a comparison
        let end = data.len().saturating_sub(2 * CHANNELS);
        for i in (0..end).step_by(CHANNELS) {
            let red = data[i] & 1;

            if red == data[i + CHANNELS] & 1 {
                stats.sequential += 1;
            } else {
                stats.random += 1;
            }

            if red != data[i + 1] & 1 {
                stats.even_odd_pairs += 1;
            }
        }

        stats
    }

    fn score(&self, stats: &LsbStats) -> BTreeMap<Signature, f64> {
        let mut patterns: BTreeMap<Signature, f64> =
            Signature::ALL.iter().map(|&s| (s, 0.0)).collect();

        let total = stats.total();
        if total == 0 {
            return patterns;
        }

        let sequential_ratio = stats.sequential as f64 / total as f64;

        if sequential_ratio > 0.8 {
            patterns.insert(Signature::LsbReplacement, 70.0);
        } else if sequential_ratio < 0.2 {
            patterns.insert(Signature::LsbMatching, 50.0);
        }

        if stats.even_odd_pairs as f64 / (total as f64 * PARITY_BASELINE) > 1.5 {
            patterns.insert(Signature::F5, 45.0);
        }

        if sequential_ratio > 0.3 && sequential_ratio < 0.7 {
            patterns.insert(Signature::Steghide, 30.0);
            patterns.insert(Signature::Hugo, 25.0);
            patterns.insert(Signature::DctBased, 35.0);
        }

        patterns
    }
}

/// Highest-scoring signature; among equal scores the last in catalog order wins
fn strongest(patterns: &BTreeMap<Signature, f64>) -> (Signature, f64) {
    patterns
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(&signature, &score)| (signature, score))
        .unwrap_or((Signature::DctBased, 0.0))
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for PatternRecognizer {
    fn key(&self) -> &str {
        KEY
    }

    fn method(&self) -> &str {
        METHOD
    }

    fn description(&self) -> &str {
        "Per-technique scores from red LSB run regularity and red/green parity pairing."
    }

    fn alert_threshold(&self) -> f64 {
        30.0
    }

    fn analyze(&self, pixels: &PixelBuffer<'_>) -> AnalyzerResult {
        let stats = self.lsb_stats(pixels);
        let patterns = self.score(&stats);
        let (detected_pattern, score) = strongest(&patterns);

        let confidence = clamp_confidence(score);
        let description = if confidence > self.alert_threshold() {
            format!("{} pattern detected", detected_pattern.label())
        } else {
            "No specific pattern detected".to_string()
        };

        debug!(
            sequential = stats.sequential,
            random = stats.random,
            even_odd_pairs = stats.even_odd_pairs,
            pattern = %detected_pattern,
            confidence,
            "pattern recognition"
        );
        AnalyzerResult::new(
            METHOD,
            confidence,
            Metrics::Pattern {
                patterns,
                detected_pattern,
            },
            description,
        )
    }
}
