//! RS Analyzer
//!
//! Simplified Regular/Singular group analysis. The red channel is split
//! into non-overlapping 4x4 groups and each group is classified by its
//! local variance: smooth groups are singular, noisy groups are regular.

use crate::analyzers::{clamp_confidence, round_to, Analyzer, AnalyzerResult, Metrics};
use crate::pixels::PixelBuffer;
use tracing::debug;

pub const KEY: &str = "rsAnalysis";
pub const METHOD: &str = "RS Analysis";

const GROUP_SIZE: usize = 4;

/// Groups with fewer samples than this are not classified
const MIN_GROUP_SAMPLES: usize = 4;

/// Variance below which a group counts as singular
const SINGULAR_VARIANCE: f64 = 50.0;

/// Regular-group ratio modeled for unmodified images
const EXPECTED_RATIO: f64 = 0.6;

/// Ratio reported when no group could be classified
const NEUTRAL_RATIO: f64 = 0.5;

pub struct RsAnalyzer;

impl RsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Count (regular, singular) groups over the red channel
    fn classify_groups(&self, pixels: &PixelBuffer<'_>) -> (u64, u64) {
        let mut regular = 0;
        let mut singular = 0;
        let mut group = Vec::with_capacity(GROUP_SIZE * GROUP_SIZE);

        // Groups that would run past the right or bottom edge are skipped
        let rows = pixels.height().saturating_sub(GROUP_SIZE - 1);
        let cols = pixels.width().saturating_sub(GROUP_SIZE - 1);

        for y in (0..rows).step_by(GROUP_SIZE) {
            for x in (0..cols).step_by(GROUP_SIZE) {
                group.clear();
                for dy in 0..GROUP_SIZE {
                    for dx in 0..GROUP_SIZE {
                        if let Some(red) = pixels.red_at(x + dx, y + dy) {
                            group.push(red);
                        }
                    }
                }

                if group.len() >= MIN_GROUP_SAMPLES {
                    if variance(&group) < SINGULAR_VARIANCE {
                        singular += 1;
                    } else {
                        regular += 1;
                    }
                }
            }
        }

        (regular, singular)
    }
}

/// Population variance
fn variance(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n
}

impl Default for RsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for RsAnalyzer {
    fn key(&self) -> &str {
        KEY
    }

    fn method(&self) -> &str {
        METHOD
    }

    fn description(&self) -> &str {
        "Regular/singular ratio of 4x4 red-channel groups classified by local variance."
    }

    fn analyze(&self, pixels: &PixelBuffer<'_>) -> AnalyzerResult {
        let (regular_groups, singular_groups) = self.classify_groups(pixels);
        let total = regular_groups + singular_groups;
        let ratio = if total > 0 {
            regular_groups as f64 / total as f64
        } else {
            NEUTRAL_RATIO
        };

        let confidence = clamp_confidence((ratio - EXPECTED_RATIO).abs() * 150.0);
        let description = if confidence > self.alert_threshold() {
            "Suspicious RS ratio detected"
        } else {
            "Normal RS ratio"
        };

        debug!(regular_groups, singular_groups, ratio, confidence, "rs analysis");
        AnalyzerResult::new(
            METHOD,
            confidence,
            Metrics::Rs {
                regular_groups,
                singular_groups,
                ratio: round_to(ratio, 3),
            },
            description,
        )
    }
}
