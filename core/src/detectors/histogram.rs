//! Histogram Analyzer
//!
//! Counts adjacent-bin imbalances in the per-channel histograms. A pair of
//! bins `(2k, 2k+1)` is anomalous when it is dense enough to be meaningful
//! and its counts swing by more than half their average.

use crate::analyzers::{clamp_confidence, Analyzer, AnalyzerResult, Metrics};
use crate::pixels::PixelBuffer;
use tracing::debug;

pub const KEY: &str = "histogram";
pub const METHOD: &str = "Histogram Analysis";

/// Bin pairs examined per channel (0/1 through 252/253)
const PAIRS_PER_CHANNEL: u32 = 127;
const MAX_ANOMALIES: u32 = PAIRS_PER_CHANNEL * 3;

/// Minimum average bin count for a pair to be considered
const MIN_PAIR_DENSITY: f64 = 5.0;

/// Relative imbalance above which a pair is anomalous
const IMBALANCE_THRESHOLD: f64 = 0.5;

pub struct HistogramAnalyzer;

impl HistogramAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// R, G and B histograms
    fn histograms(&self, pixels: &PixelBuffer<'_>) -> [[u64; 256]; 3] {
        let mut hists = [[0u64; 256]; 3];
        for rgb in pixels.rgb() {
            for (hist, value) in hists.iter_mut().zip(rgb) {
                hist[value as usize] += 1;
            }
        }
        hists
    }

    fn count_anomalies(&self, hists: &[[u64; 256]; 3]) -> u32 {
        let mut anomalies = 0;
        for hist in hists {
            for i in (0..2 * PAIRS_PER_CHANNEL as usize).step_by(2) {
                let (a, b) = (hist[i] as f64, hist[i + 1] as f64);
                let avg = (a + b) / 2.0;
                if avg > MIN_PAIR_DENSITY && (a - b).abs() / avg > IMBALANCE_THRESHOLD {
                    anomalies += 1;
                }
            }
        }
        anomalies
    }
}

impl Default for HistogramAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for HistogramAnalyzer {
    fn key(&self) -> &str {
        KEY
    }

    fn method(&self) -> &str {
        METHOD
    }

    fn description(&self) -> &str {
        "Adjacent-bin imbalance count across the red, green and blue histograms."
    }

    fn alert_threshold(&self) -> f64 {
        40.0
    }

    fn analyze(&self, pixels: &PixelBuffer<'_>) -> AnalyzerResult {
        let anomalies = self.count_anomalies(&self.histograms(pixels));
        let confidence = clamp_confidence(anomalies as f64 / MAX_ANOMALIES as f64 * 200.0);

        let description = if confidence > self.alert_threshold() {
            "Histogram anomalies detected"
        } else {
            "Normal histogram distribution"
        };

        debug!(anomalies, confidence, "histogram analysis");
        AnalyzerResult::new(METHOD, confidence, Metrics::Histogram { anomalies }, description)
    }
}
