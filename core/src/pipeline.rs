//! Steganalysis pipeline
//!
//! Runs every registered analyzer over one pixel buffer, aggregates their
//! confidences and, for detected images, names the likely technique.

use crate::aggregate::{ConfidenceAggregator, Status};
use crate::analyzers::{create_default_registry, AnalyzerRegistry, AnalyzerResult, Details};
use crate::config::PipelineConfig;
use crate::identify::MethodIdentifier;
use crate::pixels::PixelBuffer;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Combined verdict for one image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub status: Status,

    /// Weighted confidence (0.0 - 100.0)
    pub confidence: f64,

    /// Best-guess technique, only set when `status` is detected
    pub detected_method: Option<String>,

    /// Individual analyzer results keyed by analyzer key
    pub details: Details,
}

pub struct SteganalysisPipeline {
    registry: AnalyzerRegistry,
    aggregator: ConfidenceAggregator,
    identifier: MethodIdentifier,
    parallel: bool,
}

impl SteganalysisPipeline {
    /// Pipeline over the built-in analyzers
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_registry(create_default_registry(), config)
    }

    pub fn with_registry(registry: AnalyzerRegistry, config: PipelineConfig) -> Self {
        Self {
            registry,
            aggregator: ConfidenceAggregator::new(
                config.weights,
                config.detected_threshold,
                config.suspicious_threshold,
            ),
            identifier: MethodIdentifier::new(),
            parallel: config.parallel,
        }
    }

    pub fn registry(&self) -> &AnalyzerRegistry {
        &self.registry
    }

    /// Aggregator carrying the configured weights and thresholds
    pub fn aggregator(&self) -> &ConfidenceAggregator {
        &self.aggregator
    }

    /// Analyze one image. Identical pixels always give an identical result.
    pub fn run(&self, pixels: &PixelBuffer<'_>) -> AggregateResult {
        let analyzers = self.registry.analyzers();

        // Collecting keeps registration order, so both paths agree
        let results: Vec<(String, AnalyzerResult)> = if self.parallel {
            analyzers
                .par_iter()
                .map(|a| (a.key().to_string(), a.analyze(pixels)))
                .collect()
        } else {
            analyzers
                .iter()
                .map(|a| (a.key().to_string(), a.analyze(pixels)))
                .collect()
        };

        let (status, confidence) = self
            .aggregator
            .aggregate(results.iter().map(|(key, result)| (key.as_str(), result)));

        let details: Details = results.into_iter().collect();
        let detected_method =
            (status == Status::Detected).then(|| self.identifier.identify(&details));

        debug!(
            width = pixels.width(),
            height = pixels.height(),
            %status,
            confidence,
            method = detected_method.as_deref().unwrap_or("-"),
            "steganalysis complete"
        );

        AggregateResult {
            status,
            confidence,
            detected_method,
            details,
        }
    }
}

impl Default for SteganalysisPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::WeightTable;
    use crate::analyzers::{Analyzer, Metrics};
    use crate::detectors::testing::{force_lsb, noise};
    use crate::detectors::{chi_square, histogram, pairs, pattern, rs};

    struct Constant(f64);

    impl Analyzer for Constant {
        fn key(&self) -> &str {
            "constant"
        }

        fn method(&self) -> &str {
            "Constant"
        }

        fn description(&self) -> &str {
            "Reports a fixed confidence"
        }

        fn analyze(&self, _pixels: &PixelBuffer<'_>) -> AnalyzerResult {
            AnalyzerResult::new("Constant", self.0, Metrics::Histogram { anomalies: 0 }, "")
        }
    }

    #[test]
    fn test_config_weights_reach_aggregator() {
        let config = PipelineConfig {
            weights: WeightTable::new(0.5).with(chi_square::KEY, 2.0),
            ..PipelineConfig::default()
        };
        let pipeline = SteganalysisPipeline::new(config);
        let weights = pipeline.aggregator().weights();

        assert_eq!(weights.weight(chi_square::KEY), 2.0);
        assert_eq!(weights.weight(rs::KEY), 0.5);
    }

    #[test]
    fn test_details_hold_every_analyzer() {
        let data = noise(32, 32, 1);
        let result = SteganalysisPipeline::default().run(&PixelBuffer::new(&data, 32, 32));

        let keys: Vec<&str> = result.details.keys().map(|k| k.as_str()).collect();
        for key in [chi_square::KEY, rs::KEY, histogram::KEY, pattern::KEY, pairs::KEY] {
            assert!(keys.contains(&key), "missing {}", key);
        }
        for detail in result.details.values() {
            assert!((0.0..=100.0).contains(&detail.confidence));
        }
    }

    #[test]
    fn test_deterministic() {
        let data = noise(48, 48, 2);
        let pixels = PixelBuffer::new(&data, 48, 48);
        let pipeline = SteganalysisPipeline::default();

        let first = serde_json::to_vec(&pipeline.run(&pixels)).unwrap();
        let second = serde_json::to_vec(&pipeline.run(&pixels)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut data = noise(40, 40, 3);
        force_lsb(&mut data, 0);
        let pixels = PixelBuffer::new(&data, 40, 40);

        let parallel = SteganalysisPipeline::default().run(&pixels);
        let sequential = SteganalysisPipeline::new(PipelineConfig {
            parallel: false,
            ..PipelineConfig::default()
        })
        .run(&pixels);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_empty_buffer_is_clean() {
        let result = SteganalysisPipeline::default().run(&PixelBuffer::new(&[], 0, 0));

        // Only RS contributes: its neutral 15 weighted by 0.25
        assert_eq!(result.status, Status::Clean);
        assert!((result.confidence - 3.75).abs() < 1e-9);
        assert_eq!(result.detected_method, None);
    }

    #[test]
    fn test_method_only_when_detected() {
        let mut registry = AnalyzerRegistry::new();
        registry.register(Constant(90.0));
        let config = PipelineConfig {
            weights: WeightTable::new(1.0),
            ..PipelineConfig::default()
        };

        let result = SteganalysisPipeline::with_registry(registry, config)
            .run(&PixelBuffer::new(&[], 0, 0));

        assert_eq!(result.status, Status::Detected);
        assert_eq!(result.confidence, 90.0);
        assert_eq!(result.detected_method.as_deref(), Some("UNKNOWN METHOD"));
    }

    #[test]
    fn test_blocky_even_image_identifies_replacement() {
        // Every 4x4 block is flat with its own even value: singular RS
        // groups, saturated chi-square pairs, lopsided histogram bins and
        // constant red LSB runs
        let mut data = Vec::with_capacity(32 * 32 * 4);
        for y in 0..32 {
            for x in 0..32 {
                let v = (2 * (x / 4 + 8 * (y / 4))) as u8;
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let result = SteganalysisPipeline::default().run(&PixelBuffer::new(&data, 32, 32));

        assert_eq!(result.details[chi_square::KEY].confidence, 100.0);
        assert_eq!(result.details[rs::KEY].confidence, 90.0);
        assert_eq!(result.details[histogram::KEY].confidence, 100.0);
        assert_eq!(result.details[pattern::KEY].confidence, 70.0);
        assert_eq!(result.details[pairs::KEY].confidence, 0.0);
        assert!((result.confidence - 83.0).abs() < 1e-9);
        assert_eq!(result.status, Status::Detected);
        assert_eq!(result.detected_method.as_deref(), Some("LSB REPLACEMENT"));
    }

    #[test]
    fn test_serialized_field_names() {
        let result = SteganalysisPipeline::default().run(&PixelBuffer::new(&[], 0, 0));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "clean");
        assert!(value["detectedMethod"].is_null());
        assert_eq!(value["details"]["rsAnalysis"]["ratio"], 0.5);
        assert_eq!(value["details"]["patternRecognition"]["detectedPattern"], "dct_based");
    }
}
