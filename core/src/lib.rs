//! Stegsight Core
//!
//! Heuristic steganalysis for raster images.
//!
//! # Overview
//!
//! Given decoded RGBA pixels, five independent statistical tests estimate
//! how likely it is that data has been hidden in the image:
//! - **Chi-Square**: pairs-of-values statistic over LSBs
//! - **RS Analysis**: regular/singular ratio of 4x4 red-channel groups
//! - **Histogram**: adjacent-bin imbalance in per-channel histograms
//! - **Pattern Recognition**: per-technique scores from LSB run regularity
//! - **Pairs of Values**: deviation of value-pair bucket occupancy
//!
//! A weighted ensemble turns their confidences into a status (`clean`,
//! `suspicious`, `detected`) and, for detected images, a best-guess
//! embedding technique. Scores are heuristics, not proofs.
//!
//! # Example
//!
//! ```rust,ignore
//! use stegsight_core::{PixelBuffer, SteganalysisPipeline};
//!
//! let rgba: Vec<u8> = load_somehow();
//! let pipeline = SteganalysisPipeline::default();
//! let result = pipeline.run(&PixelBuffer::new(&rgba, 640, 480));
//!
//! println!("{} ({:.1}%)", result.status, result.confidence);
//! ```

pub mod aggregate;
pub mod analyzers;
pub mod catalog;
pub mod config;
pub mod detectors;
pub mod error;
pub mod identify;
pub mod pipeline;
pub mod pixels;
pub mod report;
pub mod scan;
pub mod source;

// Re-export main types
pub use aggregate::{ConfidenceAggregator, Status, WeightTable};
pub use analyzers::{
    create_default_registry, Analyzer, AnalyzerRegistry, AnalyzerResult, Details, Metrics,
};
pub use catalog::{Detectability, EmbeddingMethod, Signature, EMBEDDING_METHODS};
pub use config::PipelineConfig;
pub use error::{StegError, StegResult};
pub use identify::MethodIdentifier;
pub use pipeline::{AggregateResult, SteganalysisPipeline};
pub use pixels::PixelBuffer;
pub use report::{BatchSummary, ExportDocument, ImageReport};
pub use scan::BatchScanner;
pub use source::{DecodedImage, ImageFileSource, PixelSource, SourceImage};

use std::path::PathBuf;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a raw RGBA buffer with the default configuration
pub fn analyze_pixels(rgba: &[u8], width: usize, height: usize) -> AggregateResult {
    SteganalysisPipeline::default().run(&PixelBuffer::new(rgba, width, height))
}

/// Collect the images under `paths` and analyze each one
pub fn scan_paths(
    paths: &[PathBuf],
    recursive: bool,
    config: PipelineConfig,
) -> StegResult<Vec<(PathBuf, StegResult<ImageReport>)>> {
    let files = scan::collect_images(paths, recursive)?;
    Ok(BatchScanner::new(config).scan_all(&files))
}
