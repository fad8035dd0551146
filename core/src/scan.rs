//! Batch scanning
//!
//! Expands files and directories into image paths and analyzes each one
//! independently. A file that cannot be read or decoded is reported and
//! skipped; it never stops the rest of the batch.

use crate::config::PipelineConfig;
use crate::error::{StegError, StegResult};
use crate::pipeline::SteganalysisPipeline;
use crate::report::ImageReport;
use crate::source::{ImageFileSource, PixelSource};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Extensions picked up when walking directories
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "tga", "ico", "pnm", "pbm",
    "pgm", "ppm", "qoi",
];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand paths into the image files to analyze.
///
/// Files named explicitly are always kept; directories contribute only
/// files with an image extension, sorted by name.
pub fn collect_images(paths: &[PathBuf], recursive: bool) -> StegResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(StegError::InvalidParams(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }

        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        let walker = if recursive {
            WalkDir::new(path)
        } else {
            WalkDir::new(path).max_depth(1)
        };

        for entry in walker
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_image_path(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

/// Runs the pipeline over many image files in parallel
pub struct BatchScanner<S = ImageFileSource> {
    pipeline: SteganalysisPipeline,
    source: S,
}

impl BatchScanner<ImageFileSource> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_source(SteganalysisPipeline::new(config), ImageFileSource::new())
    }
}

impl Default for BatchScanner<ImageFileSource> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<S: PixelSource> BatchScanner<S> {
    pub fn with_source(pipeline: SteganalysisPipeline, source: S) -> Self {
        Self { pipeline, source }
    }

    pub fn pipeline(&self) -> &SteganalysisPipeline {
        &self.pipeline
    }

    /// Load and analyze a single file
    pub fn scan_file(&self, path: &Path) -> StegResult<ImageReport> {
        let source = self.source.load(path)?;
        let analysis = self.pipeline.run(&source.image.pixels());
        Ok(ImageReport::new(path, &source, analysis))
    }

    /// Analyze every file; results come back in input order
    pub fn scan_all(&self, files: &[PathBuf]) -> Vec<(PathBuf, StegResult<ImageReport>)> {
        let outcomes: Vec<(PathBuf, StegResult<ImageReport>)> = files
            .par_iter()
            .map(|path| {
                let outcome = self.scan_file(path);
                if let Err(e) = &outcome {
                    warn!(path = %path.display(), error = %e, "skipping image");
                }
                (path.clone(), outcome)
            })
            .collect();

        let analyzed = outcomes.iter().filter(|(_, o)| o.is_ok()).count();
        info!(
            files = files.len(),
            analyzed,
            failed = files.len() - analyzed,
            "batch scan finished"
        );

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Status, WeightTable};
    use crate::source::{DecodedImage, SourceImage};
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path, value: u8) {
        let img = RgbaImage::from_pixel(8, 8, Rgba([value, value, value, 255]));
        img.save(path).unwrap();
    }

    /// Serves a fixed buffer for any path
    struct MemorySource(Vec<u8>, u32, u32);

    impl PixelSource for MemorySource {
        fn load(&self, path: &Path) -> StegResult<SourceImage> {
            if path.ends_with("broken.png") {
                return Err(StegError::InvalidParams("broken".to_string()));
            }
            Ok(SourceImage {
                file_size: self.0.len() as u64,
                sha256: String::new(),
                image: DecodedImage {
                    width: self.1,
                    height: self.2,
                    rgba: self.0.clone(),
                },
            })
        }
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a/b/photo.PNG")));
        assert!(is_image_path(Path::new("photo.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_images_depth_and_order() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        write_png(&dir.path().join("b.png"), 10);
        write_png(&dir.path().join("a.png"), 10);
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();
        write_png(&nested.join("c.png"), 10);

        let shallow = collect_images(&[dir.path().to_path_buf()], false).unwrap();
        let names: Vec<_> = shallow
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let deep = collect_images(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_collect_images_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            collect_images(&[missing], false),
            Err(StegError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_scan_all_keeps_going_after_failure() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        write_png(&good, 200);
        fs::write(&bad, b"garbage").unwrap();

        let scanner = BatchScanner::new(PipelineConfig::default());
        let outcomes = scanner.scan_all(&[bad.clone(), good.clone()]);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, bad);
        assert!(matches!(outcomes[0].1, Err(StegError::Decode { .. })));

        let report = outcomes[1].1.as_ref().unwrap();
        assert_eq!(report.filename, "good.png");
        assert_eq!(report.dimensions, "8x8");
    }

    fn chi_square_only() -> PipelineConfig {
        PipelineConfig {
            weights: WeightTable::new(0.0).with("chiSquare", 1.0),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_scanner_uses_configured_pipeline() {
        let scanner = BatchScanner::new(chi_square_only());
        let weights = scanner.pipeline().aggregator().weights();
        assert_eq!(weights.weight("chiSquare"), 1.0);
        assert_eq!(weights.weight("histogram"), 0.0);

        // Only chi-square counts, so the flat buffer scores its 100
        let scanner = BatchScanner::with_source(
            SteganalysisPipeline::new(chi_square_only()),
            MemorySource(vec![0; 64], 4, 4),
        );
        let report = scanner.scan_file(Path::new("flat.png")).unwrap();
        assert_eq!(report.analysis.confidence, 100.0);
        assert_eq!(report.status(), Status::Detected);
    }

    #[test]
    fn test_custom_source() {
        let scanner = BatchScanner::with_source(
            SteganalysisPipeline::default(),
            MemorySource(vec![], 0, 0),
        );
        let outcomes = scanner.scan_all(&[PathBuf::from("x.png"), PathBuf::from("broken.png")]);

        assert_eq!(outcomes[0].1.as_ref().unwrap().status(), Status::Clean);
        assert!(outcomes[1].1.is_err());
    }
}
