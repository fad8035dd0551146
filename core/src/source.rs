//! Pixel sources
//!
//! Acquire decoded RGBA pixels for the pipeline. Decoding is the only place
//! where analysis input can fail; the analyzers never see a bad image.

use crate::error::{StegError, StegResult};
use crate::pixels::PixelBuffer;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// RGBA8 pixels with their dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn pixels(&self) -> PixelBuffer<'_> {
        PixelBuffer::new(&self.rgba, self.width as usize, self.height as usize)
    }

    /// Dimensions formatted as `WxH`
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// A decoded image plus facts about the file it came from
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_size: u64,
    /// Hex SHA-256 of the raw file contents
    pub sha256: String,
    pub image: DecodedImage,
}

/// Anything that can turn a path into pixels
pub trait PixelSource: Send + Sync {
    fn load(&self, path: &Path) -> StegResult<SourceImage>;
}

/// Decodes image files with the `image` crate, guessing the format from content
pub struct ImageFileSource;

impl ImageFileSource {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, bytes: &[u8], path: &Path) -> StegResult<DecodedImage> {
        let decoded = image::load_from_memory(bytes).map_err(|source| StegError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(DecodedImage {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

impl Default for ImageFileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSource for ImageFileSource {
    fn load(&self, path: &Path) -> StegResult<SourceImage> {
        let bytes = fs::read(path)?;
        let image = self.decode(&bytes, path)?;

        Ok(SourceImage {
            file_size: bytes.len() as u64,
            sha256: hex::encode(Sha256::digest(&bytes)),
            image,
        })
    }
}
