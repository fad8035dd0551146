//! Borrowed RGBA pixel buffers
//!
//! Pixels are interleaved `R, G, B, A`, one byte per channel, row-major.
//! The alpha channel is carried along but never read by any analyzer.

/// Bytes per pixel in an interleaved RGBA buffer
pub const CHANNELS: usize = 4;

/// Immutable view over decoded RGBA pixels.
///
/// The buffer may be shorter than `width * height * 4`; every accessor
/// stops at the end of the data instead of indexing past it. A trailing
/// partial pixel is ignored by the per-pixel iterators.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Length of the underlying buffer in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the buffer holds every pixel its dimensions declare
    pub fn is_complete(&self) -> bool {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .is_some_and(|expected| self.data.len() >= expected)
    }

    /// Complete pixels as `[R, G, B]`, alpha dropped
    pub fn rgb(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Every color sample of every complete pixel, in `R, G, B` order
    pub fn samples(&self) -> impl Iterator<Item = u8> + 'a {
        self.rgb().flatten()
    }

    /// Red sample at `(x, y)`, or `None` when it lies past the buffer end
    pub fn red_at(&self, x: usize, y: usize) -> Option<u8> {
        let idx = y
            .checked_mul(self.width)?
            .checked_add(x)?
            .checked_mul(CHANNELS)?;
        self.data.get(idx).copied()
    }
}
