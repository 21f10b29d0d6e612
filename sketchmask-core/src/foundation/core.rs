use anyhow::Context;

use crate::foundation::error::{SketchError, SketchResult};

/// Alpha strictly above this value marks a "strong" stroke pixel.
pub const STRONG_ALPHA: u8 = 128;

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Axis-aligned box in pixel space.
///
/// `width`/`height` are `max - min` of the covered coordinates, so a single pixel has a
/// zero-sized region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn from_extents(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x),
            height: max_y.saturating_sub(min_y),
        }
    }

    /// Inclusive containment test against the covered coordinate range.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x <= self.x + self.width
            && p.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &Region) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Straight (non-premultiplied) RGBA8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SketchResult<Self> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(SketchError::validation(format!(
                "pixel buffer length {} does not match {width}x{height}x4 = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> SketchResult<Self> {
        let len = rgba_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Buffer filled with a single straight RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> SketchResult<Self> {
        let mut out = Self::transparent(width, height)?;
        for px in out.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Ok(out)
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> SketchResult<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Decode encoded image bytes (any format the `image` crate reads) into straight RGBA8.
    pub fn decode(bytes: &[u8]) -> SketchResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        Self::from_rgba_image(dyn_img.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer; [`PixelBuffer::get_rgba`] is the checked form.
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y) + 3]
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer; [`PixelBuffer::try_set_rgba`] is the checked form.
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn get_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.in_bounds(x, y).then(|| self.rgba(x, y))
    }

    pub fn try_set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> SketchResult<()> {
        if !self.in_bounds(x, y) {
            return Err(SketchError::validation(format!(
                "pixel ({x}, {y}) is outside {}x{}",
                self.width, self.height
            )));
        }
        self.set_rgba(x, y, rgba);
        Ok(())
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Alpha channel as one byte per pixel.
    pub fn alpha_plane(&self) -> Vec<u8> {
        self.data.chunks_exact(4).map(|px| px[3]).collect()
    }

    /// Number of pixels whose alpha is above [`STRONG_ALPHA`].
    pub fn strong_pixel_count(&self) -> usize {
        self.data
            .chunks_exact(4)
            .filter(|px| px[3] > STRONG_ALPHA)
            .count()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "pixel ({x}, {y}) is outside {}x{}",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// Byte length of a `width x height` RGBA8 surface, rejecting empty or overflowing sizes.
pub(crate) fn rgba_len(width: u32, height: u32) -> SketchResult<usize> {
    if width == 0 || height == 0 {
        return Err(SketchError::validation(format!(
            "pixel buffer dimensions must be > 0 (got {width}x{height})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| {
            SketchError::context_unavailable(format!("{width}x{height} surface size overflow"))
        })
}

/// Allocate a zeroed scratch surface, mapping allocator refusal to `ContextUnavailable`.
pub(crate) fn alloc_scratch(width: u32, height: u32) -> SketchResult<Vec<u8>> {
    let len = rgba_len(width, height)?;
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|e| {
        SketchError::context_unavailable(format!("allocate {width}x{height} scratch surface: {e}"))
    })?;
    out.resize(len, 0);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
