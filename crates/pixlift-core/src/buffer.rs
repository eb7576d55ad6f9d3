//! Shared pixel buffer types
//!
//! [`RasterBuffer`] is the interleaved RGBA8 working representation passed
//! between all pipeline stages. [`Mask`] is the single-channel background
//! probability buffer produced by the segmentation engine and consumed into
//! the alpha channel.

use crate::error::PixliftError;

/// Interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An owned, contiguous RGBA8 raster.
///
/// Invariant: `pixels.len() == width * height * 4`, enforced by the
/// constructor. Stages either mutate the pixel data in place or allocate a
/// fresh buffer and hand ownership forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap an existing pixel vector, validating the geometry invariant.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PixliftError> {
        if width == 0 || height == 0 {
            return Err(PixliftError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(PixliftError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocate a buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, PixliftError> {
        if width == 0 || height == 0 {
            return Err(PixliftError::InvalidDimensions { width, height });
        }
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the buffer, returning the raw pixel vector.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Read one pixel. Caller guarantees `x < width && y < height`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Write one pixel. Caller guarantees `x < width && y < height`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Extract a single-channel luminance plane (Rec. 601 weights).
    pub fn luminance(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|p| luma8(p[0], p[1], p[2]))
            .collect()
    }
}

/// 8-bit luminance from 8-bit RGB using integer Rec. 601 weights.
#[inline]
pub fn luma8(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

/// Single-channel background probability mask.
///
/// One byte per pixel: 0 = definite foreground, 255 = definite background.
/// Built by the segmentation engine, consumed into the alpha channel via
/// [`Mask::apply_alpha`], then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Allocate a mask with every pixel marked foreground.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixliftError> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize {
            return Err(PixliftError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.data[y as usize * self.width as usize + x as usize] = value;
    }

    /// Consume the mask into the buffer's alpha channel: `alpha = 255 - mask`.
    ///
    /// Dimensions must match; mismatches are a caller bug surfaced as
    /// `InvalidDimensions`.
    pub fn apply_alpha(self, buffer: &mut RasterBuffer) -> Result<(), PixliftError> {
        if (self.width, self.height) != buffer.dimensions() {
            return Err(PixliftError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        for (pixel, &m) in buffer
            .pixels_mut()
            .chunks_exact_mut(CHANNELS)
            .zip(self.data.iter())
        {
            pixel[3] = 255 - m;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_rejects_zero_dimensions() {
        assert!(RasterBuffer::new(0, 10, vec![]).is_err());
        assert!(RasterBuffer::new(10, 0, vec![]).is_err());
    }

    #[test]
    fn buffer_rejects_length_mismatch() {
        let err = RasterBuffer::new(4, 4, vec![0; 4 * 4 * 4 - 1]);
        assert!(matches!(
            err,
            Err(PixliftError::InvalidDimensions {
                width: 4,
                height: 4
            })
        ));
    }

    #[test]
    fn pixel_round_trip() {
        let mut buf = RasterBuffer::filled(3, 3, [1, 2, 3, 4]).unwrap();
        buf.set(2, 1, [9, 8, 7, 6]);
        assert_eq!(buf.get(2, 1), [9, 8, 7, 6]);
        assert_eq!(buf.get(0, 0), [1, 2, 3, 4]);
    }

    #[test]
    fn mask_alpha_convention() {
        let mut buf = RasterBuffer::filled(2, 1, [10, 20, 30, 255]).unwrap();
        let mut mask = Mask::new(2, 1);
        mask.set(1, 0, 255);
        mask.apply_alpha(&mut buf).unwrap();
        assert_eq!(buf.get(0, 0)[3], 255); // foreground stays opaque
        assert_eq!(buf.get(1, 0)[3], 0); // background goes transparent
    }

    #[test]
    fn mask_alpha_dimension_mismatch() {
        let mut buf = RasterBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        let mask = Mask::new(3, 2);
        assert!(mask.apply_alpha(&mut buf).is_err());
    }
}
