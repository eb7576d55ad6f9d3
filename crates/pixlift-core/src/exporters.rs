//! Output encoding
//!
//! Encodes the working buffer to PNG, WebP, or JPEG bytes. PNG and WebP
//! carry the alpha channel through; JPEG has no alpha, so transparency is
//! flattened onto white first.

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::PixliftError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::models::OutputFormat;

/// Encode the buffer to the requested container format.
///
/// `quality` applies to JPEG only; PNG is always lossless and the WebP
/// encoder here is the lossless variant.
pub fn encode(
    buffer: &RasterBuffer,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, PixliftError> {
    let (w, h) = buffer.dimensions();
    let mut out = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut out)
                .write_image(buffer.pixels(), w, h, ExtendedColorType::Rgba8)
                .map_err(|e| PixliftError::EncodeFailure(e.to_string()))?;
        }
        OutputFormat::Webp => {
            WebPEncoder::new_lossless(&mut out)
                .write_image(buffer.pixels(), w, h, ExtendedColorType::Rgba8)
                .map_err(|e| PixliftError::EncodeFailure(e.to_string()))?;
        }
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_white(buffer);
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                .write_image(&rgb, w, h, ExtendedColorType::Rgb8)
                .map_err(|e| PixliftError::EncodeFailure(e.to_string()))?;
        }
    }
    Ok(out)
}

/// Composite the RGBA buffer over an opaque white background, dropping alpha.
fn flatten_onto_white(buffer: &RasterBuffer) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(buffer.pixel_count() * 3);
    for p in buffer.pixels().chunks_exact(CHANNELS) {
        let a = p[3] as u32;
        let inv = 255 - a;
        for &c in &p[..3] {
            rgb.push(((c as u32 * a + 255 * inv + 127) / 255) as u8);
        }
    }
    rgb
}
