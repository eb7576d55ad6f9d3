//! Color and contrast enhancement
//!
//! Luminance-preserving saturation boost plus a midtone-weighted contrast
//! stretch. Shadows and highlights are weighted down so the stretch cannot
//! crush them.

use crate::buffer::{RasterBuffer, CHANNELS};
use rayon::prelude::*;

const PARALLEL_THRESHOLD: usize = 30_000;

/// Apply saturation and contrast boosts in one fused per-pixel pass.
pub(crate) fn boost_colors(buffer: &mut RasterBuffer, saturation: f32, contrast: f32) {
    let count = buffer.pixel_count();
    let pixels = buffer.pixels_mut();
    if count >= PARALLEL_THRESHOLD {
        // 256 pixels per chunk for cache locality.
        pixels
            .par_chunks_mut(256 * CHANNELS)
            .for_each(|chunk| boost_chunk(chunk, saturation, contrast));
    } else {
        boost_chunk(pixels, saturation, contrast);
    }
}

fn boost_chunk(chunk: &mut [u8], saturation: f32, contrast: f32) {
    for pixel in chunk.chunks_exact_mut(CHANNELS) {
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;
        let luma = 0.299 * r + 0.587 * g + 0.114 * b;

        // Scale chroma around the luma axis, keeping perceived brightness.
        let mut out = [
            luma + (r - luma) * saturation,
            luma + (g - luma) * saturation,
            luma + (b - luma) * saturation,
        ];

        // Midtone-weighted stretch: full effect at luma 128, fading to zero
        // at black and white.
        let midtone_weight = 1.0 - ((luma - 128.0) / 128.0).abs();
        let gain = 1.0 + (contrast - 1.0) * midtone_weight;
        for v in out.iter_mut() {
            *v = (*v - 128.0) * gain + 128.0;
        }

        pixel[0] = out[0].round().clamp(0.0, 255.0) as u8;
        pixel[1] = out[1].round().clamp(0.0, 255.0) as u8;
        pixel[2] = out[2].round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_settings_do_nothing() {
        let mut buf = RasterBuffer::filled(8, 8, [120, 90, 60, 255]).unwrap();
        let before = buf.pixels().to_vec();
        boost_colors(&mut buf, 1.0, 1.0);
        assert_eq!(buf.pixels(), &before[..]);
    }

    #[test]
    fn saturation_widens_channel_spread() {
        let mut buf = RasterBuffer::filled(8, 8, [150, 120, 90, 255]).unwrap();
        boost_colors(&mut buf, 1.3, 1.0);
        let [r, g, b, _] = buf.get(4, 4);
        assert!(r as i32 - b as i32 > 150 - 90);
        let _ = g;
    }

    #[test]
    fn gray_pixels_stay_gray() {
        let mut buf = RasterBuffer::filled(8, 8, [128, 128, 128, 255]).unwrap();
        boost_colors(&mut buf, 1.5, 1.2);
        let [r, g, b, _] = buf.get(2, 2);
        assert_eq!((r, g, b), (128, 128, 128));
    }
}
