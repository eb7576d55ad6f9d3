//! Multi-scale detail boost
//!
//! Extracts a high-pass residual at increasing blur radii and blends it back
//! at modest strength. Art gets more scales and a stronger blend than
//! photographic content, which amplifies noise if pushed.

use super::blur::gaussian_blur;
use crate::buffer::{RasterBuffer, CHANNELS};
use crate::models::{ContentAnalysis, ContentType};

/// Content-adapted detail boost.
pub(crate) fn enhance_details(buffer: &mut RasterBuffer, analysis: &ContentAnalysis) {
    let (scales, strength) = match analysis.content_type {
        ContentType::Art => (3, 0.3),
        ContentType::Text => (2, 0.1),
        ContentType::Photo | ContentType::Mixed => (2, 0.15),
    };
    boost_detail(buffer, scales, strength);
}

/// Blend `scales` octaves of high-pass residual back into the buffer.
///
/// Each octave doubles the blur radius. Only interior pixels beyond the
/// current radius are touched; alpha is left alone.
pub(crate) fn boost_detail(buffer: &mut RasterBuffer, scales: u32, strength: f32) {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    for octave in 0..scales {
        let radius = 1usize << octave;
        if w <= radius * 2 || h <= radius * 2 {
            break;
        }
        let blurred = gaussian_blur(buffer.pixels(), w, h, radius);
        let pixels = buffer.pixels_mut();
        // Deeper octaves contribute less.
        let blend = strength / (octave + 1) as f32;
        for y in radius..h - radius {
            for x in radius..w - radius {
                let p = (y * w + x) * CHANNELS;
                for c in 0..3 {
                    let orig = pixels[p + c] as f32;
                    let high_pass = orig - blurred[p + c] as f32;
                    pixels[p + c] = (orig + high_pass * blend).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_buffer_is_untouched() {
        let mut buf = RasterBuffer::filled(16, 16, [90, 90, 90, 255]).unwrap();
        let before = buf.pixels().to_vec();
        boost_detail(&mut buf, 2, 0.3);
        assert_eq!(buf.pixels(), &before[..]);
    }

    #[test]
    fn edges_gain_contrast() {
        let mut buf = RasterBuffer::filled(16, 16, [60, 60, 60, 255]).unwrap();
        for y in 0..16 {
            for x in 8..16 {
                buf.set(x, y, [180, 180, 180, 255]);
            }
        }
        boost_detail(&mut buf, 1, 0.3);
        // Just past the step, the bright side overshoots and the dark side
        // undershoots.
        assert!(buf.get(8, 8)[0] > 180);
        assert!(buf.get(7, 8)[0] < 60);
    }

    #[test]
    fn tiny_buffers_are_skipped_not_panicked() {
        let mut buf = RasterBuffer::filled(3, 3, [10, 20, 30, 255]).unwrap();
        boost_detail(&mut buf, 3, 0.3);
        assert_eq!(buf.get(1, 1), [10, 20, 30, 255]);
    }
}
