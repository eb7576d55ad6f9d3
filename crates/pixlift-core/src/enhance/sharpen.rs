//! Unsharp-mask sharpening

use super::blur::gaussian_blur;
use crate::buffer::{RasterBuffer, CHANNELS};
use crate::models::{ContentAnalysis, ContentType};

const BLUR_RADIUS: usize = 2;

/// Map the user's 0-100 sharpen setting to an unsharp amount, halved for
/// text content to avoid ringing around glyphs.
pub(crate) fn adaptive_amount(sharpen_amount: u8, analysis: &ContentAnalysis) -> f32 {
    let base = sharpen_amount.min(100) as f32 / 100.0;
    match analysis.content_type {
        ContentType::Text => base * 0.5,
        _ => base,
    }
}

/// `original + (original - blur(original)) * amount`, interior pixels only.
pub(crate) fn unsharp_mask(buffer: &mut RasterBuffer, amount: f32) {
    if amount <= 0.0 {
        return;
    }
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    if w <= BLUR_RADIUS * 2 || h <= BLUR_RADIUS * 2 {
        return;
    }
    let blurred = gaussian_blur(buffer.pixels(), w, h, BLUR_RADIUS);
    let pixels = buffer.pixels_mut();
    for y in BLUR_RADIUS..h - BLUR_RADIUS {
        for x in BLUR_RADIUS..w - BLUR_RADIUS {
            let p = (y * w + x) * CHANNELS;
            for c in 0..3 {
                let orig = pixels[p + c] as f32;
                let diff = orig - blurred[p + c] as f32;
                pixels[p + c] = (orig + diff * amount).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_buffer_is_untouched() {
        let mut buf = RasterBuffer::filled(12, 12, [77, 77, 77, 255]).unwrap();
        let before = buf.pixels().to_vec();
        unsharp_mask(&mut buf, 0.8);
        assert_eq!(buf.pixels(), &before[..]);
    }

    #[test]
    fn step_edge_gains_acutance() {
        let mut buf = RasterBuffer::filled(16, 16, [50, 50, 50, 255]).unwrap();
        for y in 0..16 {
            for x in 8..16 {
                buf.set(x, y, [200, 200, 200, 255]);
            }
        }
        unsharp_mask(&mut buf, 1.0);
        assert!(buf.get(8, 8)[0] > 200);
        assert!(buf.get(7, 8)[0] < 50);
    }

    #[test]
    fn text_content_gets_reduced_amount() {
        let text = ContentAnalysis {
            content_type: ContentType::Text,
            noise_level: 0.0,
            edge_density: 0.5,
            skin_tone_ratio: 0.0,
            compression_artifact_score: 0.0,
        };
        let mut photo = text.clone();
        photo.content_type = ContentType::Photo;
        assert!(adaptive_amount(80, &text) < adaptive_amount(80, &photo));
    }
}
