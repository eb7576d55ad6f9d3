//! Content analyzer
//!
//! Classifies buffer content (photo / art / text / mixed) and estimates
//! noise, edge density, skin-tone presence, and compression blockiness from
//! a strided sample of the pixels. Best-effort by design: analysis never
//! fails, it only feeds the planner's heuristics.

use crate::buffer::{luma8, RasterBuffer};
use crate::models::{ContentAnalysis, ContentType};
use std::collections::HashSet;

/// Sample every Nth pixel in each dimension.
const SAMPLE_STRIDE: usize = 3;

/// Sobel magnitude (0..255 scale) above which a sample counts as an edge.
const EDGE_MAG: f32 = 18.0;

/// Magnitude above which a sample counts as a high-contrast (text-like) edge.
const STRONG_EDGE_MAG: f32 = 80.0;

/// Gradient ceiling under which a sample is "flat" enough to measure noise.
const FLAT_MAG: f32 = 10.0;

/// Classification thresholds, in priority order: text, art, photo.
const TEXT_STRONG_EDGE_RATIO: f32 = 0.15;
const ART_UNIQUE_COLOR_RATIO: f32 = 0.05;
const ART_EDGE_RATIO: f32 = 0.3;
const PHOTO_NOISE_CEILING: f32 = 0.3;
const PHOTO_ARTIFACT_CEILING: f32 = 0.3;

/// Analyze a buffer with a strided scan.
///
/// Zero-sized buffers cannot exist (the `RasterBuffer` constructor rejects
/// them), so this function has no failure path.
pub fn analyze(buffer: &RasterBuffer) -> ContentAnalysis {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let gray = buffer.luminance();

    let mut samples = 0u32;
    let mut edge_samples = 0u32;
    let mut strong_edge_samples = 0u32;
    let mut skin_samples = 0u32;
    let mut flat_samples = 0u32;
    let mut flat_std_sum = 0.0f32;
    let mut boundary_checks = 0u32;
    let mut blocky_boundaries = 0u32;
    let mut unique_colors: HashSet<u16> = HashSet::new();

    // Interior pixels only; the 3x3 neighborhoods must stay in bounds.
    let mut y = 1;
    while y + 1 < h {
        let mut x = 1;
        while x + 1 < w {
            samples += 1;

            let mag = sobel_magnitude(&gray, w, x, y);
            if mag > EDGE_MAG {
                edge_samples += 1;
            }
            if mag > STRONG_EDGE_MAG {
                strong_edge_samples += 1;
            }
            if mag < FLAT_MAG {
                flat_samples += 1;
                flat_std_sum += local_variance(&gray, w, x, y).sqrt();
            }

            let [r, g, b, _] = buffer.get(x as u32, y as u32);
            if is_skin_tone(r, g, b) {
                skin_samples += 1;
            }
            unique_colors.insert(quantize_rgb(r, g, b));

            // JPEG blockiness: a jump across an 8-pixel column boundary that
            // dwarfs the jump just inside the block.
            if x % 8 == 0 && x >= 2 {
                boundary_checks += 1;
                let at = |xx: usize| gray[y * w + xx] as i32;
                let across = (at(x) - at(x - 1)).abs();
                let within = (at(x - 1) - at(x - 2)).abs();
                if across > within * 2 + 4 {
                    blocky_boundaries += 1;
                }
            }

            x += SAMPLE_STRIDE;
        }
        y += SAMPLE_STRIDE;
    }

    let total = samples.max(1) as f32;
    let edge_density = edge_samples as f32 / total;
    let strong_edge_ratio = strong_edge_samples as f32 / total;
    let skin_tone_ratio = skin_samples as f32 / total;
    let unique_color_ratio = unique_colors.len() as f32 / total;
    let noise_level = if flat_samples > 0 {
        (flat_std_sum / flat_samples as f32 / 32.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let compression_artifact_score = if boundary_checks > 0 {
        (blocky_boundaries as f32 / boundary_checks as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let content_type = if strong_edge_ratio > TEXT_STRONG_EDGE_RATIO {
        ContentType::Text
    } else if unique_color_ratio < ART_UNIQUE_COLOR_RATIO && edge_density > ART_EDGE_RATIO {
        ContentType::Art
    } else if noise_level < PHOTO_NOISE_CEILING
        && compression_artifact_score < PHOTO_ARTIFACT_CEILING
    {
        ContentType::Photo
    } else {
        ContentType::Mixed
    };

    ContentAnalysis {
        content_type,
        noise_level,
        edge_density: edge_density.clamp(0.0, 1.0),
        skin_tone_ratio: skin_tone_ratio.clamp(0.0, 1.0),
        compression_artifact_score,
    }
}

/// 3x3 Sobel gradient magnitude on the luminance plane, scaled to 0..255.
#[inline]
pub(crate) fn sobel_magnitude(gray: &[u8], w: usize, x: usize, y: usize) -> f32 {
    let at = |xx: usize, yy: usize| gray[yy * w + xx] as i32;
    let gx = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
        - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
    let gy = (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
        - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1));
    (gx.abs() + gy.abs()) as f32 / 8.0
}

/// 3x3 luminance variance.
#[inline]
pub(crate) fn local_variance(gray: &[u8], w: usize, x: usize, y: usize) -> f32 {
    let mut sum = 0.0f32;
    let mut sum_sq = 0.0f32;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let v = gray[(y as i32 + dy) as usize * w + (x as i32 + dx) as usize] as f32;
            sum += v;
            sum_sq += v * v;
        }
    }
    let mean = sum / 9.0;
    (sum_sq / 9.0 - mean * mean).max(0.0)
}

/// Classic chrominance-ratio skin test on 8-bit RGB.
#[inline]
fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20 && r > g && r > b && (max - min) > 15 && (r - g).abs() > 15
}

/// Quantize to 5 bits per channel for the palette-size estimate.
#[inline]
fn quantize_rgb(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 10) | ((g as u16 >> 3) << 5) | (b as u16 >> 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RasterBuffer;

    fn stripes(w: u32, h: u32, period: u32, a: [u8; 4], b: [u8; 4]) -> RasterBuffer {
        let mut buf = RasterBuffer::filled(w, h, a).unwrap();
        for y in 0..h {
            for x in 0..w {
                if (x / period) % 2 == 1 {
                    buf.set(x, y, b);
                }
            }
        }
        buf
    }

    #[test]
    fn solid_color_reads_as_clean_photo() {
        let buf = RasterBuffer::filled(64, 64, [120, 130, 140, 255]).unwrap();
        let a = analyze(&buf);
        assert_eq!(a.content_type, ContentType::Photo);
        assert_eq!(a.edge_density, 0.0);
        assert!(a.noise_level < 0.05);
        assert!(a.compression_artifact_score < 0.05);
    }

    #[test]
    fn high_contrast_stripes_read_as_text() {
        let buf = stripes(96, 96, 2, [255, 255, 255, 255], [0, 0, 0, 255]);
        let a = analyze(&buf);
        assert_eq!(a.content_type, ContentType::Text);
    }

    #[test]
    fn low_contrast_low_palette_stripes_read_as_art() {
        let buf = stripes(96, 96, 2, [100, 100, 100, 255], [140, 140, 140, 255]);
        let a = analyze(&buf);
        assert_eq!(a.content_type, ContentType::Art);
        assert!(a.edge_density > ART_EDGE_RATIO);
    }

    #[test]
    fn noise_raises_the_noise_estimate() {
        let mut buf = RasterBuffer::filled(64, 64, [128, 128, 128, 255]).unwrap();
        // Deterministic pseudo-random speckle.
        let mut state = 0x2545_f491u32;
        for y in 0..64 {
            for x in 0..64 {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let v = 118 + (state >> 27) as u8; // 118..=149
                buf.set(x, y, [v, v, v, 255]);
            }
        }
        let noisy = analyze(&buf);
        let clean = analyze(&RasterBuffer::filled(64, 64, [128, 128, 128, 255]).unwrap());
        assert!(noisy.noise_level > clean.noise_level);
    }

    #[test]
    fn skin_tones_are_detected() {
        let buf = RasterBuffer::filled(32, 32, [210, 150, 120, 255]).unwrap();
        let a = analyze(&buf);
        assert!(a.skin_tone_ratio > 0.9);
    }
}
