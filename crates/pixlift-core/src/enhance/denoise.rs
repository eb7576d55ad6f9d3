//! Bilateral noise reduction
//!
//! Neighbors are weighted by spatial distance and color similarity, so flat
//! regions average out while true edges survive. When a guide plane is
//! supplied (the joint variant), similarity is measured on the guide instead
//! of the image itself, which keeps guide edges intact even where the image
//! is noisy.

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::models::ContentAnalysis;
use rayon::prelude::*;

const PARALLEL_THRESHOLD: usize = 30_000;

/// Noise reduction adapted to the measured noise level.
pub(crate) fn reduce_noise(
    buffer: &mut RasterBuffer,
    analysis: &ContentAnalysis,
    guide: Option<&[u8]>,
) {
    let radius = if analysis.noise_level > 0.5 { 3 } else { 2 };
    let sigma_range = 12.0 + analysis.noise_level * 28.0;
    bilateral_filter(buffer, radius, radius as f32 * 0.75, sigma_range, guide);
}

/// In-place bilateral filter over the RGB channels. Pixels within `radius`
/// of the border are left untouched.
pub(crate) fn bilateral_filter(
    buffer: &mut RasterBuffer,
    radius: usize,
    sigma_spatial: f32,
    sigma_range: f32,
    guide: Option<&[u8]>,
) {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    if w <= radius * 2 || h <= radius * 2 {
        return;
    }
    if let Some(g) = guide {
        debug_assert_eq!(g.len(), w * h);
    }

    let src = buffer.pixels().to_vec();
    let spatial = spatial_weights(radius, sigma_spatial);
    let range_denom = 2.0 * sigma_range * sigma_range;
    let side = radius * 2 + 1;
    let row_bytes = w * CHANNELS;

    let filter_row = |y: usize, row_out: &mut [u8]| {
        if y < radius || y >= h - radius {
            return;
        }
        for x in radius..w - radius {
            let center = (y * w + x) * CHANNELS;
            let mut acc = [0.0f32; 3];
            let mut weight_sum = 0.0f32;
            for dy in 0..side {
                for dx in 0..side {
                    let ny = y + dy - radius;
                    let nx = x + dx - radius;
                    let p = (ny * w + nx) * CHANNELS;
                    let color_dist_sq = match guide {
                        Some(g) => {
                            let d = g[ny * w + nx] as f32 - g[y * w + x] as f32;
                            d * d
                        }
                        None => {
                            let mut sum = 0.0f32;
                            for c in 0..3 {
                                let d = src[p + c] as f32 - src[center + c] as f32;
                                sum += d * d;
                            }
                            sum / 3.0
                        }
                    };
                    let wt = spatial[dy * side + dx] * (-color_dist_sq / range_denom).exp();
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += wt * src[p + c] as f32;
                    }
                    weight_sum += wt;
                }
            }
            let o = x * CHANNELS;
            for (c, a) in acc.iter().enumerate() {
                row_out[o + c] = (a / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    };

    let pixels = buffer.pixels_mut();
    if w * h >= PARALLEL_THRESHOLD {
        pixels
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| filter_row(y, row));
    } else {
        for (y, row) in pixels.chunks_mut(row_bytes).enumerate() {
            filter_row(y, row);
        }
    }
}

fn spatial_weights(radius: usize, sigma: f32) -> Vec<f32> {
    let side = radius * 2 + 1;
    let denom = 2.0 * sigma * sigma;
    let mut weights = Vec::with_capacity(side * side);
    for dy in 0..side {
        for dx in 0..side {
            let yy = dy as f32 - radius as f32;
            let xx = dx as f32 - radius as f32;
            weights.push((-(xx * xx + yy * yy) / denom).exp());
        }
    }
    weights
}
