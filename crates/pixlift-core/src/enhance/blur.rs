//! Separable Gaussian blur
//!
//! Shared by the detail-boost and unsharp-mask steps. Weights are
//! renormalized against the valid tap count, so edge pixels are not
//! darkened.

use crate::buffer::CHANNELS;
use rayon::prelude::*;

/// Pixel count above which the row passes run on the rayon pool.
const PARALLEL_THRESHOLD: usize = 30_000;

/// Blur all four channels with a Gaussian of the given radius.
pub(crate) fn gaussian_blur(pixels: &[u8], w: usize, h: usize, radius: usize) -> Vec<u8> {
    let weights = gaussian_weights(radius);
    let horizontal = blur_axis(pixels, w, h, &weights, true);
    blur_axis(&horizontal, w, h, &weights, false)
}

fn gaussian_weights(radius: usize) -> Vec<f32> {
    let sigma = (radius as f32 / 1.5).max(0.5);
    let denom = 2.0 * sigma * sigma;
    (0..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect()
}

fn blur_axis(pixels: &[u8], w: usize, h: usize, weights: &[f32], horizontal: bool) -> Vec<u8> {
    let radius = weights.len() - 1;
    let row_bytes = w * CHANNELS;
    let mut out = vec![0u8; pixels.len()];

    let process_row = |y: usize, row_out: &mut [u8]| {
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            let mut weight_sum = 0.0f32;
            for (i, &wt) in weights.iter().enumerate().take(radius + 1) {
                // Tap at +i and, for i > 0, the mirrored -i tap.
                for sign in [1i32, -1] {
                    if i == 0 && sign < 0 {
                        continue;
                    }
                    let off = i as i32 * sign;
                    let (tx, ty) = if horizontal {
                        (x as i32 + off, y as i32)
                    } else {
                        (x as i32, y as i32 + off)
                    };
                    if tx < 0 || ty < 0 || tx >= w as i32 || ty >= h as i32 {
                        continue;
                    }
                    let p = (ty as usize * w + tx as usize) * CHANNELS;
                    for c in 0..CHANNELS {
                        acc[c] += wt * pixels[p + c] as f32;
                    }
                    weight_sum += wt;
                }
            }
            let o = x * CHANNELS;
            for c in 0..CHANNELS {
                row_out[o + c] = (acc[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    };

    if w * h >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row_out)| process_row(y, row_out));
    } else {
        for (y, row_out) in out.chunks_mut(row_bytes).enumerate() {
            process_row(y, row_out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_is_unchanged() {
        let pixels = vec![200u8; 10 * 10 * CHANNELS];
        let out = gaussian_blur(&pixels, 10, 10, 2);
        assert_eq!(out, pixels);
    }

    #[test]
    fn blur_reduces_local_contrast() {
        // Single bright pixel in a dark field spreads out.
        let w = 9;
        let mut pixels = vec![0u8; w * w * CHANNELS];
        let center = (4 * w + 4) * CHANNELS;
        pixels[center] = 255;
        let out = gaussian_blur(&pixels, w, w, 2);
        assert!(out[center] < 255);
        let neighbor = (4 * w + 5) * CHANNELS;
        assert!(out[neighbor] > 0);
    }
}
