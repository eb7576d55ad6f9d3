//! Line-art resampling path
//!
//! Nearest-neighbor magnification followed by a selective smoothing pass
//! that only averages neighbors of similar color. Flat fills stay flat,
//! outlines stay crisp, and the staircase left by nearest sampling inside a
//! color region is softened.

use super::band_rows;
use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::PixliftError;
use crate::governor::Governor;
use crate::models::ProcessingPlan;
use rayon::prelude::*;

/// Per-channel distance below which two pixels count as the same color and
/// may be averaged together.
const SIMILAR_COLOR_DISTANCE: i32 = 32;

pub(crate) fn resample_line_art(
    src: &RasterBuffer,
    dst_w: u32,
    dst_h: u32,
    plan: &ProcessingPlan,
    governor: &Governor,
) -> Result<RasterBuffer, PixliftError> {
    if dst_w == 0 || dst_h == 0 {
        return Err(PixliftError::InvalidDimensions {
            width: dst_w,
            height: dst_h,
        });
    }

    let nearest = nearest_scale(src, dst_w, dst_h, plan, governor)?;
    governor.checkpoint()?;
    selective_smooth(&nearest, plan, governor)
}

fn nearest_scale(
    src: &RasterBuffer,
    dst_w: u32,
    dst_h: u32,
    plan: &ProcessingPlan,
    governor: &Governor,
) -> Result<RasterBuffer, PixliftError> {
    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let scale_x = src_w as f32 / dst_w as f32;
    let scale_y = src_h as f32 / dst_h as f32;
    let row_bytes = dst_w as usize * CHANNELS;
    let band = band_rows(plan, dst_h);
    let src_pixels = src.pixels();

    let mut out = vec![0u8; dst_w as usize * dst_h as usize * CHANNELS];
    out.par_chunks_mut(band * row_bytes)
        .enumerate()
        .try_for_each(|(b, band_out)| -> Result<(), PixliftError> {
            let rows = band_out.len() / row_bytes;
            let _charge = governor.charge((rows * dst_w as usize) as u64, 2)?;
            let y0 = b * band;
            for (row_idx, row_out) in band_out.chunks_exact_mut(row_bytes).enumerate() {
                let sy = (((y0 + row_idx) as f32 + 0.5) * scale_y - 0.5)
                    .round()
                    .clamp(0.0, (src_h - 1) as f32) as usize;
                for dx in 0..dst_w as usize {
                    let sx = ((dx as f32 + 0.5) * scale_x - 0.5)
                        .round()
                        .clamp(0.0, (src_w - 1) as f32) as usize;
                    let p = (sy * src_w + sx) * CHANNELS;
                    let o = dx * CHANNELS;
                    row_out[o..o + CHANNELS].copy_from_slice(&src_pixels[p..p + CHANNELS]);
                }
            }
            Ok(())
        })?;

    RasterBuffer::new(dst_w, dst_h, out)
}

/// 3x3 average restricted to neighbors within [`SIMILAR_COLOR_DISTANCE`] of
/// the center. Border rows/columns are copied through untouched.
fn selective_smooth(
    src: &RasterBuffer,
    plan: &ProcessingPlan,
    governor: &Governor,
) -> Result<RasterBuffer, PixliftError> {
    let (w, h) = (src.width() as usize, src.height() as usize);
    if w < 3 || h < 3 {
        return Ok(src.clone());
    }
    let row_bytes = w * CHANNELS;
    let band = band_rows(plan, src.height());
    let src_pixels = src.pixels();

    let mut out = src.pixels().to_vec();
    out.par_chunks_mut(band * row_bytes)
        .enumerate()
        .try_for_each(|(b, band_out)| -> Result<(), PixliftError> {
            let rows = band_out.len() / row_bytes;
            let _charge = governor.charge((rows * w) as u64, 2)?;
            let y0 = b * band;
            for (row_idx, row_out) in band_out.chunks_exact_mut(row_bytes).enumerate() {
                let y = y0 + row_idx;
                if y == 0 || y == h - 1 {
                    continue;
                }
                for x in 1..w - 1 {
                    let center = &src_pixels[(y * w + x) * CHANNELS..(y * w + x) * CHANNELS + 4];
                    let mut acc = [0u32; CHANNELS];
                    let mut count = 0u32;
                    for dy in -1i32..=1 {
                        for dx in -1i32..=1 {
                            let p = ((y as i32 + dy) as usize * w + (x as i32 + dx) as usize)
                                * CHANNELS;
                            let candidate = &src_pixels[p..p + 4];
                            if similar(center, candidate) {
                                for c in 0..CHANNELS {
                                    acc[c] += candidate[c] as u32;
                                }
                                count += 1;
                            }
                        }
                    }
                    let o = x * CHANNELS;
                    for c in 0..CHANNELS {
                        row_out[o + c] = (acc[c] / count) as u8;
                    }
                }
            }
            Ok(())
        })?;

    RasterBuffer::new(src.width(), src.height(), out)
}

#[inline]
fn similar(a: &[u8], b: &[u8]) -> bool {
    (a[0] as i32 - b[0] as i32).abs() < SIMILAR_COLOR_DISTANCE
        && (a[1] as i32 - b[1] as i32).abs() < SIMILAR_COLOR_DISTANCE
        && (a[2] as i32 - b[2] as i32).abs() < SIMILAR_COLOR_DISTANCE
}
