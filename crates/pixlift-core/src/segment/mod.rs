//! Segmentation engine
//!
//! Staged pipeline producing a background probability mask: multi-scale
//! edge map, color clustering, background cluster identification,
//! border-seeded flood fill, morphological cleanup, guided smoothing, and
//! feathering. Images below the minimum kernel footprint skip the
//! morphological and guided stages rather than failing.

mod cluster;
mod edges;
mod flood;
mod morph;
mod refine;

#[cfg(test)]
mod tests;

use crate::buffer::{Mask, RasterBuffer};
use crate::config::TuningConfig;
use crate::error::PixliftError;
use crate::governor::Governor;
use crate::models::CutoutOptions;

/// Working-set passes for the governor estimate: edge map (f32), flood
/// bitmap, mask, plus the source itself.
const SEGMENT_PASSES: u32 = 7;

/// Produce a background mask for the buffer. 255 = definite background.
pub fn segment(
    buffer: &RasterBuffer,
    options: &CutoutOptions,
    tuning: &TuningConfig,
    governor: &Governor,
) -> Result<Mask, PixliftError> {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let _charge = governor.charge(buffer.pixel_count() as u64, SEGMENT_PASSES)?;

    let gray = buffer.luminance();
    let edge_map = edges::edge_map(&gray, w, h);
    governor.checkpoint()?;

    let model = cluster::cluster_colors(buffer, tuning);
    governor.checkpoint()?;

    let threshold = flood_threshold(options.sensitivity, tuning);
    let background = flood::background_flood(&edge_map, buffer, threshold, &model);
    governor.checkpoint()?;

    let footprint = tuning.min_kernel_footprint as usize;
    let large_enough = w >= footprint && h >= footprint;

    let mut foreground: Vec<bool> = background.iter().map(|&b| !b).collect();
    if large_enough {
        foreground = morph::close_then_open(foreground, w, h, tuning.morph_radius as usize);
        governor.checkpoint()?;
    }

    let mut mask_data: Vec<u8> = foreground
        .iter()
        .map(|&fg| if fg { 0 } else { 255 })
        .collect();
    if large_enough {
        refine::guided_smooth(&mut mask_data, &gray, w, h, tuning.guided_iterations);
        governor.checkpoint()?;
    }
    if options.feather_edges {
        refine::feather(&mut mask_data, w, h, tuning.feather_radius);
    }

    Mask::from_data(buffer.width(), buffer.height(), mask_data)
}

/// Map the 0-100 user sensitivity onto an edge threshold. Higher sensitivity
/// lets the background flood cross stronger edges.
fn flood_threshold(sensitivity: u8, tuning: &TuningConfig) -> f32 {
    let s = sensitivity.min(100) as f32 / 100.0;
    tuning.flood_edge_threshold * (0.4 + 1.2 * s)
}

/// Scale a mask to new dimensions with bilinear interpolation. Used when
/// segmentation ran at reduced resolution and the mask must be applied to
/// the full-size image.
pub fn resize_mask(mask: &Mask, dst_w: u32, dst_h: u32) -> Result<Mask, PixliftError> {
    if dst_w == 0 || dst_h == 0 {
        return Err(PixliftError::InvalidDimensions {
            width: dst_w,
            height: dst_h,
        });
    }
    let (src_w, src_h) = (mask.width() as usize, mask.height() as usize);
    let data = mask.data();
    let scale_x = src_w as f32 / dst_w as f32;
    let scale_y = src_h as f32 / dst_h as f32;

    let mut out = vec![0u8; dst_w as usize * dst_h as usize];
    for dy in 0..dst_h as usize {
        let sy = ((dy as f32 + 0.5) * scale_y - 0.5).clamp(0.0, (src_h - 1) as f32);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(src_h - 1);
        let fy = sy - y0 as f32;
        for dx in 0..dst_w as usize {
            let sx = ((dx as f32 + 0.5) * scale_x - 0.5).clamp(0.0, (src_w - 1) as f32);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let fx = sx - x0 as f32;

            let top = data[y0 * src_w + x0] as f32 * (1.0 - fx) + data[y0 * src_w + x1] as f32 * fx;
            let bottom =
                data[y1 * src_w + x0] as f32 * (1.0 - fx) + data[y1 * src_w + x1] as f32 * fx;
            out[dy * dst_w as usize + dx] =
                (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
        }
    }
    Mask::from_data(dst_w, dst_h, out)
}
