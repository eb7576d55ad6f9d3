//! Enhancement pipeline
//!
//! Ordered post-resample steps, each independently toggled: detail boost,
//! bilateral denoise, unsharp sharpening, color/contrast. Every step
//! preserves dimensions and channel count and leaves a kernel-radius border
//! untouched. With all toggles off the buffer passes through byte-for-byte.

mod blur;
mod color;
mod denoise;
mod detail;
mod sharpen;

#[cfg(test)]
mod tests;

pub(crate) use detail::boost_detail;

use crate::buffer::RasterBuffer;
use crate::error::PixliftError;
use crate::governor::Governor;
use crate::models::{ContentAnalysis, UpscaleOptions};

/// Saturation and midtone-contrast gains for the optional color step.
const SATURATION_BOOST: f32 = 1.15;
const CONTRAST_BOOST: f32 = 1.08;

/// Run the enabled enhancement steps in order, in place.
///
/// The governor is consulted between steps, so cancellation takes effect at
/// stage boundaries.
pub fn enhance(
    buffer: &mut RasterBuffer,
    analysis: &ContentAnalysis,
    options: &UpscaleOptions,
    governor: &Governor,
) -> Result<(), PixliftError> {
    if options.enhance_details {
        governor.checkpoint()?;
        detail::enhance_details(buffer, analysis);
    }
    if options.reduce_noise {
        governor.checkpoint()?;
        denoise::reduce_noise(buffer, analysis, None);
    }
    if options.sharpen_amount > 0 {
        governor.checkpoint()?;
        let amount = sharpen::adaptive_amount(options.sharpen_amount, analysis);
        sharpen::unsharp_mask(buffer, amount);
    }
    if options.enhance_colors {
        governor.checkpoint()?;
        color::boost_colors(buffer, SATURATION_BOOST, CONTRAST_BOOST);
    }
    Ok(())
}

/// Joint bilateral denoise against an external guide plane. Used by the
/// segmentation engine to clean masks without blurring true edges.
pub(crate) fn guided_denoise(buffer: &mut RasterBuffer, analysis: &ContentAnalysis, guide: &[u8]) {
    denoise::reduce_noise(buffer, analysis, Some(guide));
}
