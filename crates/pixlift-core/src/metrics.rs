//! Output quality measurement
//!
//! Strided scans over the final buffer producing informational metrics.
//! Nothing in the pipeline branches on these values; they are reported to
//! the caller alongside the encoded output.

use crate::analysis::{local_variance, sobel_magnitude};
use crate::buffer::RasterBuffer;
use crate::models::QualityMetrics;

const SAMPLE_STRIDE: usize = 4;

/// Gradient ceiling under which a sample counts as flat for the noise
/// estimate.
const FLAT_MAG: f32 = 10.0;

pub fn measure(buffer: &RasterBuffer) -> QualityMetrics {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let gray = buffer.luminance();

    let mut samples = 0u32;
    let mut gradient_sum = 0.0f32;
    let mut flat_samples = 0u32;
    let mut flat_std_sum = 0.0f32;
    let mut boundary_checks = 0u32;
    let mut blocky = 0u32;

    let mut y = 1;
    while y + 1 < h {
        let mut x = 1;
        while x + 1 < w {
            samples += 1;
            let mag = sobel_magnitude(&gray, w, x, y);
            gradient_sum += mag;
            if mag < FLAT_MAG {
                flat_samples += 1;
                flat_std_sum += local_variance(&gray, w, x, y).sqrt();
            }
            if x % 8 == 0 && x >= 2 {
                boundary_checks += 1;
                let at = |xx: usize| gray[y * w + xx] as i32;
                if (at(x) - at(x - 1)).abs() > (at(x - 1) - at(x - 2)).abs() * 2 + 4 {
                    blocky += 1;
                }
            }
            x += SAMPLE_STRIDE;
        }
        y += SAMPLE_STRIDE;
    }

    let total = samples.max(1) as f32;
    let sharpness = (gradient_sum / total / 64.0).clamp(0.0, 1.0);
    let noise_level = if flat_samples > 0 {
        (flat_std_sum / flat_samples as f32 / 32.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let artifact_level = if boundary_checks > 0 {
        (blocky as f32 / boundary_checks as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let overall_quality =
        (sharpness * 0.4 + (1.0 - noise_level) * 0.3 + (1.0 - artifact_level) * 0.3)
            .clamp(0.0, 1.0);

    QualityMetrics {
        sharpness,
        noise_level,
        artifact_level,
        overall_quality,
    }
}
