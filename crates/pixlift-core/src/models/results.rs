//! Informational quality metrics

use serde::{Deserialize, Serialize};

/// Best-effort quality measurement of an output buffer.
///
/// Informational only: nothing in the pipeline branches on these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Mean gradient magnitude, normalized to [0, 1].
    pub sharpness: f32,

    /// Residual noise estimate in flat regions, [0, 1].
    pub noise_level: f32,

    /// 8x8 blockiness estimate, [0, 1].
    pub artifact_level: f32,

    /// Weighted combination of the above, [0, 1].
    pub overall_quality: f32,
}
