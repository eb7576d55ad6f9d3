//! Content analysis output

use serde::{Deserialize, Serialize};

/// Broad classification of image content, used to pick algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Continuous-tone photographic content.
    Photo,
    /// Flat-shaded illustration or line art with a small palette.
    Art,
    /// Predominantly high-contrast glyph edges.
    Text,
    /// None of the above dominates.
    Mixed,
}

impl ContentType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Art => "art",
            Self::Text => "text",
            Self::Mixed => "mixed",
        }
    }
}

/// Aggregated statistics from a strided scan of the input buffer.
///
/// Immutable once produced; consumed only by the planner and the enhancement
/// pipeline. All ratios are in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub content_type: ContentType,

    /// Estimated noise level from local variance in low-gradient regions.
    pub noise_level: f32,

    /// Fraction of sampled pixels sitting on a significant gradient.
    pub edge_density: f32,

    /// Fraction of sampled pixels passing the chrominance skin-tone test.
    pub skin_tone_ratio: f32,

    /// JPEG-style 8x8 blockiness indicator.
    pub compression_artifact_score: f32,
}
