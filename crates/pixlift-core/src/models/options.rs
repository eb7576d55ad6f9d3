//! User-facing option records
//!
//! Mirrors the configuration surface exposed to hosts: scale, algorithm
//! choice, enhancement toggles, segmentation sensitivity, and output
//! encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resampling/enhancement strategy. Closed set dispatched through a single
/// kernel abstraction; exhaustive matches keep algorithm selection honest at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleAlgorithm {
    /// Cubic convolution, a = -0.5. Good general-purpose default.
    Bicubic,
    /// Lanczos windowed sinc, 3 lobes (6x6 neighborhood).
    Lanczos3,
    /// Lanczos windowed sinc, 4 lobes (8x8 neighborhood).
    Lanczos4,
    /// Nearest-neighbor with selective smoothing; preserves line art.
    LineArt,
    /// Two-pass residual path with an interleaved detail boost, for large
    /// factors on photographic content.
    Residual,
    /// Mitchell-Netravali (B = C = 1/3); softer kernel that suppresses
    /// ringing and compression artifacts.
    Smooth,
}

impl ScaleAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bicubic => "bicubic",
            Self::Lanczos3 => "lanczos3",
            Self::Lanczos4 => "lanczos4",
            Self::LineArt => "line-art",
            Self::Residual => "residual",
            Self::Smooth => "smooth",
        }
    }

    pub fn all() -> &'static [ScaleAlgorithm] {
        &[
            Self::Bicubic,
            Self::Lanczos3,
            Self::Lanczos4,
            Self::LineArt,
            Self::Residual,
            Self::Smooth,
        ]
    }
}

impl fmt::Display for ScaleAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bicubic" => Ok(Self::Bicubic),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            "lanczos4" => Ok(Self::Lanczos4),
            "line-art" | "lineart" | "nearest" => Ok(Self::LineArt),
            "residual" => Ok(Self::Residual),
            "smooth" => Ok(Self::Smooth),
            other => Err(format!("unknown algorithm: {}", other)),
        }
    }
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Webp,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Jpeg => "jpg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Options for the upscaling path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpscaleOptions {
    /// Requested scale factor. Clamped by the planner to [1.1, 4.0] and
    /// shrunk further if the output would exceed the pixel budget.
    pub scale_factor: f32,

    /// Explicit primary algorithm. `None` lets the planner choose from the
    /// content analysis.
    pub algorithm: Option<ScaleAlgorithm>,

    /// Explicit secondary (refinement) algorithm.
    pub secondary: Option<ScaleAlgorithm>,

    /// When false, no secondary refinement pass is planned.
    pub hybrid_mode: bool,

    /// Multi-scale detail boost after resampling.
    pub enhance_details: bool,

    /// Bilateral noise reduction after resampling.
    pub reduce_noise: bool,

    /// Unsharp-mask strength, 0-100. Zero disables sharpening.
    pub sharpen_amount: u8,

    /// Saturation and midtone-contrast boost.
    pub enhance_colors: bool,

    pub output_format: OutputFormat,

    /// Encoder quality for lossy formats, 0-100.
    pub quality: u8,

    /// Optional hard cap on the longer output edge, applied on top of the
    /// pixel budget.
    pub max_output_dimension: Option<u32>,
}

impl Default for UpscaleOptions {
    fn default() -> Self {
        Self {
            scale_factor: 2.0,
            algorithm: None,
            secondary: None,
            hybrid_mode: true,
            enhance_details: true,
            reduce_noise: false,
            sharpen_amount: 30,
            enhance_colors: false,
            output_format: OutputFormat::Png,
            quality: 90,
            max_output_dimension: None,
        }
    }
}

/// Options for the background cutout path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoutOptions {
    /// Segmentation sensitivity, 0-100. Higher values let the background
    /// flood cross stronger edges.
    pub sensitivity: u8,

    /// Feather the mask boundary instead of producing a hard cutout.
    pub feather_edges: bool,

    pub output_format: OutputFormat,

    /// Encoder quality for lossy formats, 0-100.
    pub quality: u8,
}

impl Default for CutoutOptions {
    fn default() -> Self {
        Self {
            sensitivity: 50,
            feather_edges: true,
            output_format: OutputFormat::Png,
            quality: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for alg in ScaleAlgorithm::all() {
            assert_eq!(alg.name().parse::<ScaleAlgorithm>().unwrap(), *alg);
        }
    }

    #[test]
    fn algorithm_aliases() {
        assert_eq!("lanczos".parse::<ScaleAlgorithm>().unwrap(), ScaleAlgorithm::Lanczos3);
        assert_eq!("nearest".parse::<ScaleAlgorithm>().unwrap(), ScaleAlgorithm::LineArt);
        assert!("esrgan".parse::<ScaleAlgorithm>().is_err());
    }

    #[test]
    fn format_extensions() {
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }
}
