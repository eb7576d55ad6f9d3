//! Pixlift Core Library
//!
//! Raster image enhancement engine: content-adaptive upscaling and
//! foreground/background segmentation for producing alpha-masked cutouts.
//!
//! The pipeline is strictly staged per image: decode -> analyze -> plan ->
//! resample + enhance (or segment) -> encode. Each stage takes ownership of
//! its input buffer and hands an owned buffer forward; no stage keeps state
//! across calls. Memory use is bounded by an injected [`ResourceBudget`]
//! enforced by the [`governor`] at every tile boundary.

pub mod analysis;
pub mod buffer;
pub mod config;
pub mod decoders;
pub mod engine;
pub mod enhance;
pub mod error;
pub mod exporters;
pub mod governor;
pub mod metrics;
pub mod models;
pub mod planner;
pub mod resample;
pub mod segment;

// Re-export commonly used types
pub use buffer::{Mask, RasterBuffer};
pub use config::{load_tuning, set_verbose, TuningConfig};
pub use engine::{CutoutResult, Engine, UpscaleResult};
pub use error::PixliftError;
pub use governor::{CancelToken, Governor, ResourceBudget};
pub use models::{
    ContentAnalysis, ContentType, CutoutOptions, OutputFormat, ProcessingPlan, QualityMetrics,
    ScaleAlgorithm, UpscaleOptions,
};
