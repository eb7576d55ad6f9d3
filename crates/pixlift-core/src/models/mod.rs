//! Data models for pixlift
//!
//! Option records, analysis and plan outputs, and result records shared
//! between the engine and its callers.

mod analysis;
mod options;
mod plan;
mod results;

pub use analysis::{ContentAnalysis, ContentType};
pub use options::{CutoutOptions, OutputFormat, ScaleAlgorithm, UpscaleOptions};
pub use plan::ProcessingPlan;
pub use results::QualityMetrics;
