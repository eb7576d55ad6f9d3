//! Processing plan

use super::ScaleAlgorithm;
use serde::{Deserialize, Serialize};

/// Concrete execution plan derived from the content analysis, the user
/// options, and the resource budget. One plan per invocation; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingPlan {
    /// Effective scale factor after clamping and budget shrink.
    pub scale_factor: f32,

    /// Output dimensions. Never exceeds the budget's pixel ceiling.
    pub working_dimensions: (u32, u32),

    /// Tile edge length in pixels; 0 disables tiled execution.
    pub chunk_size: u32,

    pub primary: ScaleAlgorithm,

    /// Refinement pass; `None` when hybrid mode is disabled.
    pub secondary: Option<ScaleAlgorithm>,

    /// Human-readable record of every algorithm the plan will run, in order.
    pub algorithms_used: Vec<String>,
}

impl ProcessingPlan {
    pub fn working_pixels(&self) -> u64 {
        self.working_dimensions.0 as u64 * self.working_dimensions.1 as u64
    }
}
