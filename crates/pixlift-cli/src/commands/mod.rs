//! Command implementations for the pixlift CLI.

mod analyze;
mod batch;
mod cutout;
mod upscale;

pub use analyze::cmd_analyze;
pub use batch::cmd_batch;
pub use cutout::cmd_cutout;
pub use upscale::cmd_upscale;

use pixlift_core::{Engine, ResourceBudget};
use std::path::Path;

/// Build the engine from an optional tuning directory. Config problems are
/// warnings, never fatal.
pub fn load_engine(config_dir: Option<&Path>) -> Engine {
    let handle = pixlift_core::load_tuning(config_dir);
    for warning in &handle.warnings {
        eprintln!("Warning: {}", warning);
    }
    Engine::new(handle.config, ResourceBudget::default())
}

/// Stage-boundary progress printer used by the single-file commands.
pub(crate) fn print_progress(percent: u8, stage: &str) {
    println!("  [{:>3}%] {}", percent, stage);
}
