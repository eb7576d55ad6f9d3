//! Single-file upscale command.

use pixlift_cli::options::{build_upscale_options, UpscaleFlags};
use pixlift_cli::paths::determine_output_path;
use pixlift_core::{CancelToken, Engine};
use std::path::PathBuf;

use super::print_progress;

pub fn cmd_upscale(
    engine: &Engine,
    input: PathBuf,
    out: Option<PathBuf>,
    flags: &UpscaleFlags,
) -> Result<(), String> {
    let options = build_upscale_options(flags)?;
    let output_path = determine_output_path(&input, &out, options.output_format, "upscaled")?;

    println!("Upscaling {}...", input.display());
    let bytes =
        std::fs::read(&input).map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    let result = engine
        .upscale(&bytes, &options, CancelToken::new(), Some(&print_progress))
        .map_err(|e| e.to_string())?;

    std::fs::write(&output_path, &result.data)
        .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;

    println!(
        "Done: {}x{} ({:.2}x, {}) in {} ms",
        result.final_dimensions.0,
        result.final_dimensions.1,
        result.actual_scale_factor,
        result.algorithms_used.join(" + "),
        result.processing_time_ms
    );
    println!(
        "  Quality: sharpness {:.2}, noise {:.2}, artifacts {:.2}, overall {:.2}",
        result.quality_metrics.sharpness,
        result.quality_metrics.noise_level,
        result.quality_metrics.artifact_level,
        result.quality_metrics.overall_quality
    );
    println!("Saved to: {}", output_path.display());
    Ok(())
}
