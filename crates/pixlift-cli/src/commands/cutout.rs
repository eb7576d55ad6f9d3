//! Single-file background cutout command.

use pixlift_cli::options::build_cutout_options;
use pixlift_cli::paths::determine_output_path;
use pixlift_core::{CancelToken, Engine};
use std::path::PathBuf;

use super::print_progress;

pub fn cmd_cutout(
    engine: &Engine,
    input: PathBuf,
    out: Option<PathBuf>,
    sensitivity: u8,
    no_feather: bool,
    format: &str,
    quality: u8,
) -> Result<(), String> {
    let options = build_cutout_options(sensitivity, no_feather, format, quality)?;
    let output_path = determine_output_path(&input, &out, options.output_format, "cutout")?;

    println!("Removing background from {}...", input.display());
    let bytes =
        std::fs::read(&input).map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    let result = engine
        .cutout(&bytes, &options, CancelToken::new(), Some(&print_progress))
        .map_err(|e| e.to_string())?;

    std::fs::write(&output_path, &result.data)
        .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;

    println!(
        "Done: {}x{} ({}) in {} ms",
        result.dimensions.0,
        result.dimensions.1,
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
