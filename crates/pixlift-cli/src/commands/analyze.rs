//! Content analysis command.

use pixlift_core::{Engine, UpscaleOptions};
use std::path::PathBuf;

pub fn cmd_analyze(engine: &Engine, input: PathBuf, json: bool) -> Result<(), String> {
    let bytes =
        std::fs::read(&input).map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    let (stats, (width, height)) = engine.analyze_bytes(&bytes).map_err(|e| e.to_string())?;
    // Preview what the planner would do with default options.
    let plan = engine
        .plan_upscale(&bytes, &UpscaleOptions::default())
        .map_err(|e| e.to_string())?;

    if json {
        let report = serde_json::json!({
            "input": input.display().to_string(),
            "width": width,
            "height": height,
            "analysis": stats,
            "default_plan": plan,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize report: {}", e))?
        );
        return Ok(());
    }

    println!("Analysis of {}:", input.display());
    println!("  Dimensions:   {}x{}", width, height);
    println!("  Content type: {}", stats.content_type.name());
    println!("  Edge density: {:.3}", stats.edge_density);
    println!("  Noise level:  {:.3}", stats.noise_level);
    println!("  Artifacts:    {:.3}", stats.compression_artifact_score);
    println!("  Skin tones:   {:.3}", stats.skin_tone_ratio);
    println!(
        "Default plan: {:.2}x -> {}x{} via {}",
        plan.scale_factor,
        plan.working_dimensions.0,
        plan.working_dimensions.1,
        plan.algorithms_used.join(" + ")
    );
    Ok(())
}
