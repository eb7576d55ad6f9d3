//! Parallel batch upscale command.

use pixlift_cli::options::{build_upscale_options, UpscaleFlags};
use pixlift_cli::paths::{determine_output_path, expand_inputs};
use pixlift_core::{CancelToken, Engine};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn cmd_batch(
    engine: &Engine,
    inputs: Vec<PathBuf>,
    out: Option<PathBuf>,
    recursive: bool,
    threads: Option<usize>,
    flags: &UpscaleFlags,
) -> Result<(), String> {
    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }
    let options = build_upscale_options(flags)?;

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("Using {} threads for parallel processing", num_threads);
    }

    if let Some(dir) = &out {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create output directory: {}", e))?;
        }
    }

    let files = expand_inputs(&inputs, recursive)?;
    if files.is_empty() {
        return Err("No supported image files found".to_string());
    }

    println!("Processing {} files in parallel...\n", files.len());
    let processed_count = AtomicUsize::new(0);
    let total_files = files.len();

    let results: Vec<Result<PathBuf, String>> = files
        .par_iter()
        .map(|input| {
            let bytes = std::fs::read(input)
                .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

            let result = engine
                .upscale(&bytes, &options, CancelToken::new(), None)
                .map_err(|e| e.to_string())?;

            let output_path =
                determine_output_path(input, &out, options.output_format, "upscaled")?;
            std::fs::write(&output_path, &result.data)
                .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] {} -> {} ({}x{})",
                count,
                total_files,
                input.display(),
                output_path.display(),
                result.final_dimensions.0,
                result.final_dimensions.1
            );

            Ok(output_path)
        })
        .collect();

    let mut success_count = 0;
    let mut errors: Vec<(PathBuf, String)> = Vec::new();
    for (input, result) in files.iter().zip(results.iter()) {
        match result {
            Ok(_) => success_count += 1,
            Err(e) => errors.push((input.clone(), e.clone())),
        }
    }

    println!("\nBatch complete: {} succeeded, {} failed", success_count, errors.len());
    if !errors.is_empty() {
        for (path, error) in &errors {
            println!("  {}: {}", path.display(), error);
        }
        return Err(format!("{} files failed to process", errors.len()));
    }
    Ok(())
}
