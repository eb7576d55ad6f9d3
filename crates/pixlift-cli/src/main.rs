use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{cmd_analyze, cmd_batch, cmd_cutout, cmd_upscale};
use pixlift_cli::options::UpscaleFlags;

#[derive(Parser)]
#[command(name = "pixlift")]
#[command(version, about = "Content-adaptive image upscaling and background cutout", long_about = None)]
struct Cli {
    /// Print per-stage progress and diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory to search for a pixlift.yml tuning file
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upscale an image with content-adaptive resampling
    Upscale {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file or directory
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Scale factor (clamped to 1.1-4.0)
        #[arg(short, long, value_name = "FLOAT", default_value = "2.0")]
        scale: f32,

        /// Primary algorithm; omit to let content analysis choose
        #[arg(short, long, value_name = "NAME")]
        algorithm: Option<String>,

        /// Secondary refinement algorithm
        #[arg(long, value_name = "NAME")]
        secondary: Option<String>,

        /// Disable the secondary refinement pass
        #[arg(long)]
        no_hybrid: bool,

        /// Disable the multi-scale detail boost
        #[arg(long)]
        no_details: bool,

        /// Enable bilateral noise reduction
        #[arg(long)]
        denoise: bool,

        /// Unsharp-mask strength (0-100, 0 disables)
        #[arg(long, value_name = "N", default_value = "30")]
        sharpen: u8,

        /// Enable saturation and contrast boost
        #[arg(long)]
        colors: bool,

        /// Output format: png, webp, or jpeg
        #[arg(short, long, value_name = "FORMAT", default_value = "png")]
        format: String,

        /// Encoder quality for lossy formats (1-100)
        #[arg(short, long, value_name = "N", default_value = "90")]
        quality: u8,

        /// Hard cap on the longer output edge
        #[arg(long, value_name = "PIXELS")]
        max_dimension: Option<u32>,
    },

    /// Remove the background, producing an alpha-masked cutout
    Cutout {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file or directory
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Segmentation sensitivity (0-100)
        #[arg(short, long, value_name = "N", default_value = "50")]
        sensitivity: u8,

        /// Produce a hard edge instead of a feathered one
        #[arg(long)]
        no_feather: bool,

        /// Output format: png, webp, or jpeg
        #[arg(short, long, value_name = "FORMAT", default_value = "png")]
        format: String,

        /// Encoder quality for lossy formats (1-100)
        #[arg(short, long, value_name = "N", default_value = "90")]
        quality: u8,
    },

    /// Analyze an image and report content statistics
    Analyze {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upscale multiple files or directories with shared settings
    Batch {
        /// Input files or directories
        #[arg(value_name = "INPUTS")]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Scale factor (clamped to 1.1-4.0)
        #[arg(short, long, value_name = "FLOAT", default_value = "2.0")]
        scale: f32,

        /// Primary algorithm; omit to let content analysis choose
        #[arg(short, long, value_name = "NAME")]
        algorithm: Option<String>,

        /// Output format: png, webp, or jpeg
        #[arg(short, long, value_name = "FORMAT", default_value = "png")]
        format: String,

        /// Encoder quality for lossy formats (1-100)
        #[arg(short, long, value_name = "N", default_value = "90")]
        quality: u8,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    pixlift_core::set_verbose(cli.verbose);

    let engine = commands::load_engine(cli.config_dir.as_deref());

    let result = match cli.command {
        Commands::Upscale {
            input,
            out,
            scale,
            algorithm,
            secondary,
            no_hybrid,
            no_details,
            denoise,
            sharpen,
            colors,
            format,
            quality,
            max_dimension,
        } => {
            let flags = UpscaleFlags {
                scale,
                algorithm,
                secondary,
                no_hybrid,
                no_details,
                denoise,
                sharpen,
                colors,
                format,
                quality,
                max_dimension,
            };
            cmd_upscale(&engine, input, out, &flags)
        }

        Commands::Cutout {
            input,
            out,
            sensitivity,
            no_feather,
            format,
            quality,
        } => cmd_cutout(&engine, input, out, sensitivity, no_feather, &format, quality),

        Commands::Analyze { input, json } => cmd_analyze(&engine, input, json),

        Commands::Batch {
            inputs,
            out,
            recursive,
            scale,
            algorithm,
            format,
            quality,
            threads,
        } => {
            let flags = UpscaleFlags {
                scale,
                algorithm,
                secondary: None,
                no_hybrid: false,
                no_details: false,
                denoise: false,
                sharpen: 30,
                colors: false,
                format,
                quality,
                max_dimension: None,
            };
            cmd_batch(&engine, inputs, out, recursive, threads, &flags)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
