//! Shared utilities for pixlift-cli
//!
//! Option building, output path derivation, and input expansion, kept out
//! of main.rs so the command implementations stay small.

pub mod options;
pub mod paths;

pub use options::{build_cutout_options, build_upscale_options};
pub use paths::{determine_output_path, expand_inputs, SUPPORTED_EXTENSIONS};
