//! Engine configuration and tuning constants
//!
//! Holds the named tuning constants that drive chunking, segmentation, and
//! feathering, with optional overrides loaded from a `pixlift.yml` file next
//! to the invocation. Also hosts the global verbose flag used for debug
//! output across the crate.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names searched on disk.
const CONFIG_FILENAMES: &[&str] = &["pixlift.yml", "pixlift.yaml"];

/// Tuning constants for the processing pipeline.
///
/// Every field has a production default; a YAML file can override any subset.
/// These are the knobs the engine would otherwise hard-code: tile geometry,
/// segmentation parameters, and feathering radii.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Edge length of one processing tile, in pixels.
    pub tile_edge: u32,

    /// Overlap between adjacent tiles, in pixels. Bounds the source window
    /// each tile reads so tile boundaries cannot introduce seam artifacts.
    pub tile_overlap: u32,

    /// Working pixel count above which tiled execution is enabled.
    pub chunk_threshold_pixels: u64,

    /// Number of k-means clusters for background color analysis.
    pub kmeans_clusters: usize,

    /// Maximum k-means refinement rounds.
    pub kmeans_rounds: usize,

    /// Early-exit threshold for centroid movement, in 8-bit color units.
    pub kmeans_epsilon: f32,

    /// Cap on the number of pixels sampled for clustering.
    pub kmeans_sample_cap: usize,

    /// Base edge-magnitude threshold (0..1) the border flood fill will not
    /// cross. Scaled by the user sensitivity setting.
    pub flood_edge_threshold: f32,

    /// Radius of the morphological closing/opening kernels.
    pub morph_radius: u32,

    /// Iterations of guided mask smoothing.
    pub guided_iterations: usize,

    /// Feathering radius around the foreground boundary, in pixels.
    pub feather_radius: u32,

    /// Minimum image edge below which morphological and guided stages are
    /// skipped instead of failing.
    pub min_kernel_footprint: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            tile_edge: 256,
            tile_overlap: 32,
            chunk_threshold_pixels: 262_144,
            kmeans_clusters: 5,
            kmeans_rounds: 15,
            kmeans_epsilon: 0.5,
            kmeans_sample_cap: 10_000,
            flood_edge_threshold: 0.15,
            morph_radius: 2,
            guided_iterations: 3,
            feather_radius: 8,
            min_kernel_footprint: 7,
        }
    }
}

/// Loaded configuration together with its source path and any warnings.
pub struct TuningConfigHandle {
    pub config: TuningConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load tuning overrides from the given directory (or the current directory).
///
/// Missing files are not an error: the defaults are returned. A file that
/// exists but fails to parse is reported as a warning and ignored, so a
/// broken config can never take the engine down.
pub fn load_tuning(dir: Option<&Path>) -> TuningConfigHandle {
    let base = dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    let mut warnings = Vec::new();

    for name in CONFIG_FILENAMES {
        let candidate = base.join(name);
        if !candidate.is_file() {
            continue;
        }
        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<TuningConfig>(&contents) {
                Ok(config) => {
                    verbose_println!("[config] loaded tuning from {}", candidate.display());
                    return TuningConfigHandle {
                        config,
                        source: Some(candidate),
                        warnings,
                    };
                }
                Err(e) => {
                    warnings.push(format!("ignoring {}: {}", candidate.display(), e));
                }
            },
            Err(e) => {
                warnings.push(format!("could not read {}: {}", candidate.display(), e));
            }
        }
    }

    TuningConfigHandle {
        config: TuningConfig::default(),
        source: None,
        warnings,
    }
}
