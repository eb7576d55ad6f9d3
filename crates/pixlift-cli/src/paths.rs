//! Input file handling and path utilities.

use pixlift_core::OutputFormat;
use std::path::{Path, PathBuf};

/// Supported image extensions for input expansion.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Determine the output path for one processed image.
///
/// If `out` is a directory the input filename is reused there with the
/// given suffix and the format's extension; if it is a file path it is used
/// as-is. Without `out`, the file lands next to the input.
pub fn determine_output_path(
    input: &Path,
    out: &Option<PathBuf>,
    format: OutputFormat,
    suffix: &str,
) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .ok_or("Invalid input filename")?
        .to_string_lossy();
    let filename = format!("{}_{}.{}", stem, suffix, format.extension());

    if let Some(out_path) = out {
        if out_path.is_dir() {
            Ok(out_path.join(filename))
        } else {
            Ok(out_path.clone())
        }
    } else {
        let parent = input.parent().unwrap_or(Path::new("."));
        Ok(parent.join(filename))
    }
}

/// Expand files and directories into the list of images to process.
///
/// Explicit file arguments are taken as-is; directories contribute every
/// file with a supported extension, descending into subdirectories only
/// when `recursive` is set. The result is sorted so batch runs are
/// reproducible.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = Vec::new();

    for input in inputs {
        if input.is_dir() {
            pending.push(input.clone());
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(format!("no such input: {}", input.display()));
        }
    }

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| format!("cannot scan {}: {}", dir.display(), e))?;
        for entry in entries {
            let path = entry
                .map_err(|e| format!("cannot scan {}: {}", dir.display(), e))?
                .path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if has_supported_extension(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_next_to_input_by_default() {
        let path =
            determine_output_path(Path::new("/tmp/photo.jpg"), &None, OutputFormat::Png, "2x")
                .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/photo_2x.png"));
    }

    #[test]
    fn explicit_file_path_wins() {
        let out = Some(PathBuf::from("/tmp/custom.webp"));
        let path =
            determine_output_path(Path::new("a.png"), &out, OutputFormat::Webp, "cutout").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.webp"));
    }

    #[test]
    fn output_directory_reuses_the_input_stem() {
        let dir = tempfile::tempdir().unwrap();
        let out = Some(dir.path().to_path_buf());
        let path =
            determine_output_path(Path::new("shot.jpeg"), &out, OutputFormat::Jpeg, "2x").unwrap();
        assert_eq!(path, dir.path().join("shot_2x.jpg"));
    }

    #[test]
    fn expansion_filters_by_extension_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let files = expand_inputs(&[dir.path().to_path_buf()], false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn subdirectories_require_the_recursive_flag() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("top.png"), b"x").unwrap();
        std::fs::write(sub.join("deep.png"), b"x").unwrap();

        let flat = expand_inputs(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(flat.len(), 1);
        let deep = expand_inputs(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = expand_inputs(&[PathBuf::from("/nonexistent/xyz.png")], false).unwrap_err();
        assert!(err.contains("no such input"));
    }
}
