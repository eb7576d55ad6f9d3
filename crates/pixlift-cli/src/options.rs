//! Builders translating CLI flags into engine option records.

use pixlift_core::{CutoutOptions, OutputFormat, ScaleAlgorithm, UpscaleOptions};

/// Flags accepted by the upscale and batch commands.
#[derive(Debug, Clone)]
pub struct UpscaleFlags {
    pub scale: f32,
    pub algorithm: Option<String>,
    pub secondary: Option<String>,
    pub no_hybrid: bool,
    pub no_details: bool,
    pub denoise: bool,
    pub sharpen: u8,
    pub colors: bool,
    pub format: String,
    pub quality: u8,
    pub max_dimension: Option<u32>,
}

pub fn build_upscale_options(flags: &UpscaleFlags) -> Result<UpscaleOptions, String> {
    let algorithm = parse_algorithm(flags.algorithm.as_deref())?;
    let secondary = parse_algorithm(flags.secondary.as_deref())?;
    let output_format: OutputFormat = flags.format.parse()?;

    if flags.sharpen > 100 {
        return Err(format!("--sharpen must be 0-100, got {}", flags.sharpen));
    }

    Ok(UpscaleOptions {
        scale_factor: flags.scale,
        algorithm,
        secondary,
        hybrid_mode: !flags.no_hybrid,
        enhance_details: !flags.no_details,
        reduce_noise: flags.denoise,
        sharpen_amount: flags.sharpen,
        enhance_colors: flags.colors,
        output_format,
        quality: flags.quality.clamp(1, 100),
        max_output_dimension: flags.max_dimension,
    })
}

pub fn build_cutout_options(
    sensitivity: u8,
    no_feather: bool,
    format: &str,
    quality: u8,
) -> Result<CutoutOptions, String> {
    if sensitivity > 100 {
        return Err(format!("--sensitivity must be 0-100, got {}", sensitivity));
    }
    Ok(CutoutOptions {
        sensitivity,
        feather_edges: !no_feather,
        output_format: format.parse()?,
        quality: quality.clamp(1, 100),
    })
}

fn parse_algorithm(name: Option<&str>) -> Result<Option<ScaleAlgorithm>, String> {
    match name {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|e: String| {
            let known: Vec<&str> = ScaleAlgorithm::all().iter().map(|a| a.name()).collect();
            format!("{} (expected one of: {})", e, known.join(", "))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> UpscaleFlags {
        UpscaleFlags {
            scale: 2.0,
            algorithm: None,
            secondary: None,
            no_hybrid: false,
            no_details: false,
            denoise: false,
            sharpen: 30,
            colors: false,
            format: "png".to_string(),
            quality: 90,
            max_dimension: None,
        }
    }

    #[test]
    fn defaults_build_cleanly() {
        let options = build_upscale_options(&flags()).unwrap();
        assert!(options.hybrid_mode);
        assert_eq!(options.output_format, OutputFormat::Png);
    }

    #[test]
    fn algorithm_names_are_validated() {
        let mut f = flags();
        f.algorithm = Some("lanczos3".to_string());
        assert_eq!(
            build_upscale_options(&f).unwrap().algorithm,
            Some(ScaleAlgorithm::Lanczos3)
        );

        f.algorithm = Some("esrgan".to_string());
        let err = build_upscale_options(&f).unwrap_err();
        assert!(err.contains("expected one of"));
    }

    #[test]
    fn sharpen_range_is_enforced() {
        let mut f = flags();
        f.sharpen = 150;
        assert!(build_upscale_options(&f).is_err());
    }

    #[test]
    fn cutout_sensitivity_is_enforced() {
        assert!(build_cutout_options(101, false, "png", 90).is_err());
        let options = build_cutout_options(70, true, "webp", 90).unwrap();
        assert_eq!(options.sensitivity, 70);
        assert!(!options.feather_edges);
    }
}
