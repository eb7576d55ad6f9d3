//! Processing planner
//!
//! Turns the content analysis and the user's requested options into a
//! concrete, budget-safe execution plan. Pure policy: deterministic, never
//! fails, only clamps.

use crate::config::TuningConfig;
use crate::governor::ResourceBudget;
use crate::models::{ContentAnalysis, ContentType, ProcessingPlan, ScaleAlgorithm, UpscaleOptions};

/// Requested scale factors are clamped into this range before anything else.
pub const MIN_SCALE: f32 = 1.1;
pub const MAX_SCALE: f32 = 4.0;

/// Artifact score above which photographic content takes the smoothing path.
const ARTIFACT_SMOOTH_THRESHOLD: f32 = 0.4;

/// Scale factor above which photographic content takes the two-pass
/// residual path.
const RESIDUAL_SCALE_THRESHOLD: f32 = 2.0;

/// Derive the execution plan for one upscale invocation.
pub fn plan(
    original: (u32, u32),
    analysis: &ContentAnalysis,
    options: &UpscaleOptions,
    budget: &ResourceBudget,
    tuning: &TuningConfig,
) -> ProcessingPlan {
    let (src_w, src_h) = original;
    let mut scale = options.scale_factor.clamp(MIN_SCALE, MAX_SCALE);

    // Shrink proportionally until the target fits the pixel ceiling. The
    // sqrt ratio lands exactly on the ceiling, so one adjustment suffices;
    // the extra iteration only mops up rounding.
    for _ in 0..2 {
        let target = target_pixels(src_w, src_h, scale);
        if target > budget.max_working_pixels {
            scale *= (budget.max_working_pixels as f32 / target as f32).sqrt();
        }
    }
    if let Some(max_dim) = options.max_output_dimension {
        let longer = src_w.max(src_h) as f32;
        if longer * scale > max_dim as f32 {
            scale = max_dim as f32 / longer;
        }
    }
    let working_dimensions = (
        ((src_w as f32 * scale) as u32).max(1),
        ((src_h as f32 * scale) as u32).max(1),
    );

    let primary = options
        .algorithm
        .unwrap_or_else(|| select_primary(analysis, scale));
    let secondary = if options.hybrid_mode {
        Some(options.secondary.unwrap_or(ScaleAlgorithm::Smooth))
    } else {
        None
    };

    let working_pixels = working_dimensions.0 as u64 * working_dimensions.1 as u64;
    let chunk_size = if working_pixels > tuning.chunk_threshold_pixels {
        tuning.tile_edge
    } else {
        0
    };

    let mut algorithms_used = vec![primary.name().to_string()];
    if let Some(s) = secondary {
        algorithms_used.push(format!("{}-refine", s.name()));
    }

    ProcessingPlan {
        scale_factor: scale,
        working_dimensions,
        chunk_size,
        primary,
        secondary,
        algorithms_used,
    }
}

/// Content-adaptive algorithm choice, applied when the user did not pick one.
fn select_primary(analysis: &ContentAnalysis, scale: f32) -> ScaleAlgorithm {
    match analysis.content_type {
        ContentType::Art => ScaleAlgorithm::LineArt,
        ContentType::Text => ScaleAlgorithm::Lanczos3,
        ContentType::Photo => {
            if analysis.compression_artifact_score > ARTIFACT_SMOOTH_THRESHOLD {
                ScaleAlgorithm::Smooth
            } else if scale > RESIDUAL_SCALE_THRESHOLD {
                ScaleAlgorithm::Residual
            } else {
                ScaleAlgorithm::Bicubic
            }
        }
        ContentType::Mixed => ScaleAlgorithm::Bicubic,
    }
}

fn target_pixels(w: u32, h: u32, scale: f32) -> u64 {
    ((w as f32 * scale) as u64).max(1) * ((h as f32 * scale) as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo_analysis() -> ContentAnalysis {
        ContentAnalysis {
            content_type: ContentType::Photo,
            noise_level: 0.1,
            edge_density: 0.2,
            skin_tone_ratio: 0.0,
            compression_artifact_score: 0.05,
        }
    }

    #[test]
    fn scale_is_clamped_into_range() {
        let budget = ResourceBudget::default();
        let tuning = TuningConfig::default();
        let low = plan(
            (100, 100),
            &photo_analysis(),
            &UpscaleOptions {
                scale_factor: 0.5,
                ..Default::default()
            },
            &budget,
            &tuning,
        );
        assert!((low.scale_factor - MIN_SCALE).abs() < 1e-6);

        let high = plan(
            (100, 100),
            &photo_analysis(),
            &UpscaleOptions {
                scale_factor: 9.0,
                ..Default::default()
            },
            &budget,
            &tuning,
        );
        assert!(high.scale_factor <= MAX_SCALE);
    }

    #[test]
    fn working_dimensions_never_exceed_ceiling() {
        let budget = ResourceBudget::default();
        let tuning = TuningConfig::default();
        for &(w, h, s) in &[
            (4000u32, 3000u32, 4.0f32),
            (8000, 8000, 2.0),
            (1920, 1080, 4.0),
            (100, 100, 2.0),
        ] {
            let p = plan(
                (w, h),
                &photo_analysis(),
                &UpscaleOptions {
                    scale_factor: s,
                    ..Default::default()
                },
                &budget,
                &tuning,
            );
            assert!(
                p.working_pixels() <= budget.max_working_pixels,
                "{}x{} at {} produced {} pixels",
                w,
                h,
                s,
                p.working_pixels()
            );
        }
    }

    #[test]
    fn user_algorithm_override_is_honored() {
        let p = plan(
            (100, 100),
            &photo_analysis(),
            &UpscaleOptions {
                algorithm: Some(ScaleAlgorithm::Lanczos4),
                ..Default::default()
            },
            &ResourceBudget::default(),
            &TuningConfig::default(),
        );
        assert_eq!(p.primary, ScaleAlgorithm::Lanczos4);
    }

    #[test]
    fn content_type_drives_selection() {
        let mut a = photo_analysis();
        a.content_type = ContentType::Art;
        let p = plan((100, 100), &a, &UpscaleOptions::default(), &ResourceBudget::default(), &TuningConfig::default());
        assert_eq!(p.primary, ScaleAlgorithm::LineArt);

        a.content_type = ContentType::Text;
        let p = plan((100, 100), &a, &UpscaleOptions::default(), &ResourceBudget::default(), &TuningConfig::default());
        assert_eq!(p.primary, ScaleAlgorithm::Lanczos3);

        a.content_type = ContentType::Photo;
        a.compression_artifact_score = 0.6;
        let p = plan((100, 100), &a, &UpscaleOptions::default(), &ResourceBudget::default(), &TuningConfig::default());
        assert_eq!(p.primary, ScaleAlgorithm::Smooth);

        a.compression_artifact_score = 0.05;
        let p = plan(
            (100, 100),
            &a,
            &UpscaleOptions {
                scale_factor: 3.0,
                ..Default::default()
            },
            &ResourceBudget::default(),
            &TuningConfig::default(),
        );
        assert_eq!(p.primary, ScaleAlgorithm::Residual);
    }

    #[test]
    fn hybrid_mode_controls_secondary() {
        let p = plan(
            (100, 100),
            &photo_analysis(),
            &UpscaleOptions {
                hybrid_mode: false,
                ..Default::default()
            },
            &ResourceBudget::default(),
            &TuningConfig::default(),
        );
        assert!(p.secondary.is_none());
        assert_eq!(p.algorithms_used.len(), 1);
    }

    #[test]
    fn chunking_enabled_above_threshold() {
        let tuning = TuningConfig::default();
        let small = plan(
            (100, 100),
            &photo_analysis(),
            &UpscaleOptions::default(),
            &ResourceBudget::default(),
            &tuning,
        );
        assert_eq!(small.chunk_size, 0);

        let large = plan(
            (800, 600),
            &photo_analysis(),
            &UpscaleOptions::default(),
            &ResourceBudget::default(),
            &tuning,
        );
        assert_eq!(large.chunk_size, tuning.tile_edge);
    }

    #[test]
    fn max_output_dimension_caps_the_longer_edge() {
        let p = plan(
            (400, 200),
            &photo_analysis(),
            &UpscaleOptions {
                scale_factor: 4.0,
                max_output_dimension: Some(600),
                ..Default::default()
            },
            &ResourceBudget::default(),
            &TuningConfig::default(),
        );
        assert!(p.working_dimensions.0 <= 600 && p.working_dimensions.1 <= 600);
    }
}
