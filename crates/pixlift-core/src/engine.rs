//! Engine orchestration
//!
//! One [`Engine`] holds the tuning constants and resource budget; each call
//! to [`Engine::upscale`] or [`Engine::cutout`] runs the full staged
//! pipeline on one byte stream with its own governor. Progress is reported
//! through an optional callback at stage boundaries, and a [`CancelToken`]
//! aborts between tiles and stages.

use std::time::Instant;

use crate::analysis;
use crate::buffer::RasterBuffer;
use crate::config::TuningConfig;
use crate::decoders;
use crate::enhance;
use crate::error::PixliftError;
use crate::exporters;
use crate::governor::{CancelToken, Governor, ResourceBudget};
use crate::metrics;
use crate::models::{
    ContentAnalysis, CutoutOptions, ProcessingPlan, QualityMetrics, ScaleAlgorithm, UpscaleOptions,
};
use crate::planner;
use crate::resample;
use crate::segment;

/// Stage-boundary progress callback: percentage in [0, 100] and a short
/// stage label.
pub type ProgressFn<'a> = &'a (dyn Fn(u8, &str) + Sync);

/// Noise level above which the segmentation input gets a joint denoise pass
/// before the mask is computed.
const SEGMENT_DENOISE_THRESHOLD: f32 = 0.5;

/// Completed upscale: encoded bytes plus a record of what was done.
#[derive(Debug)]
pub struct UpscaleResult {
    pub data: Vec<u8>,
    pub final_dimensions: (u32, u32),
    /// Effective scale after clamping and budget shrink; may be below the
    /// requested factor.
    pub actual_scale_factor: f32,
    pub algorithms_used: Vec<String>,
    pub processing_time_ms: u64,
    pub quality_metrics: QualityMetrics,
}

/// Completed background cutout.
#[derive(Debug)]
pub struct CutoutResult {
    pub data: Vec<u8>,
    pub dimensions: (u32, u32),
    /// Segmentation stages that actually ran, in order.
    pub algorithms_used: Vec<String>,
    pub processing_time_ms: u64,
    pub quality_metrics: QualityMetrics,
}

/// Stateless pipeline front end. Cheap to construct; holds no buffers.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    tuning: TuningConfig,
    budget: ResourceBudget,
}

impl Engine {
    pub fn new(tuning: TuningConfig, budget: ResourceBudget) -> Self {
        Self { tuning, budget }
    }

    pub fn budget(&self) -> &ResourceBudget {
        &self.budget
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    /// Decode and analyze without processing. Used by the analyze command
    /// and by hosts that want to preview the planner's choices.
    pub fn analyze_bytes(
        &self,
        bytes: &[u8],
    ) -> Result<(ContentAnalysis, (u32, u32)), PixliftError> {
        let buffer = decoders::decode_bytes(bytes, &self.budget)?;
        let report = analysis::analyze(&buffer);
        Ok((report, buffer.dimensions()))
    }

    /// Plan an upscale without executing it.
    pub fn plan_upscale(
        &self,
        bytes: &[u8],
        options: &UpscaleOptions,
    ) -> Result<ProcessingPlan, PixliftError> {
        let buffer = decoders::decode_bytes(bytes, &self.budget)?;
        let report = analysis::analyze(&buffer);
        Ok(planner::plan(
            buffer.dimensions(),
            &report,
            options,
            &self.budget,
            &self.tuning,
        ))
    }

    /// Full upscale pipeline: decode, analyze, plan, resample, enhance,
    /// encode.
    pub fn upscale(
        &self,
        bytes: &[u8],
        options: &UpscaleOptions,
        cancel: CancelToken,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<UpscaleResult, PixliftError> {
        let started = Instant::now();
        let governor = Governor::new(self.budget.clone(), cancel);

        report(progress, 5, "loading");
        let buffer = decoders::decode_bytes(bytes, &self.budget)?;
        governor.checkpoint()?;

        report(progress, 15, "analyzing");
        let report_stats = analysis::analyze(&buffer);
        governor.checkpoint()?;

        report(progress, 20, "planning");
        let plan = planner::plan(
            buffer.dimensions(),
            &report_stats,
            options,
            &self.budget,
            &self.tuning,
        );
        crate::verbose_println!(
            "plan: {:.2}x -> {}x{} via {}",
            plan.scale_factor,
            plan.working_dimensions.0,
            plan.working_dimensions.1,
            plan.algorithms_used.join(" + ")
        );

        report(progress, 25, "resampling");
        let mut out = resample::resample(&buffer, &plan, &self.tuning, &governor)?;
        drop(buffer);

        report(progress, 70, "enhancing");
        enhance::enhance(&mut out, &report_stats, options, &governor)?;

        report(progress, 85, "measuring");
        let quality_metrics = metrics::measure(&out);
        governor.checkpoint()?;

        report(progress, 90, "encoding");
        let data = exporters::encode(&out, options.output_format, options.quality)?;
        report(progress, 100, "done");

        Ok(UpscaleResult {
            data,
            final_dimensions: out.dimensions(),
            actual_scale_factor: plan.scale_factor,
            algorithms_used: plan.algorithms_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
            quality_metrics,
        })
    }

    /// Full cutout pipeline: decode, segment, apply the mask to alpha,
    /// encode. Images over the segmentation pixel ceiling are segmented at
    /// reduced resolution and the mask is scaled back up.
    pub fn cutout(
        &self,
        bytes: &[u8],
        options: &CutoutOptions,
        cancel: CancelToken,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<CutoutResult, PixliftError> {
        let started = Instant::now();
        let governor = Governor::new(self.budget.clone(), cancel);

        report(progress, 5, "loading");
        let mut buffer = decoders::decode_bytes(bytes, &self.budget)?;
        governor.checkpoint()?;

        report(progress, 15, "analyzing");
        let report_stats = analysis::analyze(&buffer);
        governor.checkpoint()?;

        report(progress, 20, "segmenting");
        let (mask, algorithms_used) =
            self.segment_bounded(&buffer, &report_stats, options, &governor)?;

        report(progress, 80, "compositing");
        mask.apply_alpha(&mut buffer)?;
        governor.checkpoint()?;

        report(progress, 85, "measuring");
        let quality_metrics = metrics::measure(&buffer);
        governor.checkpoint()?;

        report(progress, 90, "encoding");
        let data = exporters::encode(&buffer, options.output_format, options.quality)?;
        report(progress, 100, "done");

        Ok(CutoutResult {
            data,
            dimensions: buffer.dimensions(),
            algorithms_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
            quality_metrics,
        })
    }

    /// Segment within the segmentation pixel ceiling, downscaling first and
    /// rescaling the mask when the image is too large. Also returns the
    /// stage list actually run, in order, for the result record.
    fn segment_bounded(
        &self,
        buffer: &RasterBuffer,
        stats: &ContentAnalysis,
        options: &CutoutOptions,
        governor: &Governor,
    ) -> Result<(crate::buffer::Mask, Vec<String>), PixliftError> {
        let pixels = buffer.pixel_count() as u64;
        let ceiling = self.budget.max_segmentation_pixels;
        let needs_denoise = stats.noise_level > SEGMENT_DENOISE_THRESHOLD;

        let mut algorithms_used = Vec::new();
        if pixels > ceiling {
            algorithms_used.push(format!("{}-downscale", ScaleAlgorithm::Bicubic.name()));
        }
        if needs_denoise {
            algorithms_used.push("guided-denoise".to_string());
        }
        algorithms_used.push("flood-segmentation".to_string());
        if options.feather_edges {
            algorithms_used.push("feather".to_string());
        }

        if pixels <= ceiling && !needs_denoise {
            let mask = segment::segment(buffer, options, &self.tuning, governor)?;
            return Ok((mask, algorithms_used));
        }

        let mut working = if pixels > ceiling {
            let shrink = (ceiling as f32 / pixels as f32).sqrt();
            let plan = reduction_plan(buffer.dimensions(), shrink, &self.tuning);
            crate::verbose_println!(
                "segmenting at reduced resolution {}x{}",
                plan.working_dimensions.0,
                plan.working_dimensions.1
            );
            resample::resample(buffer, &plan, &self.tuning, governor)?
        } else {
            buffer.clone()
        };

        if needs_denoise {
            // Noisy inputs fragment the flood fill; a joint denoise guided
            // by luminance cleans flat regions without moving true edges.
            governor.checkpoint()?;
            let guide = working.luminance();
            enhance::guided_denoise(&mut working, stats, &guide);
        }

        let mask = segment::segment(&working, options, &self.tuning, governor)?;
        let mask = if mask.dimensions() == buffer.dimensions() {
            mask
        } else {
            segment::resize_mask(&mask, buffer.width(), buffer.height())?
        };
        Ok((mask, algorithms_used))
    }
}

/// Fixed bicubic downscale plan used for reduced-resolution segmentation.
fn reduction_plan(src: (u32, u32), shrink: f32, tuning: &TuningConfig) -> ProcessingPlan {
    let working_dimensions = (
        ((src.0 as f32 * shrink) as u32).max(1),
        ((src.1 as f32 * shrink) as u32).max(1),
    );
    let working_pixels = working_dimensions.0 as u64 * working_dimensions.1 as u64;
    ProcessingPlan {
        scale_factor: shrink,
        working_dimensions,
        chunk_size: if working_pixels > tuning.chunk_threshold_pixels {
            tuning.tile_edge
        } else {
            0
        },
        primary: ScaleAlgorithm::Bicubic,
        secondary: None,
        algorithms_used: vec![ScaleAlgorithm::Bicubic.name().to_string()],
    }
}

fn report(progress: Option<ProgressFn<'_>>, percent: u8, stage: &str) {
    if let Some(f) = progress {
        f(percent, stage);
    }
}
