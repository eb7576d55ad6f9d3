//! Interpolation kernels
//!
//! Closed set of convolution kernels evaluated per neighbor distance. Weights
//! are always normalized by their per-pixel sum at the call site, which is
//! what keeps border pixels (with fewer valid neighbors) correct.

use crate::models::ScaleAlgorithm;
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Kernel {
    /// Cubic convolution with free parameter `a`.
    Cubic { a: f32 },
    /// Mitchell-Netravali family.
    Mitchell { b: f32, c: f32 },
    /// Windowed sinc with the given lobe count.
    Lanczos { lobes: u32 },
}

impl Kernel {
    /// Kernel used by a given algorithm. `LineArt` and `Residual` are
    /// composite strategies handled above this level; their base kernel is
    /// what a single pass of them resolves to.
    pub fn for_algorithm(alg: ScaleAlgorithm) -> Kernel {
        match alg {
            ScaleAlgorithm::Bicubic => Kernel::Cubic { a: -0.5 },
            ScaleAlgorithm::Lanczos3 => Kernel::Lanczos { lobes: 3 },
            ScaleAlgorithm::Lanczos4 => Kernel::Lanczos { lobes: 4 },
            ScaleAlgorithm::Smooth => Kernel::Mitchell {
                b: 1.0 / 3.0,
                c: 1.0 / 3.0,
            },
            // Composite paths fall back to bicubic for their kernel passes.
            ScaleAlgorithm::LineArt | ScaleAlgorithm::Residual => Kernel::Cubic { a: -0.5 },
        }
    }

    /// Half-width of the kernel's non-zero range, in source pixels.
    pub fn support(&self) -> f32 {
        match self {
            Kernel::Cubic { .. } | Kernel::Mitchell { .. } => 2.0,
            Kernel::Lanczos { lobes } => *lobes as f32,
        }
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        match self {
            Kernel::Cubic { a } => cubic(x, *a),
            Kernel::Mitchell { b, c } => mitchell_netravali(x, *b, *c),
            Kernel::Lanczos { lobes } => lanczos(x, *lobes as f32),
        }
    }
}

#[inline]
fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-8 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Keys' cubic convolution kernel.
fn cubic(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax <= 1.0 {
        ((a + 2.0) * ax - (a + 3.0)) * ax * ax + 1.0
    } else if ax < 2.0 {
        (((ax - 5.0) * ax + 8.0) * ax - 4.0) * a
    } else {
        0.0
    }
}

fn mitchell_netravali(x: f32, b: f32, c: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 {
        (((12.0 - 9.0 * b - 6.0 * c) * ax + (-18.0 + 12.0 * b + 6.0 * c)) * ax * ax
            + (6.0 - 2.0 * b))
            / 6.0
    } else if ax < 2.0 {
        ((((-b - 6.0 * c) * ax + (6.0 * b + 30.0 * c)) * ax + (-12.0 * b - 48.0 * c)) * ax
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

fn lanczos(x: f32, a: f32) -> f32 {
    if x.abs() < a {
        sinc(x) * sinc(x / a)
    } else {
        0.0
    }
}
