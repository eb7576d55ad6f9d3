//! Multi-scale edge map
//!
//! Sobel gradients taken at increasing tap distances, combined with
//! scale-weighted summation. Coarser scales respond to soft region
//! boundaries that a single-pixel Sobel misses. Output is normalized to
//! [0, 1].

/// Tap distances and their weights in the combined map.
const SCALES: [(usize, f32); 3] = [(1, 1.0), (2, 0.5), (4, 0.25)];

pub(crate) fn edge_map(gray: &[u8], w: usize, h: usize) -> Vec<f32> {
    let mut combined = vec![0.0f32; w * h];
    let weight_total: f32 = SCALES.iter().map(|(_, wt)| wt).sum();

    for &(step, weight) in &SCALES {
        if w <= step * 2 || h <= step * 2 {
            continue;
        }
        for y in 0..h {
            for x in 0..w {
                let mag = sobel_at(gray, w, h, x, y, step);
                combined[y * w + x] += weight * mag;
            }
        }
    }

    for v in combined.iter_mut() {
        *v = (*v / weight_total).clamp(0.0, 1.0);
    }
    combined
}

/// Sobel magnitude with taps `step` pixels away, coordinates clamped at the
/// border, scaled to [0, 1].
#[inline]
fn sobel_at(gray: &[u8], w: usize, h: usize, x: usize, y: usize, step: usize) -> f32 {
    let at = |xx: i64, yy: i64| {
        let cx = xx.clamp(0, w as i64 - 1) as usize;
        let cy = yy.clamp(0, h as i64 - 1) as usize;
        gray[cy * w + cx] as i64
    };
    let (x, y, s) = (x as i64, y as i64, step as i64);
    let gx = (at(x + s, y - s) + 2 * at(x + s, y) + at(x + s, y + s))
        - (at(x - s, y - s) + 2 * at(x - s, y) + at(x - s, y + s));
    let gy = (at(x - s, y + s) + 2 * at(x, y + s) + at(x + s, y + s))
        - (at(x - s, y - s) + 2 * at(x, y - s) + at(x + s, y - s));
    ((gx.abs() + gy.abs()) as f32 / 2040.0).min(1.0)
}
