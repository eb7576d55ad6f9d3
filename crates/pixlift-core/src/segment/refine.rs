//! Mask refinement: guided smoothing and feathering
//!
//! The guided pass relaxes the mask toward neighbors with similar guide
//! luminance, snapping the mask boundary to true image edges over a few
//! iterations. Feathering then converts the hard boundary into a linear
//! alpha ramp based on distance to the nearest foreground pixel.

use std::collections::VecDeque;

/// Window radius of the guided relaxation.
const GUIDE_RADIUS: usize = 2;

/// Guide-luminance sigma for the similarity weight.
const GUIDE_SIGMA: f32 = 20.0;

/// Iterative joint relaxation of the mask against a grayscale guide.
pub(crate) fn guided_smooth(mask: &mut [u8], gray: &[u8], w: usize, h: usize, iterations: usize) {
    if w <= GUIDE_RADIUS * 2 || h <= GUIDE_RADIUS * 2 {
        return;
    }
    let denom = 2.0 * GUIDE_SIGMA * GUIDE_SIGMA;
    let mut current = mask.to_vec();
    let mut next = vec![0u8; mask.len()];

    for _ in 0..iterations {
        for y in 0..h {
            for x in 0..w {
                let g0 = gray[y * w + x] as f32;
                let mut acc = 0.0f32;
                let mut weight_sum = 0.0f32;
                let y_lo = y.saturating_sub(GUIDE_RADIUS);
                let y_hi = (y + GUIDE_RADIUS).min(h - 1);
                let x_lo = x.saturating_sub(GUIDE_RADIUS);
                let x_hi = (x + GUIDE_RADIUS).min(w - 1);
                for ny in y_lo..=y_hi {
                    for nx in x_lo..=x_hi {
                        let dg = gray[ny * w + nx] as f32 - g0;
                        let dy = ny as f32 - y as f32;
                        let dx = nx as f32 - x as f32;
                        let spatial = 1.0 / (1.0 + dx * dx + dy * dy);
                        let wt = spatial * (-(dg * dg) / denom).exp();
                        acc += wt * current[ny * w + nx] as f32;
                        weight_sum += wt;
                    }
                }
                next[y * w + x] = (acc / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
        std::mem::swap(&mut current, &mut next);
    }
    mask.copy_from_slice(&current);
}

/// Linear feather: within `radius` of the foreground, background confidence
/// ramps from 0 at the boundary to full. Foreground pixels stay 0; anything
/// farther than `radius` from the foreground stays 255.
pub(crate) fn feather(mask: &mut [u8], w: usize, h: usize, radius: u32) {
    if radius == 0 {
        return;
    }
    // Multi-source BFS distance from the foreground set.
    let mut distance = vec![u32::MAX; mask.len()];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    for y in 0..h {
        for x in 0..w {
            if mask[y * w + x] < 128 {
                distance[y * w + x] = 0;
                queue.push_back((x, y));
            }
        }
    }
    if queue.is_empty() || queue.len() == mask.len() {
        // Nothing to feather against.
        return;
    }

    while let Some((x, y)) = queue.pop_front() {
        let d = distance[y * w + x];
        if d >= radius {
            continue;
        }
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= w || ny >= h {
                continue;
            }
            let i = ny * w + nx;
            if distance[i] > d + 1 {
                distance[i] = d + 1;
                queue.push_back((nx, ny));
            }
        }
    }

    for (m, &d) in mask.iter_mut().zip(distance.iter()) {
        *m = if d == 0 {
            0
        } else if d >= radius {
            255
        } else {
            (d * 255 / radius) as u8
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guided_smooth_keeps_uniform_mask_uniform() {
        let mut mask = vec![255u8; 20 * 20];
        let gray = vec![100u8; 20 * 20];
        guided_smooth(&mut mask, &gray, 20, 20, 3);
        assert!(mask.iter().all(|&m| m == 255));
    }

    #[test]
    fn guided_smooth_respects_guide_boundaries() {
        // Mask boundary offset one pixel from the guide edge gets pulled in.
        let w = 20;
        let mut mask: Vec<u8> = (0..w * w)
            .map(|i| if i % w < 9 { 0u8 } else { 255 })
            .collect();
        let gray: Vec<u8> = (0..w * w).map(|i| if i % w < 10 { 0u8 } else { 255 }).collect();
        guided_smooth(&mut mask, &gray, w, w, 3);
        // Well inside the dark guide region the mask stays foreground-ish;
        // well inside the bright region it stays background-ish.
        assert!(mask[10 * w + 2] < 64);
        assert!(mask[10 * w + 17] > 192);
    }

    #[test]
    fn feather_ramps_linearly_with_distance() {
        let w = 30;
        let mut mask = vec![255u8; w * w];
        // Single foreground column at x = 0.
        for y in 0..w {
            mask[y * w] = 0;
        }
        feather(&mut mask, w, w, 8);
        assert_eq!(mask[15 * w], 0);
        assert_eq!(mask[15 * w + 4], (4u32 * 255 / 8) as u8);
        assert_eq!(mask[15 * w + 8], 255);
        assert_eq!(mask[15 * w + 20], 255);
    }

    #[test]
    fn feather_without_foreground_is_a_no_op() {
        let w = 10;
        let mut mask = vec![255u8; w * w];
        feather(&mut mask, w, w, 8);
        assert!(mask.iter().all(|&m| m == 255));
    }
}
