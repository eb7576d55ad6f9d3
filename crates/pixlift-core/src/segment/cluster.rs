//! Color clustering for background identification
//!
//! Deterministic k-means over a spatially strided sample of the image,
//! seeded farthest-point style from the mean border color so the first
//! centroid is biased toward the background. Each cluster is then scored by
//! border presence, population, and uniformity; the winner is treated as the
//! background color model.

use crate::buffer::RasterBuffer;
use crate::config::TuningConfig;

/// Minimum winning score; below it the border-presence fallback applies.
const BACKGROUND_SCORE_FLOOR: f32 = 0.3;

/// Samples within this many pixels of the image edge count as border.
const BORDER_BAND: u32 = 2;

#[derive(Debug)]
pub(crate) struct ClusterModel {
    pub centroids: Vec<[f32; 3]>,
    /// Index of the cluster identified as background.
    pub background: usize,
}

impl ClusterModel {
    /// Squared distance from a color to the background centroid.
    #[inline]
    pub fn background_distance_sq(&self, rgb: [u8; 3]) -> f32 {
        let c = self.centroids[self.background];
        let dr = rgb[0] as f32 - c[0];
        let dg = rgb[1] as f32 - c[1];
        let db = rgb[2] as f32 - c[2];
        dr * dr + dg * dg + db * db
    }
}

struct Sample {
    rgb: [f32; 3],
    border: bool,
}

pub(crate) fn cluster_colors(buffer: &RasterBuffer, tuning: &TuningConfig) -> ClusterModel {
    let samples = collect_samples(buffer, tuning.kmeans_sample_cap);
    let k = tuning.kmeans_clusters.max(2).min(samples.len().max(2));
    let mut centroids = seed_centroids(&samples, k);

    let mut assignment = vec![0usize; samples.len()];
    for _ in 0..tuning.kmeans_rounds {
        for (i, s) in samples.iter().enumerate() {
            assignment[i] = nearest_centroid(&centroids, s.rgb);
        }

        let mut sums = vec![[0.0f32; 3]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (i, s) in samples.iter().enumerate() {
            let a = assignment[i];
            for c in 0..3 {
                sums[a][c] += s.rgb[c];
            }
            counts[a] += 1;
        }

        let mut max_movement = 0.0f32;
        for (j, centroid) in centroids.iter_mut().enumerate() {
            if counts[j] == 0 {
                // Empty cluster: retain the previous centroid.
                continue;
            }
            let mut moved = 0.0f32;
            for c in 0..3 {
                let new = sums[j][c] / counts[j] as f32;
                moved = moved.max((new - centroid[c]).abs());
                centroid[c] = new;
            }
            max_movement = max_movement.max(moved);
        }
        if max_movement < tuning.kmeans_epsilon {
            break;
        }
    }

    let background = identify_background(&samples, &assignment, &centroids);
    ClusterModel {
        centroids,
        background,
    }
}

fn collect_samples(buffer: &RasterBuffer, cap: usize) -> Vec<Sample> {
    let (w, h) = buffer.dimensions();
    let total = buffer.pixel_count();
    let stride = (((total as f32 / cap.max(1) as f32).sqrt()).ceil() as u32).max(1);

    let mut samples = Vec::new();
    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            let [r, g, b, _] = buffer.get(x, y);
            let border = x < BORDER_BAND
                || y < BORDER_BAND
                || x >= w.saturating_sub(BORDER_BAND)
                || y >= h.saturating_sub(BORDER_BAND);
            samples.push(Sample {
                rgb: [r as f32, g as f32, b as f32],
                border,
            });
            x += stride;
        }
        y += stride;
    }
    samples
}

/// First centroid: mean border color. Remaining centroids: the sample
/// farthest from all chosen centroids, k-means++ style but deterministic.
fn seed_centroids(samples: &[Sample], k: usize) -> Vec<[f32; 3]> {
    let mut centroids = Vec::with_capacity(k);

    let border: Vec<&Sample> = samples.iter().filter(|s| s.border).collect();
    let first = if border.is_empty() {
        samples[0].rgb
    } else {
        let mut mean = [0.0f32; 3];
        for s in &border {
            for c in 0..3 {
                mean[c] += s.rgb[c];
            }
        }
        for m in mean.iter_mut() {
            *m /= border.len() as f32;
        }
        mean
    };
    centroids.push(first);

    while centroids.len() < k {
        let mut best = (0usize, -1.0f32);
        for (i, s) in samples.iter().enumerate() {
            let d = centroids
                .iter()
                .map(|c| distance_sq(*c, s.rgb))
                .fold(f32::MAX, f32::min);
            if d > best.1 {
                best = (i, d);
            }
        }
        centroids.push(samples[best.0].rgb);
    }
    centroids
}

#[inline]
fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[inline]
fn nearest_centroid(centroids: &[[f32; 3]], rgb: [f32; 3]) -> usize {
    let mut best = (0usize, f32::MAX);
    for (j, c) in centroids.iter().enumerate() {
        let d = distance_sq(*c, rgb);
        if d < best.1 {
            best = (j, d);
        }
    }
    best.0
}

/// Score clusters by border match, population, and inverse variance. A
/// background cluster always exists: if nothing clears the floor, the
/// cluster with the most border presence wins.
fn identify_background(
    samples: &[Sample],
    assignment: &[usize],
    centroids: &[[f32; 3]],
) -> usize {
    let k = centroids.len();
    let mut population = vec![0usize; k];
    let mut border_hits = vec![0usize; k];
    let mut variance_sum = vec![0.0f32; k];
    let mut border_total = 0usize;

    for (i, s) in samples.iter().enumerate() {
        let a = assignment[i];
        population[a] += 1;
        variance_sum[a] += distance_sq(s.rgb, centroids[a]);
        if s.border {
            border_hits[a] += 1;
            border_total += 1;
        }
    }

    let total = samples.len().max(1) as f32;
    let mut best = (0usize, -1.0f32);
    let mut best_border = (0usize, -1.0f32);
    for j in 0..k {
        let border_ratio = if border_total > 0 {
            border_hits[j] as f32 / border_total as f32
        } else {
            0.0
        };
        let pop_ratio = population[j] as f32 / total;
        let variance = if population[j] > 0 {
            variance_sum[j] / population[j] as f32
        } else {
            f32::MAX
        };
        let uniformity = 1.0 / (1.0 + variance / 1024.0);
        let score = 0.5 * border_ratio + 0.3 * pop_ratio + 0.2 * uniformity;
        if score > best.1 {
            best = (j, score);
        }
        if border_ratio > best_border.1 {
            best_border = (j, border_ratio);
        }
    }

    if best.1 >= BACKGROUND_SCORE_FLOOR {
        best.0
    } else {
        best_border.0
    }
}
