//! Border-seeded background flood fill
//!
//! Region growth from seed points spread along the image border, expanding
//! through pixels whose edge magnitude stays below the threshold. The flood
//! never crosses a strong edge; that boundary is the primary
//! background/foreground decision. Pixels matching the background color
//! model are allowed through a somewhat higher edge ceiling, which closes
//! small gaps in soft backgrounds.

use super::cluster::ClusterModel;
use crate::buffer::RasterBuffer;
use std::collections::VecDeque;

/// Color distance (squared, 8-bit units) within which a pixel counts as
/// matching the background centroid.
const BG_COLOR_DISTANCE_SQ: f32 = 40.0 * 40.0;

/// Flood-fill the background. Returns one bool per pixel, true = background.
pub(crate) fn background_flood(
    edges: &[f32],
    buffer: &RasterBuffer,
    threshold: f32,
    model: &ClusterModel,
) -> Vec<bool> {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let mut background = vec![false; w * h];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for (x, y) in border_seeds(w, h) {
        let i = y * w + x;
        if !background[i] && passable(edges, buffer, model, i, x, y, threshold) {
            background[i] = true;
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
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
            if background[i] {
                continue;
            }
            if passable(edges, buffer, model, i, nx, ny, threshold) {
                background[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    background
}

#[inline]
fn passable(
    edges: &[f32],
    buffer: &RasterBuffer,
    model: &ClusterModel,
    i: usize,
    x: usize,
    y: usize,
    threshold: f32,
) -> bool {
    if edges[i] < threshold {
        return true;
    }
    if edges[i] < threshold * 2.0 {
        let [r, g, b, _] = buffer.get(x as u32, y as u32);
        return model.background_distance_sq([r, g, b]) < BG_COLOR_DISTANCE_SQ;
    }
    false
}

/// Twelve seed points: the corners, the edge midpoints, and the quarter
/// points of the top and bottom edges.
fn border_seeds(w: usize, h: usize) -> Vec<(usize, usize)> {
    let right = w - 1;
    let bottom = h - 1;
    vec![
        (0, 0),
        (right, 0),
        (0, bottom),
        (right, bottom),
        (w / 2, 0),
        (w / 2, bottom),
        (0, h / 2),
        (right, h / 2),
        (w / 4, 0),
        (3 * w / 4, 0),
        (w / 4, bottom),
        (3 * w / 4, bottom),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningConfig;
    use crate::segment::cluster::cluster_colors;
    use crate::segment::edges::edge_map;

    #[test]
    fn uniform_image_floods_completely() {
        let buf = RasterBuffer::filled(20, 20, [200, 200, 200, 255]).unwrap();
        let edges = edge_map(&buf.luminance(), 20, 20);
        let model = cluster_colors(&buf, &TuningConfig::default());
        let bg = background_flood(&edges, &buf, 0.15, &model);
        assert!(bg.iter().all(|&b| b));
    }

    #[test]
    fn flood_stops_at_strong_edges() {
        let mut buf = RasterBuffer::filled(30, 30, [255, 255, 255, 255]).unwrap();
        for y in 10..20 {
            for x in 10..20 {
                buf.set(x, y, [10, 10, 10, 255]);
            }
        }
        let edges = edge_map(&buf.luminance(), 30, 30);
        let model = cluster_colors(&buf, &TuningConfig::default());
        let bg = background_flood(&edges, &buf, 0.15, &model);
        assert!(bg[0], "border must be background");
        assert!(!bg[15 * 30 + 15], "square interior must stay foreground");
    }
}
