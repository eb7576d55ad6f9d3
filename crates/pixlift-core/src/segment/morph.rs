//! Morphological mask refinement
//!
//! Closing (dilate, erode) fills small holes in the foreground, then opening
//! (erode, dilate) removes small foreground specks left in the background.
//! Square structuring element, applied as two separable min/max passes.

/// Closing followed by opening on a foreground bitmap (true = foreground).
pub(crate) fn close_then_open(fg: Vec<bool>, w: usize, h: usize, radius: usize) -> Vec<bool> {
    if radius == 0 {
        return fg;
    }
    let closed = erode(&dilate(&fg, w, h, radius), w, h, radius);
    dilate(&erode(&closed, w, h, radius), w, h, radius)
}

fn dilate(mask: &[bool], w: usize, h: usize, radius: usize) -> Vec<bool> {
    axis_pass(&axis_pass(mask, w, h, radius, true, true), w, h, radius, false, true)
}

fn erode(mask: &[bool], w: usize, h: usize, radius: usize) -> Vec<bool> {
    axis_pass(&axis_pass(mask, w, h, radius, true, false), w, h, radius, false, false)
}

/// One separable pass. `max` true = dilation semantics (any neighbor set),
/// false = erosion (all in-bounds neighbors set).
fn axis_pass(mask: &[bool], w: usize, h: usize, radius: usize, horizontal: bool, max: bool) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    let r = radius as i64;
    for y in 0..h {
        for x in 0..w {
            let mut value = !max;
            for off in -r..=r {
                let (tx, ty) = if horizontal {
                    (x as i64 + off, y as i64)
                } else {
                    (x as i64, y as i64 + off)
                };
                if tx < 0 || ty < 0 || tx >= w as i64 || ty >= h as i64 {
                    continue;
                }
                let v = mask[ty as usize * w + tx as usize];
                if max && v {
                    value = true;
                    break;
                }
                if !max && !v {
                    value = false;
                    break;
                }
            }
            out[y * w + x] = value;
        }
    }
    out
}
