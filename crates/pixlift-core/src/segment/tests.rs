//! Tests for the segmentation engine

use super::*;
use crate::governor::{CancelToken, ResourceBudget};

fn governor() -> Governor {
    Governor::new(ResourceBudget::default(), CancelToken::new())
}

fn blue_square_on_white(size: u32, lo: u32, hi: u32) -> RasterBuffer {
    let mut buf = RasterBuffer::filled(size, size, [255, 255, 255, 255]).unwrap();
    for y in lo..hi {
        for x in lo..hi {
            buf.set(x, y, [20, 20, 200, 255]);
        }
    }
    buf
}

#[test]
fn uniform_image_is_entirely_background() {
    // No edges anywhere, so the border flood reaches every pixel.
    let buf = RasterBuffer::filled(40, 40, [180, 180, 180, 255]).unwrap();
    let mask = segment(
        &buf,
        &CutoutOptions::default(),
        &TuningConfig::default(),
        &governor(),
    )
    .unwrap();
    assert!(mask.data().iter().all(|&m| m == 255));
}

#[test]
fn centered_square_matches_within_kernel_tolerance() {
    let tuning = TuningConfig::default();
    let buf = blue_square_on_white(50, 15, 35);
    let options = CutoutOptions {
        feather_edges: false,
        ..Default::default()
    };
    let mask = segment(&buf, &options, &tuning, &governor()).unwrap();

    let tol = tuning.morph_radius + 2;
    for y in 0..50u32 {
        for x in 0..50u32 {
            let inside_shrunk =
                x >= 15 + tol && x < 35 - tol && y >= 15 + tol && y < 35 - tol;
            let outside_grown = x + tol < 15 || x >= 35 + tol || y + tol < 15 || y >= 35 + tol;
            if inside_shrunk {
                assert!(mask.get(x, y) < 128, "expected foreground at {},{}", x, y);
            } else if outside_grown {
                assert!(mask.get(x, y) > 128, "expected background at {},{}", x, y);
            }
        }
    }
}

#[test]
fn feathering_produces_a_gradient_band() {
    let tuning = TuningConfig::default();
    let buf = blue_square_on_white(50, 15, 35);
    let mask = segment(&buf, &CutoutOptions::default(), &tuning, &governor()).unwrap();

    // Deep inside: foreground. Far corner: background.
    assert!(mask.get(25, 25) < 32);
    assert!(mask.get(2, 2) > 223);
    // Within the feather radius of the boundary there is at least one
    // intermediate value along a horizontal scan.
    let band: Vec<u8> = (35..(35 + tuning.feather_radius).min(49))
        .map(|x| mask.get(x, 25))
        .collect();
    assert!(
        band.iter().any(|&m| m > 16 && m < 240),
        "expected intermediate values in feather band, got {:?}",
        band
    );
}

#[test]
fn tiny_images_skip_morphology_without_failing() {
    let buf = RasterBuffer::filled(5, 5, [10, 10, 10, 255]).unwrap();
    let mask = segment(
        &buf,
        &CutoutOptions::default(),
        &TuningConfig::default(),
        &governor(),
    )
    .unwrap();
    assert_eq!(mask.width(), 5);
    assert!(mask.data().iter().all(|&m| m == 255));
}

#[test]
fn sensitivity_scales_the_flood_threshold() {
    let tuning = TuningConfig::default();
    assert!(flood_threshold(0, &tuning) < flood_threshold(50, &tuning));
    assert!(flood_threshold(50, &tuning) < flood_threshold(100, &tuning));
}

#[test]
fn memory_ceiling_applies_to_segmentation() {
    let buf = blue_square_on_white(50, 15, 35);
    let budget = ResourceBudget {
        max_bytes: 1024,
        ..ResourceBudget::default()
    };
    let gov = Governor::new(budget, CancelToken::new());
    let err = segment(
        &buf,
        &CutoutOptions::default(),
        &TuningConfig::default(),
        &gov,
    )
    .unwrap_err();
    assert!(matches!(err, PixliftError::MemoryLimitExceeded { .. }));
}

#[test]
fn mask_resize_preserves_structure() {
    let mut mask = Mask::new(10, 10);
    for y in 0..10 {
        for x in 5..10 {
            mask.set(x, y, 255);
        }
    }
    let big = resize_mask(&mask, 20, 20).unwrap();
    assert_eq!(big.dimensions(), (20, 20));
    assert!(big.get(2, 10) < 64);
    assert!(big.get(18, 10) > 192);
}
