//! Tests for the enhancement pipeline

use super::*;
use crate::governor::{CancelToken, ResourceBudget};
use crate::models::ContentType;

fn governor() -> Governor {
    Governor::new(ResourceBudget::default(), CancelToken::new())
}

fn photo_analysis() -> ContentAnalysis {
    ContentAnalysis {
        content_type: ContentType::Photo,
        noise_level: 0.2,
        edge_density: 0.3,
        skin_tone_ratio: 0.0,
        compression_artifact_score: 0.1,
    }
}

fn textured(w: u32, h: u32) -> RasterBuffer {
    let mut buf = RasterBuffer::filled(w, h, [0, 0, 0, 255]).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = (((x / 4 + y / 4) % 2) * 160 + 40) as u8;
            buf.set(x, y, [v, v / 2 + 30, 255 - v, 255]);
        }
    }
    buf
}

fn disabled_options() -> UpscaleOptions {
    UpscaleOptions {
        enhance_details: false,
        reduce_noise: false,
        sharpen_amount: 0,
        enhance_colors: false,
        ..Default::default()
    }
}

#[test]
fn all_flags_off_is_byte_identical() {
    let mut buf = textured(32, 32);
    let before = buf.pixels().to_vec();
    enhance(&mut buf, &photo_analysis(), &disabled_options(), &governor()).unwrap();
    assert_eq!(buf.pixels(), &before[..]);
}

#[test]
fn every_step_preserves_dimensions() {
    let mut buf = textured(48, 36);
    let options = UpscaleOptions {
        enhance_details: true,
        reduce_noise: true,
        sharpen_amount: 60,
        enhance_colors: true,
        ..Default::default()
    };
    enhance(&mut buf, &photo_analysis(), &options, &governor()).unwrap();
    assert_eq!(buf.dimensions(), (48, 36));
    assert_eq!(buf.pixels().len(), 48 * 36 * 4);
}

#[test]
fn enabled_steps_actually_change_textured_content() {
    let mut buf = textured(32, 32);
    let before = buf.pixels().to_vec();
    let options = UpscaleOptions {
        enhance_details: true,
        sharpen_amount: 60,
        ..disabled_options()
    };
    enhance(&mut buf, &photo_analysis(), &options, &governor()).unwrap();
    assert_ne!(buf.pixels(), &before[..]);
}

#[test]
fn alpha_channel_is_never_modified() {
    let mut buf = textured(32, 32);
    for y in 0..32 {
        for x in 0..32 {
            let mut p = buf.get(x, y);
            p[3] = ((x * 8) % 256) as u8;
            buf.set(x, y, p);
        }
    }
    let alphas: Vec<u8> = buf.pixels().chunks_exact(4).map(|p| p[3]).collect();
    let options = UpscaleOptions {
        enhance_details: true,
        reduce_noise: true,
        sharpen_amount: 80,
        enhance_colors: true,
        ..Default::default()
    };
    enhance(&mut buf, &photo_analysis(), &options, &governor()).unwrap();
    let after: Vec<u8> = buf.pixels().chunks_exact(4).map(|p| p[3]).collect();
    assert_eq!(alphas, after);
}

#[test]
fn cancellation_stops_between_steps() {
    let mut buf = textured(32, 32);
    let cancel = CancelToken::new();
    cancel.cancel();
    let gov = Governor::new(ResourceBudget::default(), cancel);
    let options = UpscaleOptions {
        enhance_details: true,
        ..disabled_options()
    };
    let err = enhance(&mut buf, &photo_analysis(), &options, &gov).unwrap_err();
    assert!(matches!(err, PixliftError::Cancelled));
}
