//! Input decoding
//!
//! Accepts PNG, JPEG, and WebP byte streams and produces the RGBA8 working
//! buffer. The input byte ceiling is checked before any decode work starts,
//! so oversized files are rejected without allocating for them.

use crate::buffer::RasterBuffer;
use crate::error::PixliftError;
use crate::governor::ResourceBudget;
use image::ImageFormat;

/// Decode an image byte stream into the working representation.
pub fn decode_bytes(bytes: &[u8], budget: &ResourceBudget) -> Result<RasterBuffer, PixliftError> {
    if bytes.len() > budget.max_input_bytes {
        return Err(PixliftError::InputTooLarge {
            actual: bytes.len(),
            limit: budget.max_input_bytes,
        });
    }

    let format = image::guess_format(bytes)
        .map_err(|_| PixliftError::UnsupportedFormat("unrecognized byte stream".to_string()))?;
    if !matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP
    ) {
        return Err(PixliftError::UnsupportedFormat(format!("{:?}", format)));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PixliftError::DecodeFailure(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    crate::verbose_println!("decoded {:?} input: {}x{}", format, width, height);

    RasterBuffer::new(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut img = image::RgbaImage::new(width, height);
        for p in img.pixels_mut() {
            *p = image::Rgba(rgba);
        }
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png() {
        let bytes = png_bytes(6, 4, [10, 20, 30, 255]);
        let buf = decode_bytes(&bytes, &ResourceBudget::default()).unwrap();
        assert_eq!(buf.dimensions(), (6, 4));
        assert_eq!(buf.get(5, 3), [10, 20, 30, 255]);
    }

    #[test]
    fn rejects_oversized_input_before_decoding() {
        let bytes = png_bytes(4, 4, [0, 0, 0, 255]);
        let budget = ResourceBudget {
            max_input_bytes: 8,
            ..ResourceBudget::default()
        };
        let err = decode_bytes(&bytes, &budget).unwrap_err();
        assert!(matches!(err, PixliftError::InputTooLarge { limit: 8, .. }));
    }

    #[test]
    fn rejects_unrecognized_bytes() {
        let err = decode_bytes(b"not an image at all", &ResourceBudget::default()).unwrap_err();
        assert!(matches!(err, PixliftError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_unsupported_container() {
        // Valid GIF header; recognized but outside the supported set.
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        let err = decode_bytes(gif, &ResourceBudget::default()).unwrap_err();
        assert!(matches!(err, PixliftError::UnsupportedFormat(_)));
    }

    #[test]
    fn truncated_png_is_a_decode_failure() {
        let mut bytes = png_bytes(16, 16, [1, 2, 3, 255]);
        bytes.truncate(bytes.len() / 2);
        let err = decode_bytes(&bytes, &ResourceBudget::default()).unwrap_err();
        assert!(matches!(err, PixliftError::DecodeFailure(_)));
    }
}
