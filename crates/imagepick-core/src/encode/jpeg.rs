//! JPEG encoding for scratch copies.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use thiserror::Error;

/// Quality used for scratch copies of content-provider picks.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an image to JPEG bytes.
///
/// Alpha and high bit depths are dropped; the output is always 8-bit RGB.
/// `quality` is clamped to 1-100.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let rgb = img.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));

    encoder
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_image;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_encode_has_jpeg_markers() {
        let jpeg = encode_jpeg(&sample_image(32, 16), DEFAULT_JPEG_QUALITY).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let len = jpeg.len();
        assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_drops_alpha() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128]));
        let jpeg = encode_jpeg(&DynamicImage::ImageRgba8(rgba), 90).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[test]
    fn test_encode_quality_clamping() {
        let img = sample_image(10, 10);
        assert!(encode_jpeg(&img, 0).is_ok());
        assert!(encode_jpeg(&img, 255).is_ok());
    }

    #[test]
    fn test_encode_zero_sized() {
        let img = DynamicImage::new_rgb8(0, 10);
        assert!(matches!(
            encode_jpeg(&img, 85),
            Err(EncodeError::InvalidDimensions { width: 0, height: 10 })
        ));
    }
}
