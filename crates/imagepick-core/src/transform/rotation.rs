use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;
use tracing::debug;

use crate::decode::Rotation;
use crate::encode::{encode_jpeg, EncodeError};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Cannot save {path}: {reason}")]
    Save { path: String, reason: String },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Rotate an image by a 90° step. Positive angles are counter-clockwise.
pub fn apply_rotation(img: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => img,
        Rotation::Ccw90 => img.rotate270(),
        Rotation::Cw90 => img.rotate90(),
        Rotation::Half => img.rotate180(),
    }
}

/// Rotate the image file at `path` and overwrite it in its own format.
///
/// Returns `Ok(false)` without touching the file when `rotation` is
/// `Rotation::None`. JPEG files are re-encoded at `jpeg_quality`.
pub fn correct_orientation_in_place(
    path: &Path,
    rotation: Rotation,
    jpeg_quality: u8,
) -> Result<bool, TransformError> {
    if rotation.is_none() {
        return Ok(false);
    }

    let decode_err = |reason: String| TransformError::Decode {
        path: path.display().to_string(),
        reason,
    };

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| decode_err("unknown format".to_string()))?;
    let img = reader.decode().map_err(|e| decode_err(e.to_string()))?;

    let rotated = apply_rotation(img, rotation);

    if format == ImageFormat::Jpeg {
        fs::write(path, encode_jpeg(&rotated, jpeg_quality)?)?;
    } else {
        rotated
            .save_with_format(path, format)
            .map_err(|e| TransformError::Save {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
    }

    debug!(path = %path.display(), degrees = ?rotation.degrees(), "Image rotated");
    Ok(true)
}
