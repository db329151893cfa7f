//! Core types for decoding and orientation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source produced no bytes at all.
    #[error("Image stream is empty")]
    Empty,

    /// The bytes are not a supported or intact image.
    #[error("Corrupted or unsupported image: {0}")]
    CorruptedFile(String),

    /// I/O error while reading the source stream.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Normal,
        Orientation::FlipHorizontal,
        Orientation::Rotate180,
        Orientation::FlipVertical,
        Orientation::Transpose,
        Orientation::Rotate90CW,
        Orientation::Transverse,
        Orientation::Rotate270CW,
    ];
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Rotation applied to a saved image to make it display upright.
///
/// Angles are counter-clockwise positive, so a picture shot with the camera
/// turned right (`Rotate90CW`) is corrected with [`Rotation::Cw90`] (-90°).
/// Mirrored orientations are corrected by rotation only; the mirror itself
/// is left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    /// +90°
    Ccw90,
    /// -90°
    Cw90,
    /// 180°
    Half,
}

impl Rotation {
    /// Rotation angle in degrees, or `None` when nothing has to be done.
    pub fn degrees(self) -> Option<i32> {
        match self {
            Rotation::None => None,
            Rotation::Ccw90 => Some(90),
            Rotation::Cw90 => Some(-90),
            Rotation::Half => Some(180),
        }
    }

    pub fn is_none(self) -> bool {
        self == Rotation::None
    }
}

impl From<Orientation> for Rotation {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Rotate180 | Orientation::FlipVertical => Rotation::Half,
            Orientation::Transpose | Orientation::Rotate90CW => Rotation::Cw90,
            Orientation::Transverse | Orientation::Rotate270CW => Rotation::Ccw90,
            Orientation::Normal | Orientation::FlipHorizontal => Rotation::None,
        }
    }
}
