//! Orientation correction for saved scratch images.
//!
//! Rotations are exact 90° steps, so the canvas is swapped rather than
//! resampled and no pixels are cropped.

mod rotation;

pub use rotation::{apply_rotation, correct_orientation_in_place, TransformError};
