//! Reading picked images: EXIF orientation and bitmap decoding.
//!
//! Orientation is always read from its own freshly opened stream, since a
//! content stream can only be consumed once. Reading never fails: anything
//! that is not a readable orientation tag counts as [`Orientation::Normal`].
//!
//! # Examples
//!
//! ```ignore
//! use imagepick_core::decode::{read_orientation, Rotation};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let rotation = Rotation::from(read_orientation(&bytes));
//! println!("needs rotation: {:?}", rotation.degrees());
//! ```

mod bitmap;
mod orientation;
mod types;

pub use bitmap::{decode_image, decode_image_from};
pub use orientation::{read_orientation, read_orientation_from};
pub use types::{DecodeError, Orientation, Rotation};
