//! Re-encoding picked images into the scratch JPEG working copy.
//!
//! # Examples
//!
//! ```ignore
//! use imagepick_core::encode::{encode_jpeg, DEFAULT_JPEG_QUALITY};
//!
//! let img = image::open("photo.png").unwrap();
//! let jpeg_bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, DEFAULT_JPEG_QUALITY};
