//! imagepick core - picking images into a scratch working copy
//!
//! This crate provides everything between "the user asked for a picture" and
//! "the UI shows a normalized copy of it": native dialog and content-provider
//! pickers, content URI resolution, EXIF orientation correction, JPEG
//! re-encoding and the scratch directory. Host functionality (dialogs,
//! content resolver, permissions, widgets) is reached only through the
//! traits in [`platform`].

pub mod config;
pub mod decode;
pub mod encode;
pub mod picker;
pub mod platform;
pub mod scratch;
pub mod transform;
pub mod uri;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, PickerConfig, PickerKind};
pub use decode::{read_orientation, Orientation, Rotation};
pub use picker::{
    Capabilities, ContentProviderPicker, DialogPicker, ImagePicker, PickError, PickOutcome,
    PickRequest, Picker, SelectionResult,
};
pub use scratch::ScratchDir;
pub use uri::{resolve_path, ContentUri, ResolveMethod};
