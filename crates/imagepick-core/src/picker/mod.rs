//! Image pickers.
//!
//! A picker is chosen once at startup ([`ImagePicker::from_config`]) and
//! every [`Picker::choose`] call returns a [`PickRequest`] right away. The
//! outcome of that one pick arrives on the request's own channel, so
//! overlapping picks never share state.
//!
//! # Examples
//!
//! ```ignore
//! let picker = ImagePicker::from_config(&config, capabilities)?;
//! match picker.choose(None).wait() {
//!     PickOutcome::Selected(selection) => show(selection.event_path()),
//!     PickOutcome::Cancelled => {}
//!     PickOutcome::Failed(e) => tracing::warn!(error = %e, "Pick failed"),
//! }
//! ```

mod content_provider;
mod dialog;
mod request;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, PickerConfig, PickerKind};
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::platform::{
    ActivityLauncher, ContentResolver, FileDialog, MediaScanner, PermissionGate, PlatformError,
    TextTarget,
};

pub use content_provider::{CaptureSettings, ContentProviderPicker};
pub use dialog::DialogPicker;
pub use request::PickRequest;
pub(crate) use request::PickResponder;

#[derive(Debug, Error)]
pub enum PickError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No content stream for {0}")]
    StreamNotFound(String),

    #[error("The image cannot be opened, it may be damaged: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Image too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Storage permission missing: {0}")]
    Permission(String),

    #[error(transparent)]
    Platform(PlatformError),

    #[error("Picker went away before the pick finished")]
    Abandoned,
}

impl From<PlatformError> for PickError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::PermissionDenied(msg) => PickError::Permission(msg),
            PlatformError::NotFound(msg) => PickError::StreamNotFound(msg),
            other => PickError::Platform(other),
        }
    }
}

/// A finished pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Working copy inside the scratch directory.
    pub temp_path: PathBuf,
    /// Where the picked file really lives. Empty when it could not be
    /// resolved.
    pub original_path: String,
}

impl SelectionResult {
    /// Path carried by the selection notification: the original path when
    /// known, the temp copy otherwise.
    pub fn event_path(&self) -> String {
        if self.original_path.is_empty() {
            self.temp_path.display().to_string()
        } else {
            self.original_path.clone()
        }
    }

    /// Text shown on the target widget.
    pub fn display_text(&self) -> String {
        format!(
            "Temp: {}\nReal: {}",
            self.temp_path.display(),
            self.original_path
        )
    }
}

#[derive(Debug)]
pub enum PickOutcome {
    Selected(SelectionResult),
    Cancelled,
    Failed(PickError),
}

impl PickOutcome {
    /// The single-string selection notification: the event path for a
    /// selection, `""` for a cancel, nothing for a failed pick.
    pub fn notification(&self) -> Option<String> {
        match self {
            PickOutcome::Selected(selection) => Some(selection.event_path()),
            PickOutcome::Cancelled => Some(String::new()),
            PickOutcome::Failed(_) => None,
        }
    }

    pub fn selection(&self) -> Option<&SelectionResult> {
        match self {
            PickOutcome::Selected(selection) => Some(selection),
            _ => None,
        }
    }
}

pub trait Picker: Send + Sync {
    /// Start a pick and return without waiting for it. `target` gets its
    /// text set to the Temp/Real paths on success.
    fn choose(&self, target: Option<Arc<dyn TextTarget>>) -> PickRequest;
}

/// Host capabilities handed to [`ImagePicker::from_config`]. Only the ones
/// the configured picker kind needs have to be set.
#[derive(Default, Clone)]
pub struct Capabilities {
    pub file_dialog: Option<Arc<dyn FileDialog>>,
    pub content_resolver: Option<Arc<dyn ContentResolver>>,
    pub activity_launcher: Option<Arc<dyn ActivityLauncher>>,
    pub permissions: Option<Arc<dyn PermissionGate>>,
    pub media_scanner: Option<Arc<dyn MediaScanner>>,
}

/// The picker variant selected at startup.
pub enum ImagePicker {
    Dialog(DialogPicker),
    ContentProvider(Arc<ContentProviderPicker>),
}

impl ImagePicker {
    pub fn from_config(
        config: &PickerConfig,
        capabilities: Capabilities,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let missing = |capability| ConfigError::MissingCapability {
            kind: config.kind,
            capability,
        };

        let picker = match config.kind {
            PickerKind::Dialog => {
                let dialog = capabilities
                    .file_dialog
                    .ok_or_else(|| missing("file dialog"))?;
                ImagePicker::Dialog(DialogPicker::new(
                    dialog,
                    config.scratch_dir(),
                    &config.extensions,
                ))
            }
            PickerKind::ContentProvider => {
                let resolver = capabilities
                    .content_resolver
                    .ok_or_else(|| missing("content resolver"))?;
                let launcher = capabilities
                    .activity_launcher
                    .ok_or_else(|| missing("activity launcher"))?;
                let permissions = capabilities
                    .permissions
                    .ok_or_else(|| missing("permission gate"))?;

                let mut picker = ContentProviderPicker::new(
                    resolver,
                    launcher,
                    permissions,
                    config.scratch_dir(),
                    CaptureSettings::from(config),
                );
                if let Some(scanner) = capabilities.media_scanner {
                    picker = picker.with_media_scanner(scanner);
                }
                ImagePicker::ContentProvider(Arc::new(picker))
            }
        };
        Ok(picker)
    }

    pub fn kind(&self) -> PickerKind {
        match self {
            ImagePicker::Dialog(_) => PickerKind::Dialog,
            ImagePicker::ContentProvider(_) => PickerKind::ContentProvider,
        }
    }

    /// The content-provider picker, for routing activity results to it.
    pub fn content_provider(&self) -> Option<&Arc<ContentProviderPicker>> {
        match self {
            ImagePicker::ContentProvider(picker) => Some(picker),
            ImagePicker::Dialog(_) => None,
        }
    }
}

impl Picker for ImagePicker {
    fn choose(&self, target: Option<Arc<dyn TextTarget>>) -> PickRequest {
        match self {
            ImagePicker::Dialog(picker) => picker.choose(target),
            ImagePicker::ContentProvider(picker) => picker.choose(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDialog, FakeLauncher, FakePermissions, FakeResolver};

    #[test]
    fn test_event_path_prefers_original() {
        let selection = SelectionResult {
            temp_path: PathBuf::from("/tmp/images/1.jpg"),
            original_path: "/sdcard/a.jpg".to_string(),
        };
        assert_eq!(selection.event_path(), "/sdcard/a.jpg");
        assert_eq!(selection.display_text(), "Temp: /tmp/images/1.jpg\nReal: /sdcard/a.jpg");

        let unresolved = SelectionResult {
            original_path: String::new(),
            ..selection
        };
        assert_eq!(unresolved.event_path(), "/tmp/images/1.jpg");
    }

    #[test]
    fn test_notification() {
        assert_eq!(PickOutcome::Cancelled.notification().as_deref(), Some(""));
        assert_eq!(PickOutcome::Failed(PickError::Abandoned).notification(), None);
        assert!(PickOutcome::Cancelled.selection().is_none());
    }

    #[test]
    fn test_platform_error_conversion() {
        let err = PickError::from(PlatformError::PermissionDenied("x".to_string()));
        assert!(matches!(err, PickError::Permission(_)));
        let err = PickError::from(PlatformError::NotFound("x".to_string()));
        assert!(matches!(err, PickError::StreamNotFound(_)));
        let err = PickError::from(PlatformError::Other("x".to_string()));
        assert!(matches!(err, PickError::Platform(_)));
    }

    #[test]
    fn test_from_config_dialog() {
        let mut config = PickerConfig::default();
        config.kind = PickerKind::Dialog;
        let capabilities = Capabilities {
            file_dialog: Some(Arc::new(FakeDialog::cancelling())),
            ..Default::default()
        };
        let picker = ImagePicker::from_config(&config, capabilities).unwrap();
        assert_eq!(picker.kind(), PickerKind::Dialog);
        assert!(picker.content_provider().is_none());
    }

    #[test]
    fn test_from_config_content_provider() {
        let mut config = PickerConfig::default();
        config.kind = PickerKind::ContentProvider;
        let capabilities = Capabilities {
            content_resolver: Some(Arc::new(FakeResolver::new())),
            activity_launcher: Some(Arc::new(FakeLauncher::new())),
            permissions: Some(Arc::new(FakePermissions::granted())),
            ..Default::default()
        };
        let picker = ImagePicker::from_config(&config, capabilities).unwrap();
        assert_eq!(picker.kind(), PickerKind::ContentProvider);
        assert!(picker.content_provider().is_some());
    }

    #[test]
    fn test_from_config_missing_capability() {
        let mut config = PickerConfig::default();
        config.kind = PickerKind::ContentProvider;
        let capabilities = Capabilities {
            content_resolver: Some(Arc::new(FakeResolver::new())),
            ..Default::default()
        };
        let result = ImagePicker::from_config(&config, capabilities);
        assert!(matches!(
            result,
            Err(ConfigError::MissingCapability {
                capability: "activity launcher",
                ..
            })
        ));

        config.kind = PickerKind::Dialog;
        let result = ImagePicker::from_config(&config, Capabilities::default());
        assert!(matches!(result, Err(ConfigError::MissingCapability { .. })));
    }
}
