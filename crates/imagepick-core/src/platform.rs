//! Host capabilities the pickers depend on.
//!
//! Everything that would otherwise be a native call (content resolver,
//! activity launch, permission prompt, file dialog, UI widget) is a trait
//! here, so the pickers run unchanged against a real host or a test double.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::uri::ContentUri;

/// Permission needed to read picked content on Android.
pub const WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";

/// Activity result code for a completed pick.
pub const RESULT_OK: i32 = -1;
/// Activity result code for a dismissed pick.
pub const RESULT_CANCELED: i32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Platform error: {0}")]
    Other(String),
}

impl PlatformError {
    pub fn is_permission_problem(&self) -> bool {
        matches!(self, PlatformError::PermissionDenied(_))
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => PlatformError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => PlatformError::PermissionDenied(e.to_string()),
            _ => PlatformError::Other(e.to_string()),
        }
    }
}

/// A `WHERE` clause with `?` placeholders and their arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<String>,
}

impl Selection {
    pub fn new(clause: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }

    /// `_id=?` matching a single row.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new("_id=?", vec![id.into()])
    }
}

/// Answers content-URI queries and opens content streams.
pub trait ContentResolver: Send + Sync {
    /// Open a fresh stream over the content behind `uri`.
    ///
    /// A stream can be read only once; call again for a second read.
    fn open_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>, PlatformError>;

    /// Read `column` from the first row matching `selection` in the table
    /// behind `uri`. `Ok(None)` means no row.
    fn query_data_column(
        &self,
        uri: &ContentUri,
        column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, PlatformError>;

    /// Root of the device's public external storage.
    fn external_storage_root(&self) -> PathBuf;
}

/// Starts the native "get content" activity.
pub trait ActivityLauncher: Send + Sync {
    /// Launch and return immediately; the result arrives later as an
    /// activity result carrying `request_code`.
    fn start_get_content(&self, request_code: i32, mime_type: &str) -> Result<(), PlatformError>;
}

pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, permission: &str) -> bool;

    /// Ask the user for `permission`. Does not wait for the answer.
    fn request(&self, permission: &str);
}

/// Extension filter shown by a native file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn images(extensions: &[String]) -> Self {
        Self {
            name: "Image".to_string(),
            extensions: extensions.to_vec(),
        }
    }
}

/// A blocking native "choose file" dialog.
pub trait FileDialog: Send + Sync {
    /// Show the dialog and wait for it. `None` means the user cancelled.
    fn pick_file(&self, filter: &FileFilter) -> Option<PathBuf>;
}

/// Anything with a settable text field, such as a label.
///
/// May be called from a worker thread; implementations post the update to
/// their UI thread.
pub trait TextTarget: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Tells the gallery that a file exists at `path`.
pub trait MediaScanner: Send + Sync {
    fn scan(&self, path: &Path);
}
