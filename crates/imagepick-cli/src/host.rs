//! Desktop implementations of the host capabilities.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use imagepick_core::platform::{
    ActivityLauncher, ContentResolver, FileDialog, FileFilter, PermissionGate, PlatformError,
    Selection, TextTarget,
};
use imagepick_core::ContentUri;
use tracing::debug;

/// Native dialog through `rfd`.
pub struct RfdDialog;

impl FileDialog for RfdDialog {
    fn pick_file(&self, filter: &FileFilter) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select an image")
            .add_filter(filter.name.as_str(), filter.extensions.as_slice())
            .pick_file()
    }
}

/// Text target that prints every update to stdout.
pub struct StdoutTarget;

impl TextTarget for StdoutTarget {
    fn set_text(&self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{text}") {
            debug!(error = %e, "Failed to write selection to stdout");
        }
    }
}

/// Serves `file:` URIs from the local filesystem and stands in for the
/// activity and permission services. Activity launches are only recorded;
/// the caller delivers the result itself.
pub struct LocalFiles {
    storage_root: PathBuf,
    launched: Mutex<Vec<i32>>,
}

impl LocalFiles {
    pub fn new(storage_root: PathBuf) -> Self {
        Self {
            storage_root,
            launched: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request_code(&self) -> Option<i32> {
        self.launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .copied()
    }

    fn local_path(uri: &ContentUri) -> Result<PathBuf, PlatformError> {
        if uri.scheme() != "file" {
            return Err(PlatformError::Unsupported(format!(
                "only file: URIs are served locally, got {uri}"
            )));
        }
        Ok(PathBuf::from(uri.path()))
    }
}

impl ContentResolver for LocalFiles {
    fn open_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>, PlatformError> {
        let path = Self::local_path(uri)?;
        let file = File::open(&path)?;
        Ok(Box::new(file))
    }

    fn query_data_column(
        &self,
        uri: &ContentUri,
        column: &str,
        _selection: Option<&Selection>,
    ) -> Result<Option<String>, PlatformError> {
        debug!(%uri, column, "No content tables on desktop");
        Ok(None)
    }

    fn external_storage_root(&self) -> PathBuf {
        self.storage_root.clone()
    }
}

impl ActivityLauncher for LocalFiles {
    fn start_get_content(&self, request_code: i32, mime_type: &str) -> Result<(), PlatformError> {
        debug!(request_code, mime_type, "Local get-content request");
        self.launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request_code);
        Ok(())
    }
}

impl PermissionGate for LocalFiles {
    fn is_granted(&self, _permission: &str) -> bool {
        true
    }

    fn request(&self, permission: &str) {
        debug!(permission, "Permissions are always granted on desktop");
    }
}

/// Home directory stand-in for external storage.
pub fn default_storage_root() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}
