//! Picker backed by the Android "get content" activity.
//!
//! `choose` launches the activity and parks a pending job under a fresh
//! request code. The host later calls [`ContentProviderPicker::on_activity_result`]
//! from whatever thread delivers activity results; the job then runs the
//! capture pipeline:
//!
//! 1. Read the EXIF orientation from a fresh stream.
//! 2. Resolve the real path of the content URI.
//! 3. Decode a second fresh stream into a bitmap.
//! 4. Re-encode it as a timestamp-named JPEG in the scratch directory.
//! 5. Reject copies over the size limit.
//! 6. Rotate the copy upright.
//! 7. Update the target text and deliver the selection.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info, warn};

use super::{PickError, PickOutcome, PickRequest, PickResponder, Picker, SelectionResult};
use crate::config::PickerConfig;
use crate::decode::{decode_image_from, read_orientation_from, Rotation};
use crate::encode::encode_jpeg;
use crate::platform::{
    ActivityLauncher, ContentResolver, MediaScanner, PermissionGate, TextTarget, RESULT_OK,
    WRITE_EXTERNAL_STORAGE,
};
use crate::scratch::ScratchDir;
use crate::transform::correct_orientation_in_place;
use crate::uri::{resolve_path, ContentUri, ResolveMethod};

const IMAGE_MIME_TYPE: &str = "image/*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub jpeg_quality: u8,
    /// Inclusive limit in bytes.
    pub max_file_size: u64,
    pub resolve_method: ResolveMethod,
    pub base_request_code: i32,
}

impl From<&PickerConfig> for CaptureSettings {
    fn from(config: &PickerConfig) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality,
            max_file_size: config.max_file_size,
            resolve_method: config.resolve_method,
            base_request_code: config.request_code,
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self::from(&PickerConfig::default())
    }
}

struct PendingPick {
    target: Option<Arc<dyn TextTarget>>,
    responder: PickResponder,
}

pub struct ContentProviderPicker {
    resolver: Arc<dyn ContentResolver>,
    launcher: Arc<dyn ActivityLauncher>,
    permissions: Arc<dyn PermissionGate>,
    scanner: Option<Arc<dyn MediaScanner>>,
    scratch: ScratchDir,
    settings: CaptureSettings,
    next_request: AtomicI32,
    pending: Mutex<HashMap<i32, PendingPick>>,
}

impl ContentProviderPicker {
    pub fn new(
        resolver: Arc<dyn ContentResolver>,
        launcher: Arc<dyn ActivityLauncher>,
        permissions: Arc<dyn PermissionGate>,
        scratch: ScratchDir,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            resolver,
            launcher,
            permissions,
            scanner: None,
            scratch,
            settings,
            next_request: AtomicI32::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_media_scanner(mut self, scanner: Arc<dyn MediaScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Ask for storage permission unless it is already granted. Meant for
    /// app startup; picks do not check it up front.
    pub fn ensure_permission(&self) {
        if !self.permissions.is_granted(WRITE_EXTERNAL_STORAGE) {
            info!("Requesting storage permission");
            self.permissions.request(WRITE_EXTERNAL_STORAGE);
        }
    }

    /// Announce a file placed outside the app folder to the gallery.
    pub fn scan_file(&self, path: &Path) {
        match &self.scanner {
            Some(scanner) => scanner.scan(path),
            None => debug!(path = %path.display(), "No media scanner attached"),
        }
    }

    /// Number of picks waiting for an activity result.
    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    /// Deliver an activity result. Results for request codes this picker
    /// did not issue are ignored.
    pub fn on_activity_result(
        &self,
        request_code: i32,
        result_code: i32,
        data: Option<ContentUri>,
    ) {
        let Some(pending) = self.lock_pending().remove(&request_code) else {
            debug!(request_code, "Activity result for unknown request");
            return;
        };

        let outcome = match data {
            Some(uri) if result_code == RESULT_OK => match self.capture(&uri) {
                Ok(selection) => {
                    if let Some(target) = &pending.target {
                        target.set_text(&selection.display_text());
                    }
                    debug!(path = %selection.event_path(), "Image selected");
                    PickOutcome::Selected(selection)
                }
                Err(e) => {
                    self.recover(&e);
                    PickOutcome::Failed(e)
                }
            },
            _ => {
                debug!(request_code, result_code, "Pick cancelled");
                PickOutcome::Cancelled
            }
        };

        pending.responder.respond(outcome);
    }

    fn capture(&self, uri: &ContentUri) -> Result<SelectionResult, PickError> {
        let rotation = self.read_rotation(uri);

        let original_path =
            resolve_path(uri, self.resolver.as_ref(), self.settings.resolve_method);
        debug!(path = %original_path, "Real picture path");

        let stream = self.resolver.open_stream(uri)?;
        let bitmap = decode_image_from(stream)?;

        let jpeg = encode_jpeg(&bitmap, self.settings.jpeg_quality)?;
        let temp_path = self.scratch.write_unique_jpeg(&jpeg)?;

        let size = fs::metadata(&temp_path)?.len();
        if size > self.settings.max_file_size {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %e, "Failed to remove oversized copy");
            }
            return Err(PickError::FileTooLarge {
                size,
                limit: self.settings.max_file_size,
            });
        }

        if let Err(e) =
            correct_orientation_in_place(&temp_path, rotation, self.settings.jpeg_quality)
        {
            error!(path = %temp_path.display(), error = %e, "Failed to rotate image");
        }

        debug!(path = %temp_path.display(), size, "Image saved to scratch");
        Ok(SelectionResult {
            temp_path,
            original_path,
        })
    }

    /// Rotation needed to show the picked image upright. Unreadable streams
    /// count as no rotation.
    fn read_rotation(&self, uri: &ContentUri) -> Rotation {
        match self.resolver.open_stream(uri) {
            Ok(stream) => {
                let rotation = Rotation::from(read_orientation_from(stream));
                debug!(degrees = ?rotation.degrees(), "Image rotation");
                rotation
            }
            Err(e) => {
                error!(%uri, error = %e, "Cannot open stream for orientation");
                Rotation::None
            }
        }
    }

    fn recover(&self, e: &PickError) {
        match e {
            // Platform and I/O failures are treated as a missing storage
            // permission.
            PickError::Permission(_) | PickError::Platform(_) | PickError::Io(_) => {
                error!(error = %e, "Pick failed, requesting storage permission");
                self.permissions.request(WRITE_EXTERNAL_STORAGE);
            }
            PickError::FileTooLarge { .. } => warn!(error = %e, "Big file, pick rejected"),
            _ => error!(error = %e, "Pick failed"),
        }
    }

    fn next_request_code(&self) -> i32 {
        let offset = self.next_request.fetch_add(1, Ordering::Relaxed);
        self.settings.base_request_code.wrapping_add(offset)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<i32, PendingPick>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Picker for ContentProviderPicker {
    fn choose(&self, target: Option<Arc<dyn TextTarget>>) -> PickRequest {
        let (responder, request) = PickRequest::channel();
        let request_code = self.next_request_code();

        self.lock_pending()
            .insert(request_code, PendingPick { target, responder });

        debug!(request_code, "Starting get-content activity");
        if let Err(e) = self.launcher.start_get_content(request_code, IMAGE_MIME_TYPE) {
            let pending = self.lock_pending().remove(&request_code);
            let e = PickError::from(e);
            self.recover(&e);
            if let Some(pending) = pending {
                pending.responder.respond(PickOutcome::Failed(e));
            }
        }
        request
    }
}
