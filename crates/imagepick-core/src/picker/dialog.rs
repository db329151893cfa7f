//! Picker backed by a native "choose file" dialog.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use tracing::{debug, error};

use super::{PickError, PickOutcome, PickRequest, Picker, SelectionResult};
use crate::platform::{FileDialog, FileFilter, TextTarget};
use crate::scratch::ScratchDir;

pub struct DialogPicker {
    dialog: Arc<dyn FileDialog>,
    scratch: ScratchDir,
    filter: FileFilter,
}

impl DialogPicker {
    pub fn new(dialog: Arc<dyn FileDialog>, scratch: ScratchDir, extensions: &[String]) -> Self {
        Self {
            dialog,
            scratch,
            filter: FileFilter::images(extensions),
        }
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }
}

impl Picker for DialogPicker {
    fn choose(&self, target: Option<Arc<dyn TextTarget>>) -> PickRequest {
        debug!("DialogPicker start");
        let (responder, request) = PickRequest::channel();

        let dialog = Arc::clone(&self.dialog);
        let scratch = self.scratch.clone();
        let filter = self.filter.clone();

        let spawned = thread::Builder::new()
            .name("imagepick-dialog".to_string())
            .spawn(move || {
                let selection = dialog.pick_file(&filter);
                responder.respond(file_selection(&scratch, selection, target.as_deref()));
            });

        if let Err(e) = spawned {
            error!(error = %e, "Failed to start dialog thread");
            return PickRequest::ready(PickOutcome::Failed(PickError::Io(e)));
        }
        request
    }
}

/// Turn the dialog's answer into an outcome: copy the chosen file into
/// scratch, or report a cancel without touching the filesystem.
fn file_selection(
    scratch: &ScratchDir,
    selection: Option<PathBuf>,
    target: Option<&dyn TextTarget>,
) -> PickOutcome {
    let Some(path) = selection else {
        debug!("Dialog cancelled");
        return PickOutcome::Cancelled;
    };

    let temp_path = match scratch.copy_in(&path) {
        Ok(temp_path) => temp_path,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to copy image to scratch");
            return PickOutcome::Failed(PickError::Io(e));
        }
    };

    let selection = SelectionResult {
        temp_path,
        original_path: path.display().to_string(),
    };
    debug!(path = %selection.original_path, "Image selected");

    if let Some(target) = target {
        target.set_text(&selection.display_text());
    }
    PickOutcome::Selected(selection)
}
