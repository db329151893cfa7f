//! Content URI to filesystem path resolution.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::{
    document_id, ContentUri, AUDIO_MEDIA_URI, DATA_COLUMN, DOWNLOADS_AUTHORITY,
    EXTERNAL_STORAGE_AUTHORITY, GOOGLE_PHOTOS_AUTHORITY, IMAGES_MEDIA_URI, MEDIA_AUTHORITY,
    PUBLIC_DOWNLOADS_URI, VIDEO_MEDIA_URI,
};
use crate::platform::{ContentResolver, Selection};

/// Which resolution strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMethod {
    /// Dispatch on the document provider authority.
    #[default]
    DocumentProvider,
    /// Query the images table for the URI directly, falling back to its path.
    LegacyImagesTable,
}

/// Media table named by the type half of a media document ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn from_document_type(doc_type: &str) -> Option<Self> {
        match doc_type {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "audio" => Some(MediaKind::Audio),
            _ => None,
        }
    }

    pub fn table_uri(self) -> &'static str {
        match self {
            MediaKind::Image => IMAGES_MEDIA_URI,
            MediaKind::Video => VIDEO_MEDIA_URI,
            MediaKind::Audio => AUDIO_MEDIA_URI,
        }
    }
}

/// Best-effort real filesystem path for `uri`.
///
/// Returns an empty string when the URI cannot be mapped. Query failures are
/// logged and treated like a missing row.
pub fn resolve_path(
    uri: &ContentUri,
    resolver: &dyn ContentResolver,
    method: ResolveMethod,
) -> String {
    let path = match method {
        ResolveMethod::DocumentProvider => resolve_by_provider(uri, resolver),
        ResolveMethod::LegacyImagesTable => resolve_legacy(uri, resolver),
    };
    debug!(%uri, path = %path, ?method, "Resolved content URI");
    path
}

fn resolve_by_provider(uri: &ContentUri, resolver: &dyn ContentResolver) -> String {
    if let Some(doc_id) = document_id(uri) {
        return match uri.authority() {
            Some(EXTERNAL_STORAGE_AUTHORITY) => {
                debug!("ExternalStorageProvider");
                external_storage_path(&doc_id, resolver)
            }
            Some(DOWNLOADS_AUTHORITY) => {
                debug!("DownloadsProvider");
                downloads_path(uri, &doc_id, resolver)
            }
            Some(MEDIA_AUTHORITY) => {
                debug!("MediaProvider");
                media_path(&doc_id, resolver)
            }
            other => {
                debug!(authority = ?other, "Unknown document provider");
                String::new()
            }
        };
    }

    match uri.scheme() {
        "content" => {
            debug!("MediaStore (and general)");
            if uri.authority() == Some(GOOGLE_PHOTOS_AUTHORITY) {
                uri.last_path_segment().unwrap_or_default()
            } else {
                String::new()
            }
        }
        "file" => uri.path(),
        _ => String::new(),
    }
}

fn external_storage_path(doc_id: &str, resolver: &dyn ContentResolver) -> String {
    match doc_id.split_once(':') {
        Some((_volume, relative)) => {
            format!("{}/{}", resolver.external_storage_root().display(), relative)
        }
        None => {
            warn!(doc_id, "External storage document ID without volume prefix");
            String::new()
        }
    }
}

fn downloads_path(uri: &ContentUri, doc_id: &str, resolver: &dyn ContentResolver) -> String {
    match doc_id.parse::<i64>() {
        Ok(id) => match ContentUri::parse(PUBLIC_DOWNLOADS_URI) {
            Ok(table) => {
                query_data(resolver, &table.with_appended_id(id), None).unwrap_or_default()
            }
            Err(e) => {
                error!(error = %e, "Bad downloads table URI");
                String::new()
            }
        },
        // Some OS versions hand out `raw:<path>` IDs instead of row numbers.
        Err(_) => {
            debug!(doc_id, "Non-numeric downloads ID");
            uri.path().replace("/document/raw:", "").replace("raw:", "")
        }
    }
}

fn media_path(doc_id: &str, resolver: &dyn ContentResolver) -> String {
    let (doc_type, row_id) = doc_id.split_once(':').unwrap_or((doc_id, ""));

    let Some(kind) = MediaKind::from_document_type(doc_type) else {
        error!(doc_type, "Cannot determine media document type");
        return String::new();
    };

    let table = match ContentUri::parse(kind.table_uri()) {
        Ok(table) => table,
        Err(e) => {
            error!(error = %e, "Bad media table URI");
            return String::new();
        }
    };

    let selection = Selection::by_id(row_id);
    query_data(resolver, &table, Some(&selection)).unwrap_or_default()
}

fn resolve_legacy(uri: &ContentUri, resolver: &dyn ContentResolver) -> String {
    query_data(resolver, uri, None).unwrap_or_else(|| uri.path())
}

fn query_data(
    resolver: &dyn ContentResolver,
    uri: &ContentUri,
    selection: Option<&Selection>,
) -> Option<String> {
    match resolver.query_data_column(uri, DATA_COLUMN, selection) {
        Ok(value) => value,
        Err(e) => {
            warn!(%uri, error = %e, "Data column query failed");
            None
        }
    }
}
