//! Content URIs and best-effort mapping to real filesystem paths.
//!
//! A content URI is an opaque identifier handed out by a document provider.
//! [`resolve_path`] pattern-matches the provider authority and URI shape to
//! recover the file it most likely refers to. The mapping is a heuristic:
//! when it cannot decide it returns an empty string, never an error.

mod content_uri;
mod document;
mod resolver;

pub use content_uri::{ContentUri, UriError};
pub use document::{document_id, is_document_uri};
pub use resolver::{resolve_path, MediaKind, ResolveMethod};

pub const EXTERNAL_STORAGE_AUTHORITY: &str = "com.android.externalstorage.documents";
pub const DOWNLOADS_AUTHORITY: &str = "com.android.providers.downloads.documents";
pub const MEDIA_AUTHORITY: &str = "com.android.providers.media.documents";
pub const GOOGLE_PHOTOS_AUTHORITY: &str = "com.google.android.apps.photos.content";

pub const PUBLIC_DOWNLOADS_URI: &str = "content://downloads/public_downloads";
pub const IMAGES_MEDIA_URI: &str = "content://media/external/images/media";
pub const VIDEO_MEDIA_URI: &str = "content://media/external/video/media";
pub const AUDIO_MEDIA_URI: &str = "content://media/external/audio/media";

/// Column holding the absolute file path in media and downloads tables.
pub const DATA_COLUMN: &str = "_data";
