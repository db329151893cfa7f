//! Fixtures shared by unit tests.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::platform::{
    ActivityLauncher, ContentResolver, FileDialog, FileFilter, MediaScanner, PermissionGate,
    PlatformError, Selection, TextTarget,
};
use crate::uri::ContentUri;

/// A `width` x `height` image whose left half is red and right half is green.
pub fn sample_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 255, 0])
        }
    });
    DynamicImage::ImageRgb8(img)
}

pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode_as(sample_image(width, height), ImageFormat::Jpeg)
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    encode_as(sample_image(width, height), ImageFormat::Png)
}

fn encode_as(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Insert an APP1 EXIF segment holding only an orientation tag right after
/// the JPEG SOI marker.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let segment_len = (2 + 6 + tiff.len()) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + segment_len as usize + 2);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\x00\x00");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// In-memory content resolver.
pub struct FakeResolver {
    root: PathBuf,
    rows: HashMap<(String, Option<String>), String>,
    streams: HashMap<String, Vec<u8>>,
    query_error: Option<PlatformError>,
    stream_error: Option<PlatformError>,
    queries: Mutex<Vec<(String, Option<Selection>)>>,
    opens: Mutex<usize>,
}

impl Default for FakeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeResolver {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/storage/emulated/0"),
            rows: HashMap::new(),
            streams: HashMap::new(),
            query_error: None,
            stream_error: None,
            queries: Mutex::new(Vec::new()),
            opens: Mutex::new(0),
        }
    }

    /// A `_data` row for `uri`, optionally selected by `_id=?`.
    pub fn with_row(mut self, uri: &str, id: Option<&str>, value: &str) -> Self {
        self.rows
            .insert((uri.to_string(), id.map(str::to_string)), value.to_string());
        self
    }

    pub fn with_stream(mut self, uri: &str, bytes: Vec<u8>) -> Self {
        self.streams.insert(uri.to_string(), bytes);
        self
    }

    pub fn failing_queries(mut self, err: PlatformError) -> Self {
        self.query_error = Some(err);
        self
    }

    pub fn failing_streams(mut self, err: PlatformError) -> Self {
        self.stream_error = Some(err);
        self
    }

    pub fn queries(&self) -> Vec<(String, Option<Selection>)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn opens(&self) -> usize {
        *self.opens.lock().unwrap()
    }
}

impl ContentResolver for FakeResolver {
    fn open_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>, PlatformError> {
        *self.opens.lock().unwrap() += 1;
        if let Some(err) = &self.stream_error {
            return Err(err.clone());
        }
        self.streams
            .get(&uri.to_string())
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as Box<dyn Read + Send>)
            .ok_or_else(|| PlatformError::NotFound(uri.to_string()))
    }

    fn query_data_column(
        &self,
        uri: &ContentUri,
        _column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, PlatformError> {
        self.queries
            .lock()
            .unwrap()
            .push((uri.to_string(), selection.cloned()));
        if let Some(err) = &self.query_error {
            return Err(err.clone());
        }
        let id = selection.and_then(|s| s.args.first().cloned());
        Ok(self.rows.get(&(uri.to_string(), id)).cloned())
    }

    fn external_storage_root(&self) -> PathBuf {
        self.root.clone()
    }
}

/// File dialog that answers with a fixed selection, or waits for one.
pub struct FakeDialog {
    answer: Option<PathBuf>,
    release: Option<flume::Receiver<Option<PathBuf>>>,
    filters: Mutex<Vec<FileFilter>>,
}

impl FakeDialog {
    pub fn selecting(path: &Path) -> Self {
        Self {
            answer: Some(path.to_path_buf()),
            release: None,
            filters: Mutex::new(Vec::new()),
        }
    }

    pub fn cancelling() -> Self {
        Self {
            answer: None,
            release: None,
            filters: Mutex::new(Vec::new()),
        }
    }

    /// A dialog that stays open until an answer is sent.
    pub fn blocking() -> (Self, flume::Sender<Option<PathBuf>>) {
        let (tx, rx) = flume::unbounded();
        let dialog = Self {
            answer: None,
            release: Some(rx),
            filters: Mutex::new(Vec::new()),
        };
        (dialog, tx)
    }

    pub fn filters(&self) -> Vec<FileFilter> {
        self.filters.lock().unwrap().clone()
    }
}

impl FileDialog for FakeDialog {
    fn pick_file(&self, filter: &FileFilter) -> Option<PathBuf> {
        self.filters.lock().unwrap().push(filter.clone());
        match &self.release {
            Some(rx) => rx.recv().ok().flatten(),
            None => self.answer.clone(),
        }
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    launches: Mutex<Vec<(i32, String)>>,
    error: Mutex<Option<PlatformError>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, err: PlatformError) {
        *self.error.lock().unwrap() = Some(err);
    }

    pub fn launches(&self) -> Vec<(i32, String)> {
        self.launches.lock().unwrap().clone()
    }
}

impl ActivityLauncher for FakeLauncher {
    fn start_get_content(&self, request_code: i32, mime_type: &str) -> Result<(), PlatformError> {
        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }
        self.launches
            .lock()
            .unwrap()
            .push((request_code, mime_type.to_string()));
        Ok(())
    }
}

pub struct FakePermissions {
    granted: AtomicBool,
    requests: Mutex<Vec<String>>,
}

impl FakePermissions {
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn revoke(&self) {
        self.granted.store(false, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PermissionGate for FakePermissions {
    fn is_granted(&self, _permission: &str) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request(&self, permission: &str) {
        self.requests.lock().unwrap().push(permission.to_string());
    }
}

#[derive(Default)]
pub struct FakeScanner {
    scanned: Mutex<Vec<PathBuf>>,
}

impl FakeScanner {
    pub fn scanned(&self) -> Vec<PathBuf> {
        self.scanned.lock().unwrap().clone()
    }
}

impl MediaScanner for FakeScanner {
    fn scan(&self, path: &Path) {
        self.scanned.lock().unwrap().push(path.to_path_buf());
    }
}

/// Text target that remembers every update.
#[derive(Default)]
pub struct RecordingTarget {
    texts: Mutex<Vec<String>>,
}

impl RecordingTarget {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl TextTarget for RecordingTarget {
    fn set_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }
}
