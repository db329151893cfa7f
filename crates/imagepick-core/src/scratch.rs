//! Scratch directory for working copies of picked images.
//!
//! One `ScratchDir` is created at startup and shared by every picker. The
//! directory is created on first use and never cleaned up here; it relies on
//! the OS temp-cleanup policy.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

const IMAGES_SUBDIR: &str = "images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Scratch directory at `<root>/images`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join(IMAGES_SUBDIR),
        }
    }

    /// The per-platform default location for `app_name`.
    ///
    /// Linux and macOS use `/var/tmp`, which survives reboots unlike `/tmp`;
    /// everything else uses the OS temp directory.
    pub fn platform_default(app_name: &str) -> Self {
        let base = if cfg!(any(target_os = "linux", target_os = "macos")) {
            PathBuf::from("/var/tmp")
        } else {
            std::env::temp_dir()
        };
        Self::new(base.join(app_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure(&self) -> io::Result<&Path> {
        if !self.path.is_dir() {
            fs::create_dir_all(&self.path)?;
            debug!(path = %self.path.display(), "Created scratch directory");
        }
        Ok(&self.path)
    }

    /// Whether `path` lies directly inside the scratch directory.
    pub fn contains(&self, path: &Path) -> bool {
        path.parent() == Some(self.path.as_path())
    }

    /// Copy `src` byte-for-byte into the scratch directory under its own
    /// file name. An existing file with that name is overwritten.
    pub fn copy_in(&self, src: &Path) -> io::Result<PathBuf> {
        let name = src.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", src.display()),
            )
        })?;

        let dest = self.ensure()?.join(name);
        fs::copy(src, &dest)?;
        debug!(from = %src.display(), to = %dest.display(), "Image copied to scratch");
        Ok(dest)
    }

    /// Reserve a fresh timestamp-based `.jpg` path. The file is created
    /// empty, so concurrent callers never receive the same name.
    pub fn unique_jpeg_path(&self) -> io::Result<PathBuf> {
        self.reserve_jpeg().map(|(path, _)| path)
    }

    /// Write `bytes` to a freshly reserved `.jpg` file. A failed write
    /// removes the partial file.
    pub fn write_unique_jpeg(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        let (path, file) = self.reserve_jpeg()?;
        fill_or_discard(&path, file, bytes)?;
        Ok(path)
    }

    fn reserve_jpeg(&self) -> io::Result<(PathBuf, File)> {
        let dir = self.ensure()?;
        let now = Utc::now();
        let stem = format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros());

        let mut candidate = dir.join(format!("{stem}.jpg"));
        let mut n = 1;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = dir.join(format!("{stem}-{n}.jpg"));
                    n += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn fill_or_discard(path: &Path, mut out: impl Write, bytes: &[u8]) -> io::Result<()> {
    let written = out.write_all(bytes).and_then(|()| out.flush());
    if written.is_err() {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial copy");
        }
    }
    written
}
