//! Picker configuration, loaded once at startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::scratch::ScratchDir;
use crate::uri::ResolveMethod;

/// Largest accepted scratch copy, in bytes (15 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 15 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Picker {kind:?} needs a {capability} capability")]
    MissingCapability {
        kind: PickerKind,
        capability: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    /// Native "choose file" dialog.
    Dialog,
    /// Android "get content" activity and content resolver.
    ContentProvider,
}

impl Default for PickerKind {
    fn default() -> Self {
        if cfg!(target_os = "android") {
            PickerKind::ContentProvider
        } else {
            PickerKind::Dialog
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub kind: PickerKind,
    /// Name of the per-application folder under the temp root.
    pub app_name: String,
    /// Overrides the platform temp root; `images` is appended either way.
    pub scratch_root: Option<PathBuf>,
    pub jpeg_quality: u8,
    /// Inclusive limit on the re-encoded copy.
    pub max_file_size: u64,
    /// First activity request code; each pick takes the next one.
    pub request_code: i32,
    pub resolve_method: ResolveMethod,
    /// Extensions offered by the dialog filter, without the dot.
    pub extensions: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            kind: PickerKind::default(),
            app_name: "imagepick".to_string(),
            scratch_root: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            request_code: 1,
            resolve_method: ResolveMethod::default(),
            extensions: ["jpg", "png", "bmp", "jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PickerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if self.app_name.is_empty() || self.app_name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "app_name must be a single path component, got {:?}",
                self.app_name
            )));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("extensions must not be empty".to_string()));
        }
        Ok(())
    }

    /// The scratch directory handle shared by all pickers.
    pub fn scratch_dir(&self) -> ScratchDir {
        match &self.scratch_root {
            Some(root) => ScratchDir::new(root.join(&self.app_name)),
            None => ScratchDir::platform_default(&self.app_name),
        }
    }
}
