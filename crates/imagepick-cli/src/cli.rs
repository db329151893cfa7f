//! Command implementations.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use imagepick_core::picker::CaptureSettings;
use imagepick_core::platform::RESULT_OK;
use imagepick_core::{
    read_orientation, resolve_path, Capabilities, ContentProviderPicker, ContentUri, ImagePicker,
    PickOutcome, Picker, PickerConfig, PickerKind, Rotation,
};
use tracing::info;

use crate::host::{default_storage_root, LocalFiles, RfdDialog, StdoutTarget};

type CliResult = Result<(), Box<dyn Error>>;

pub fn load_config(
    path: Option<&Path>,
    scratch: Option<PathBuf>,
) -> Result<PickerConfig, Box<dyn Error>> {
    let mut config = match path {
        Some(path) => PickerConfig::load(path)?,
        None => PickerConfig::default(),
    };
    if scratch.is_some() {
        config.scratch_root = scratch;
    }
    info!(scratch = %config.scratch_dir().path().display(), "Config loaded");
    Ok(config)
}

/// Print the notification path: the selected path, or an empty line on
/// cancel.
fn report(outcome: PickOutcome) -> CliResult {
    match outcome {
        PickOutcome::Failed(e) => Err(e.into()),
        outcome => {
            println!("{}", outcome.notification().unwrap_or_default());
            Ok(())
        }
    }
}

pub fn pick(config: &PickerConfig) -> CliResult {
    let mut config = config.clone();
    if config.kind != PickerKind::Dialog {
        info!(kind = ?config.kind, "Only the dialog picker is available on desktop");
        config.kind = PickerKind::Dialog;
    }

    let capabilities = Capabilities {
        file_dialog: Some(Arc::new(RfdDialog)),
        ..Default::default()
    };
    let picker = ImagePicker::from_config(&config, capabilities)?;
    report(picker.choose(Some(Arc::new(StdoutTarget))).wait())
}

pub fn orient(file: &Path) -> CliResult {
    let bytes = std::fs::read(file)?;
    let orientation = read_orientation(&bytes);
    let rotation = Rotation::from(orientation);
    match rotation.degrees() {
        Some(degrees) => println!("{orientation:?}: rotate {degrees}°"),
        None => println!("{orientation:?}: no rotation"),
    }
    Ok(())
}

pub fn normalize(config: &PickerConfig, file: &Path) -> CliResult {
    let file = std::fs::canonicalize(file)?;
    let host = Arc::new(LocalFiles::new(default_storage_root()));
    let picker = ContentProviderPicker::new(
        host.clone(),
        host.clone(),
        host.clone(),
        config.scratch_dir(),
        CaptureSettings::from(config),
    );

    let request = picker.choose(Some(Arc::new(StdoutTarget)));
    let request_code = host
        .last_request_code()
        .ok_or("get-content request was not launched")?;
    picker.on_activity_result(request_code, RESULT_OK, Some(ContentUri::from_file_path(&file)));
    report(request.wait())
}

pub fn resolve(config: &PickerConfig, uri: &str) -> CliResult {
    let uri = ContentUri::parse(uri)?;
    let host = LocalFiles::new(default_storage_root());
    println!("{}", resolve_path(&uri, &host, config.resolve_method));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagepick_core::PickError;

    #[test]
    fn test_report_failure_is_error() {
        let err = report(PickOutcome::Failed(PickError::Abandoned)).unwrap_err();
        assert_eq!(err.to_string(), PickError::Abandoned.to_string());
    }

    #[test]
    fn test_report_cancel_is_ok() {
        assert!(report(PickOutcome::Cancelled).is_ok());
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config, PickerConfig::default());
    }

    #[test]
    fn test_scratch_flag_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.scratch_root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_scratch_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picker.json");
        std::fs::write(&path, r#"{"app_name": "TestApp", "scratch_root": "/elsewhere"}"#)
            .unwrap();

        let flag = dir.path().join("scratch");
        let config = load_config(Some(&path), Some(flag.clone())).unwrap();
        assert_eq!(config.app_name, "TestApp");
        assert_eq!(config.scratch_root, Some(flag));
    }

    #[test]
    fn test_file_scratch_kept_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picker.json");
        std::fs::write(&path, r#"{"scratch_root": "/elsewhere"}"#).unwrap();

        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.scratch_root, Some(PathBuf::from("/elsewhere")));
    }
}
