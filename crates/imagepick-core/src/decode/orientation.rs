//! EXIF orientation reading.

use std::io::{Cursor, Read};

use exif::{In, Reader, Tag};
use tracing::{debug, warn};

use super::Orientation;

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the tag cannot
/// be read.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(error = %e, "No readable EXIF data");
            return Orientation::Normal;
        }
    };

    let orientation = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default();

    debug!(?orientation, "Image orientation");
    orientation
}

/// Read the orientation from a stream.
///
/// The stream is consumed entirely, so pass one opened only for this call.
pub fn read_orientation_from<R: Read>(mut reader: R) -> Orientation {
    let mut bytes = Vec::new();
    if let Err(e) = reader.read_to_end(&mut bytes) {
        warn!(error = %e, "Failed to read stream for orientation");
        return Orientation::Normal;
    }
    read_orientation(&bytes)
}
