//! Decoding picked content into an in-memory bitmap.

use std::io::{Cursor, Read};

use image::{DynamicImage, ImageReader};

use super::DecodeError;

/// Decode an image from bytes. The format is guessed from the content, so
/// the content provider's declared MIME type does not matter.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for zero bytes and
/// `DecodeError::CorruptedFile` when the bytes do not decode.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::CorruptedFile("zero-sized image".to_string()));
    }
    Ok(img)
}

/// Read a stream to the end and decode it.
pub fn decode_image_from<R: Read>(mut reader: R) -> Result<DynamicImage, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_image(&bytes)
}
