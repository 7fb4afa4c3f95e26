//! Image decoding from upload bytes and PNG data URI encoding.

use crate::constants::PNG_DATA_URI_PREFIX;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use opencv::core::{Mat, Vector};
use opencv::imgcodecs::{self, IMREAD_COLOR};
use opencv::prelude::*;

/// Decode encoded image bytes (PNG, JPEG, ...) into a 3-channel BGR frame
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are empty or not a supported image
pub fn decode_image(bytes: &[u8]) -> Result<Mat> {
    if bytes.is_empty() {
        return Err(Error::Decode("empty payload".to_string()));
    }

    let buffer = Vector::<u8>::from_slice(bytes);
    let image = imgcodecs::imdecode(&buffer, IMREAD_COLOR).map_err(|e| Error::Decode(e.message))?;

    if image.empty() {
        return Err(Error::Decode(format!("{} bytes are not a recognised image", bytes.len())));
    }

    Ok(image)
}

/// Encode a frame as PNG bytes
///
/// # Errors
///
/// Returns [`Error::Encode`] if OpenCV rejects the frame
pub fn encode_png(image: &Mat) -> Result<Vec<u8>> {
    let mut buffer = Vector::<u8>::new();
    let written = imgcodecs::imencode(".png", image, &mut buffer, &Vector::<i32>::new())
        .map_err(|e| Error::Encode(e.message))?;

    if !written {
        return Err(Error::Encode("PNG encoder reported failure".to_string()));
    }

    Ok(buffer.to_vec())
}

/// Encode a frame as a `data:image/png;base64,...` URI
///
/// # Errors
///
/// Returns [`Error::Encode`] if PNG encoding fails
pub fn encode_data_uri(image: &Mat) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png)))
}

/// Decode a PNG data URI back into a frame
///
/// # Errors
///
/// Returns [`Error::Decode`] if the prefix, base64 payload, or image is invalid
pub fn decode_data_uri(uri: &str) -> Result<Mat> {
    let payload = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or_else(|| Error::Decode("not a PNG data URI".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::Decode(format!("invalid base64: {e}")))?;
    decode_image(&bytes)
}
