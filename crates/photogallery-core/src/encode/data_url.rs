//! `data:` URL helpers.
//!
//! Gallery records hold their pixels as base64 data URLs, and edited images
//! are handed back the same way.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::EncodeError;

const BASE64_MARKER: &str = ";base64,";

/// Wrap encoded bytes as a base64 `data:` URL.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{}{}{}", mime, BASE64_MARKER, STANDARD.encode(bytes))
}

/// Split a base64 `data:image/...` URL into its bytes and MIME type.
pub fn decode_data_url(url: &str) -> Result<(Vec<u8>, String), EncodeError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| EncodeError::InvalidDataUrl("missing data: scheme".to_string()))?;

    let (mime, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| EncodeError::InvalidDataUrl("not base64 encoded".to_string()))?;

    if !mime.starts_with("image/") {
        return Err(EncodeError::InvalidDataUrl(format!("not an image: {}", mime)));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| EncodeError::InvalidDataUrl(e.to_string()))?;

    Ok((bytes, mime.to_string()))
}
