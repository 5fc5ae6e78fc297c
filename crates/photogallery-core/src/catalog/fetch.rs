//! Checks on bytes fetched from a URL before they reach the decoder.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    /// The response is not an image
    #[error("Fetched content is not an image (content type: {0})")]
    NotAnImage(String),
}

/// Validate the status and `Content-Type` of a fetched image.
pub fn check_fetched_mime(status: u16, content_type: Option<&str>) -> Result<(), FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }

    let mime = content_type.unwrap_or_default();
    let essence = mime.split(';').next().unwrap_or_default().trim();
    if !essence.to_ascii_lowercase().starts_with("image/") {
        return Err(FetchError::NotAnImage(mime.to_string()));
    }

    Ok(())
}
