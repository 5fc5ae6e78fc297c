//! Image decoding with format sniffing and EXIF orientation handling.
//!
//! Acquired bytes may come from a file input, a URL fetch, the clipboard or a
//! gallery re-fetch, so the format is never trusted from a file name. It is
//! guessed from the leading bytes instead.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, RasterImage};

/// Decode acquired image bytes into an RGBA raster.
///
/// # Arguments
///
/// * `bytes` - Raw encoded image bytes (PNG, JPEG, GIF, WebP or BMP)
/// * `apply_exif_orientation` - Rotate/flip according to the EXIF orientation
///   tag, the way browsers lay out `<img>` elements
///
/// # Errors
///
/// Returns `DecodeError::Empty` for empty input, `DecodeError::InvalidFormat`
/// if the bytes are not a recognized image format and
/// `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8], apply_exif_orientation: bool) -> Result<RasterImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;

    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(format);
    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if apply_exif_orientation {
        apply_orientation(img, extract_orientation(bytes))
    } else {
        img
    };

    let raster = RasterImage::from_rgba_image(img.into_rgba8());
    if raster.is_empty() {
        return Err(DecodeError::CorruptedFile("image has no pixels".to_string()));
    }

    tracing::debug!(
        format = ?format,
        width = raster.width,
        height = raster.height,
        "Decoded source image"
    );

    Ok(raster)
}

/// Guess the MIME type of encoded image bytes.
///
/// Returns `None` when the bytes do not start with a known image signature.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    Some(match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => return None,
    })
}

/// Extract EXIF orientation from encoded bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Extract the EXIF orientation value (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}
