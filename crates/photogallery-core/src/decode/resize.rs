//! Exact-size resampling used to stretch the crop onto the output canvas.

use super::{RasterImage, ResampleFilter};

/// Resize an image to exact dimensions, ignoring the source aspect ratio.
///
/// # Returns
///
/// `None` if either target dimension is zero or the source buffer does not
/// match its declared dimensions.
pub fn resize(
    image: &RasterImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Option<RasterImage> {
    if width == 0 || height == 0 || image.is_empty() {
        return None;
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Some(image.clone());
    }

    let rgba_image = image.to_rgba_image()?;
    let resized = image::imageops::resize(&rgba_image, width, height, filter.to_image_filter());

    Some(RasterImage::from_rgba_image(resized))
}
