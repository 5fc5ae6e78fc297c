//! WASM bindings for crop geometry and one-shot composition.
//!
//! The editor normally goes through `JsEditSession`; these functions serve
//! callers that only need the geometry or a single compose.

use crate::types::{js_error, JsComposedImage};
use photogallery_core::compose::{compose, ComposeRequest};
use photogallery_core::decode::{decode_image, ResampleFilter};
use photogallery_core::encode::encode_png;
use photogallery_core::filter::FilterKind;
use photogallery_core::transform::{resolve, AbsoluteRect, CropRegion};
use photogallery_core::Dimensions;
use wasm_bindgen::prelude::*;

/// Resolve a percentage crop to source pixels.
///
/// # Returns
///
/// `[x, y, width, height]` in natural pixels, or `undefined` when either
/// size is zero (the image is not decoded or not laid out yet).
///
/// # Example (TypeScript)
///
/// ```typescript
/// const rect = resolve_crop(img.width, img.height, img.naturalWidth, img.naturalHeight,
///                           crop.x, crop.y, crop.width, crop.height);
/// ```
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn resolve_crop(
    displayed_width: u32,
    displayed_height: u32,
    natural_width: u32,
    natural_height: u32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Option<Vec<f64>> {
    let displayed = Dimensions::new(displayed_width, displayed_height);
    let natural = Dimensions::new(natural_width, natural_height);
    let px = CropRegion::new(x, y, width, height).to_pixels(displayed);

    resolve(displayed, natural, Some(&px)).map(|r| vec![r.x, r.y, r.width, r.height])
}

/// Decode `bytes` and compose them into a PNG.
///
/// # Arguments
///
/// * `rect` - `[x, y, width, height]` crop in natural pixels; empty for the full image
/// * `rotation_degrees` - Accumulated rotation, positive = clockwise
/// * `filter` - `none`, `grayscale`, `sepia`, `invert` (or the CSS form)
/// * `output_width`, `output_height` - Target size, 0 to derive from the crop
/// * `use_lanczos` - Lanczos3 resampling instead of bilinear
///
/// # Returns
///
/// The composed image, or `undefined` when there is nothing to draw.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn compose_png(
    bytes: &[u8],
    rect: &[f64],
    rotation_degrees: i32,
    filter: &str,
    output_width: u32,
    output_height: u32,
    use_lanczos: bool,
) -> Result<Option<JsComposedImage>, JsValue> {
    let source = decode_image(bytes, true).map_err(js_error)?;
    let filter: FilterKind = filter.parse().map_err(js_error)?;
    let resample = if use_lanczos {
        ResampleFilter::Lanczos3
    } else {
        ResampleFilter::Bilinear
    };

    let rect = match rect {
        [x, y, width, height] => AbsoluteRect {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        },
        _ => AbsoluteRect::full(source.dimensions()),
    };
    let request = ComposeRequest {
        rect,
        rotation_degrees,
        filter,
        output: Dimensions::new(output_width, output_height),
    };

    let Some(image) = compose(&source, &request, resample) else {
        return Ok(None);
    };
    let png = encode_png(&image.pixels, image.width, image.height).map_err(js_error)?;
    Ok(Some(JsComposedImage::from_raster(&image, png)))
}
