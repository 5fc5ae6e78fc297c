//! WASM-compatible wrapper types.

use photogallery_core::decode::RasterImage;
use photogallery_core::encode::{encode_data_url, OUTPUT_MIME};
use photogallery_core::preview::Preview;
use wasm_bindgen::prelude::*;

/// A composed image, PNG encoded.
///
/// Returned by the live preview and by `compose_png`. The PNG bytes live in
/// WASM memory until `png()` or `data_url()` copies them out.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsComposedImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

#[wasm_bindgen]
impl JsComposedImage {
    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of PNG bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.png.len()
    }

    /// Returns the PNG bytes as Uint8Array (a copy).
    pub fn png(&self) -> Vec<u8> {
        self.png.clone()
    }

    /// `data:image/png;base64,...`, usable directly as an `<img>` source.
    pub fn data_url(&self) -> String {
        encode_data_url(&self.png, OUTPUT_MIME)
    }
}

impl JsComposedImage {
    pub(crate) fn new(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    pub(crate) fn from_raster(image: &RasterImage, png: Vec<u8>) -> Self {
        Self::new(image.width, image.height, png)
    }
}

impl From<&Preview> for JsComposedImage {
    fn from(preview: &Preview) -> Self {
        Self::new(preview.width, preview.height, preview.png.clone())
    }
}

/// Convert any displayable error into a JS exception value.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
