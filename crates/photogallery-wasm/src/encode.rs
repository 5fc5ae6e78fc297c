//! Data URL and acquisition-check bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_data_url, encode_data_url, check_fetched_response } from '@photogallery/wasm';
//!
//! const response = await fetch(url);
//! check_fetched_response(response.status, response.headers.get('content-type'));
//! const bytes = new Uint8Array(await response.arrayBuffer());
//! ```

use crate::types::js_error;
use photogallery_core::catalog::check_fetched_mime;
use photogallery_core::decode;
use photogallery_core::encode::{self, OUTPUT_MIME};
use wasm_bindgen::prelude::*;

/// Wrap PNG bytes as `data:image/png;base64,...`.
#[wasm_bindgen]
pub fn encode_data_url(png: &[u8]) -> String {
    encode::encode_data_url(png, OUTPUT_MIME)
}

/// Extract the bytes of a `data:image/...;base64,` URL.
#[wasm_bindgen]
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, JsValue> {
    encode::decode_data_url(url)
        .map(|(bytes, _mime)| bytes)
        .map_err(js_error)
}

/// MIME type sniffed from the leading bytes, if they are a supported image.
#[wasm_bindgen]
pub fn sniff_mime(bytes: &[u8]) -> Option<String> {
    decode::sniff_mime(bytes).map(str::to_string)
}

/// Reject non-2xx responses and non-image content types.
#[wasm_bindgen]
pub fn check_fetched_response(status: u16, content_type: Option<String>) -> Result<(), JsValue> {
    check_fetched_mime(status, content_type.as_deref()).map_err(js_error)
}
