//! Photo Gallery WASM - WebAssembly bindings for the photo gallery editor
//!
//! This crate exposes photogallery-core to the TypeScript widget.
//!
//! # Module Structure
//!
//! - `session` - The editor session with live preview
//! - `transform` - Crop geometry and one-shot composition
//! - `catalog` - Gallery listing, folder filtering and search
//! - `encode` - Data URLs and fetch checks
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, build_catalog } from '@photogallery/wasm';
//!
//! await init();
//!
//! const catalog = build_catalog(folderListing, itemListing, undefined);
//! const session = new JsEditSession(undefined);
//! session.open_for_new(catalog.folders());
//! ```

use wasm_bindgen::prelude::*;

mod catalog;
mod encode;
mod session;
mod transform;
mod types;

// Re-export public types
pub use catalog::{build_catalog, unique_file_name, JsCatalog};
pub use encode::{check_fetched_response, decode_data_url, encode_data_url, sniff_mime};
pub use session::JsEditSession;
pub use transform::{compose_png, resolve_crop};
pub use types::JsComposedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Route core tracing events to the browser console
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "photogallery wasm ready");
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
