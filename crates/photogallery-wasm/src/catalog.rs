//! Gallery catalog bindings.
//!
//! The widget fetches the folder and item listings and hands the raw JSON to
//! [`build_catalog`]; the returned `JsCatalog` answers the gallery view's
//! queries. Folder id `0` means "All Images".

use crate::types::js_error;
use photogallery_core::catalog::{self, Catalog, FolderFilter, RemoteFolder, RemoteItem};
use photogallery_core::EditorConfig;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsCatalog {
    inner: Catalog,
}

/// Build the catalog from the library listings.
///
/// `folders` and `items` are the listing arrays as returned by the library
/// (`Name`, `UniqueId`, `FileLeafRef`, `EncodedAbsUrl`, ...). `config` may be
/// `undefined`.
#[wasm_bindgen]
pub fn build_catalog(folders: JsValue, items: JsValue, config: JsValue) -> Result<JsCatalog, JsValue> {
    let folders: Vec<RemoteFolder> = serde_wasm_bindgen::from_value(folders).map_err(js_error)?;
    let items: Vec<RemoteItem> = serde_wasm_bindgen::from_value(items).map_err(js_error)?;
    let config: EditorConfig = if config.is_undefined() || config.is_null() {
        EditorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(js_error)?
    };

    let fetched_at = js_sys::Date::now() as u64;
    Ok(JsCatalog {
        inner: Catalog::build(&folders, &items, &config, fetched_at),
    })
}

#[wasm_bindgen]
impl JsCatalog {
    /// Visible folders as `{ id, name }`.
    pub fn folders(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.folders()).map_err(js_error)
    }

    /// Folders with their image counts, as `{ id, name, imageCount }`.
    pub fn folder_summaries(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.folder_summaries()).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn total_count(&self) -> usize {
        self.inner.total_count()
    }

    pub fn gallery_title(&self, folder_id: u32) -> String {
        self.inner.gallery_title(FolderFilter::from(folder_id))
    }

    /// Images in a folder (0 = all).
    pub fn filter_images(&self, folder_id: u32) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.images(FolderFilter::from(folder_id)))
            .map_err(js_error)
    }

    /// Images in a folder whose title contains `query`.
    pub fn search_images(&self, folder_id: u32, query: &str) -> Result<JsValue, JsValue> {
        let images = self.inner.images(FolderFilter::from(folder_id));
        let hits = catalog::search_by_title(images, query);
        serde_wasm_bindgen::to_value(&hits).map_err(js_error)
    }
}

/// File name that does not collide with `existing`, suffixed with the
/// current time when needed.
#[wasm_bindgen]
pub fn unique_file_name(name: &str, existing: Vec<String>) -> String {
    let now = js_sys::Date::now() as u64;
    catalog::unique_file_name(name, existing.iter().map(String::as_str), now)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_build_catalog_from_listing() {
        let folders = serde_wasm_bindgen::to_value(&vec![RemoteFolder {
            name: "Pets".to_string(),
            unique_id: "g1".to_string(),
        }])
        .unwrap();
        let items = serde_wasm_bindgen::to_value(&vec![RemoteItem {
            id: 7,
            file_leaf_ref: "cat.jpg".to_string(),
            encoded_abs_url: Some("https://x/Lib/Pets/cat.jpg".to_string()),
            ..RemoteItem::default()
        }])
        .unwrap();

        let catalog = build_catalog(folders, items, JsValue::UNDEFINED).unwrap();
        assert_eq!(catalog.total_count(), 1);

        let hits = catalog.search_images(1, "CAT").unwrap();
        assert_eq!(js_sys::Array::from(&hits).length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_build_catalog_rejects_garbage() {
        assert!(build_catalog(JsValue::from(42), JsValue::NULL, JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_unique_file_name_appends_timestamp() {
        let name = unique_file_name("a.png", vec!["a.png".to_string()]);
        assert!(name.starts_with("a_"));
        assert!(name.ends_with(".png"));
        assert_eq!(unique_file_name("b.png", vec!["a.png".to_string()]), "b.png");
    }
}
