//! The editor dialog's session, exposed to JavaScript.
//!
//! `JsEditSession` pairs the core [`EditSession`] with a [`PreviewDriver`] so
//! the widget can push edits and pull the current preview.
//!
//! The setters only record edits. The preview is pulled: call `preview()`
//! once after a batch of setters (for example from the render loop). It
//! recomposes only when the compose inputs changed since the last call, and
//! returns `undefined` when the current inputs cannot be composed.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsEditSession({ resample: 'bilinear' });
//! session.open_for_new(folders);
//!
//! const ticket = session.begin_acquisition();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! session.acquire_source(ticket, bytes, file.name);
//!
//! session.rotate_by(90);
//! previewImg.src = session.preview()?.data_url() ?? '';
//!
//! const { record, isNew, dataUrl } = session.save();
//! ```

use crate::types::{js_error, JsComposedImage};
use photogallery_core::catalog::{Folder, FolderId, ImageContent, ImageRecord};
use photogallery_core::encode::{encode_data_url, OUTPUT_MIME};
use photogallery_core::filter::FilterKind;
use photogallery_core::preview::PreviewDriver;
use photogallery_core::session::{
    AcquireOutcome, AcquisitionTicket, EditSession, EditUpdate, MetadataUpdate, PersistenceError,
    SaveRequest,
};
use photogallery_core::transform::CropRegion;
use photogallery_core::{Dimensions, EditorConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Save result handed to the persistence glue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveOutput {
    record: ImageRecord,
    is_new: bool,
    /// The composed PNG as a data URL
    data_url: Option<String>,
}

impl From<SaveRequest> for SaveOutput {
    fn from(request: SaveRequest) -> Self {
        let data_url = match &request.record.content {
            ImageContent::Encoded(png) => Some(encode_data_url(png, OUTPUT_MIME)),
            ImageContent::Remote(_) => None,
        };
        Self {
            record: request.record,
            is_new: request.is_new,
            data_url,
        }
    }
}

#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
    preview: PreviewDriver,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Create a closed session. `config` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditSession, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };
        Ok(Self::from_core(EditSession::new(config)))
    }

    /// Current state: `empty`, `loaded`, `editing`, `saved` or `discarded`
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    /// Open for a new image. `folders` is an array of `{ id, name }`.
    pub fn open_for_new(&mut self, folders: JsValue) -> Result<(), JsValue> {
        let folders: Vec<Folder> = serde_wasm_bindgen::from_value(folders).map_err(js_error)?;
        self.preview.clear();
        self.inner.open_for_new(&folders);
        Ok(())
    }

    /// Open on a stored record whose image bytes have been fetched.
    pub fn open_for_edit(&mut self, record: JsValue, stored_bytes: &[u8]) -> Result<(), JsValue> {
        let record: ImageRecord = serde_wasm_bindgen::from_value(record).map_err(js_error)?;
        self.preview.clear();
        self.inner
            .open_for_edit(record, stored_bytes)
            .map_err(js_error)
    }

    /// Start acquiring an image; pass the ticket back to `acquire_source`.
    pub fn begin_acquisition(&mut self) -> Result<u64, JsValue> {
        self.inner
            .begin_acquisition()
            .map(|ticket| ticket.0)
            .map_err(js_error)
    }

    /// Finish an acquisition. Returns false if the ticket was stale.
    pub fn acquire_source(
        &mut self,
        ticket: u64,
        bytes: &[u8],
        file_name: Option<String>,
    ) -> Result<bool, JsValue> {
        let outcome = self
            .inner
            .acquire_source(AcquisitionTicket(ticket), bytes, file_name.as_deref())
            .map_err(js_error)?;
        Ok(outcome == AcquireOutcome::Applied)
    }

    pub fn rotate_by(&mut self, degrees: i32) -> Result<(), JsValue> {
        self.apply(EditUpdate::RotateBy(degrees))
    }

    pub fn set_rotation(&mut self, degrees: i32) -> Result<(), JsValue> {
        self.apply(EditUpdate::SetRotation(degrees))
    }

    /// Accepts `none`, `grayscale`, `sepia`, `invert` or the CSS form.
    pub fn set_filter(&mut self, filter: &str) -> Result<(), JsValue> {
        let kind: FilterKind = filter.parse().map_err(js_error)?;
        self.apply(EditUpdate::Filter(kind))
    }

    pub fn set_width(&mut self, width: u32) -> Result<(), JsValue> {
        self.apply(EditUpdate::Width(width))
    }

    pub fn set_height(&mut self, height: u32) -> Result<(), JsValue> {
        self.apply(EditUpdate::Height(height))
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.apply(EditUpdate::Dimensions(Dimensions::new(width, height)))
    }

    /// Crop (percent) while the user drags.
    pub fn crop_in_progress(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), JsValue> {
        self.apply(EditUpdate::CropInProgress(CropRegion::new(x, y, width, height)))
    }

    /// Crop (percent) when the drag ends.
    pub fn complete_crop(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), JsValue> {
        self.apply(EditUpdate::CompleteCrop(CropRegion::new(x, y, width, height)))
    }

    /// On-screen size of the image inside the crop widget.
    pub fn set_display_size(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.apply(EditUpdate::DisplaySize(Dimensions::new(width, height)))
    }

    pub fn set_title(&mut self, title: String) -> Result<(), JsValue> {
        self.apply_metadata(MetadataUpdate::Title(title))
    }

    pub fn set_description(&mut self, description: String) -> Result<(), JsValue> {
        self.apply_metadata(MetadataUpdate::Description(description))
    }

    pub fn set_copyright(&mut self, copyright: String) -> Result<(), JsValue> {
        self.apply_metadata(MetadataUpdate::Copyright(copyright))
    }

    pub fn set_name(&mut self, name: String) -> Result<(), JsValue> {
        self.apply_metadata(MetadataUpdate::Name(name))
    }

    pub fn set_folder(&mut self, folder_id: Option<u32>) -> Result<(), JsValue> {
        self.apply_metadata(MetadataUpdate::Folder(folder_id.map(FolderId)))
    }

    /// Current rotation, filter and target size.
    pub fn params(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.params()).map_err(js_error)
    }

    /// Metadata as entered so far.
    pub fn draft(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.draft()).map_err(js_error)
    }

    /// CSS `filter` value matching the selected filter.
    pub fn filter_css(&self) -> String {
        self.inner.params().filter.css().to_string()
    }

    /// Recompose if the inputs changed since the last call and return the
    /// current preview. Setters never refresh it on their own.
    pub fn preview(&mut self) -> Result<Option<JsComposedImage>, JsValue> {
        self.preview.refresh(&self.inner).map_err(js_error)?;
        Ok(self.preview.current().map(JsComposedImage::from))
    }

    /// Finalize into `{ record, isNew, dataUrl }`.
    pub fn save(&mut self) -> Result<JsValue, JsValue> {
        let request = self.inner.save().map_err(js_error)?;
        serde_wasm_bindgen::to_value(&SaveOutput::from(request)).map_err(js_error)
    }

    /// Save as a new image; `gallery_count` is the number of images shown.
    pub fn copy_and_save(&mut self, gallery_count: u32) -> Result<JsValue, JsValue> {
        let request = self
            .inner
            .copy_and_save(gallery_count as usize)
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&SaveOutput::from(request)).map_err(js_error)
    }

    /// Report a failed save; returns the message to show.
    pub fn save_failed(&mut self, message: String) -> String {
        self.inner.save_failed(PersistenceError(message)).to_string()
    }

    pub fn close(&mut self) {
        self.inner.close();
        self.preview.clear();
    }
}

impl JsEditSession {
    pub(crate) fn from_core(inner: EditSession) -> Self {
        Self {
            inner,
            preview: PreviewDriver::new(),
        }
    }

    fn apply(&mut self, update: EditUpdate) -> Result<(), JsValue> {
        self.inner.update(update).map_err(js_error)
    }

    fn apply_metadata(&mut self, update: MetadataUpdate) -> Result<(), JsValue> {
        self.inner.update_metadata(update).map_err(js_error)
    }
}
