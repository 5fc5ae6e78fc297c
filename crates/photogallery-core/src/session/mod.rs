//! The edit session state machine.
//!
//! One session backs the editor dialog. It owns the decoded source, the crop
//! and the edit parameters, and turns them into a [`SaveRequest`] when the
//! user saves.
//!
//! ```text
//!            open_for_new          acquire_source           update
//! (closed) ───────────────> Empty ───────────────> Loaded ─────────> Editing
//!     │                                              ▲  │              │
//!     │      open_for_edit                           │  └──── save ────┤
//!     └──────────────────────────────────────────────┘                 ▼
//!                                              Editing <─ save_failed ─ Saved
//!
//! close(): any state -> Discarded
//! ```
//!
//! Acquisition is asynchronous on the widget side. [`EditSession::begin_acquisition`]
//! hands out a ticket for the current generation; closing, reopening or
//! starting another acquisition moves the generation on, and results carrying
//! an older ticket are dropped.

mod types;

pub use types::{
    AcquireOutcome, AcquisitionTicket, EditUpdate, MetadataUpdate, PersistenceError, SaveRequest,
    SessionError, SessionMode, SessionState, ValidationError,
};

use crate::catalog::{Folder, ImageContent, ImageRecord};
use crate::compose::{canvas_fits, compose_png, ComposeRequest};
use crate::config::EditorConfig;
use crate::decode::{decode_image, RasterImage};
use crate::transform::{resolve, AbsoluteRect, CropRegion};
use crate::{Dimensions, EditParameters};

#[derive(Debug, Clone)]
pub struct EditSession {
    config: EditorConfig,
    state: SessionState,
    mode: SessionMode,
    generation: u64,
    source: Option<RasterImage>,
    source_revision: u64,
    draft: ImageRecord,
    params: EditParameters,
    crop: Option<CropRegion>,
    /// Last completed crop, in percent; scaled with the current layout size
    completed_crop: Option<CropRegion>,
    displayed: Dimensions,
}

impl EditSession {
    /// Create a closed session.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            state: SessionState::Discarded,
            mode: SessionMode::New,
            generation: 0,
            source: None,
            source_revision: 0,
            draft: ImageRecord::blank(None),
            params: EditParameters::default(),
            crop: None,
            completed_crop: None,
            displayed: Dimensions::default(),
        }
    }

    /// Open the editor for a new image, preselecting the first folder.
    pub fn open_for_new(&mut self, folders: &[Folder]) {
        self.reset();
        self.mode = SessionMode::New;
        self.draft = ImageRecord::blank(folders.first().map(|f| f.id));
        self.state = SessionState::Empty;

        tracing::info!(folder = ?self.draft.folder_id, "opened editor for new image");
    }

    /// Open the editor on a stored image.
    ///
    /// Geometry always restarts from a clean slate: rotation 0, no filter,
    /// no crop. If the stored bytes cannot be decoded the session stays open
    /// in `Empty` so another image can be acquired, and the error is returned.
    pub fn open_for_edit(
        &mut self,
        record: ImageRecord,
        stored_bytes: &[u8],
    ) -> Result<(), SessionError> {
        self.reset();
        self.draft = record.clone();
        self.mode = SessionMode::Edit(Box::new(record));
        self.state = SessionState::Empty;

        let image = decode_image(stored_bytes, self.config.apply_exif_orientation)?;
        self.load_source(image);

        tracing::info!(id = ?self.draft.id, "opened editor on stored image");
        Ok(())
    }

    /// Start an acquisition; any earlier outstanding ticket becomes stale.
    pub fn begin_acquisition(&mut self) -> Result<AcquisitionTicket, SessionError> {
        self.require_open("acquire an image")?;
        self.generation += 1;
        Ok(AcquisitionTicket(self.generation))
    }

    /// Finish an acquisition with the fetched bytes.
    ///
    /// Stale tickets are ignored. A decode failure leaves the session as it was.
    pub fn acquire_source(
        &mut self,
        ticket: AcquisitionTicket,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> Result<AcquireOutcome, SessionError> {
        if ticket.0 != self.generation || !self.state.is_open() {
            tracing::warn!(
                ticket = ticket.0,
                generation = self.generation,
                "discarding stale acquisition"
            );
            return Ok(AcquireOutcome::Discarded);
        }

        let image = decode_image(bytes, self.config.apply_exif_orientation)?;
        self.load_source(image);
        if let Some(name) = file_name.filter(|n| !n.is_empty()) {
            self.draft.name = name.to_string();
        }

        tracing::info!(
            width = self.params.target.width,
            height = self.params.target.height,
            "acquired source image"
        );
        Ok(AcquireOutcome::Applied)
    }

    /// Apply an edit. Without a source this is a no-op.
    pub fn update(&mut self, update: EditUpdate) -> Result<(), SessionError> {
        if !self.state.is_open() {
            return Err(self.invalid("edit"));
        }

        if let EditUpdate::DisplaySize(size) = update {
            self.displayed = size;
            return Ok(());
        }

        if !self.state.has_source() {
            return Ok(());
        }

        match update {
            EditUpdate::RotateBy(step) => {
                let current = self.params.rotation_degrees;
                self.params.rotation_degrees = current
                    .checked_add(step)
                    .unwrap_or_else(|| self.params.normalized_rotation() + step.rem_euclid(360));
            }
            EditUpdate::SetRotation(degrees) => self.params.rotation_degrees = degrees,
            EditUpdate::Filter(kind) => self.params.filter = kind,
            EditUpdate::Width(width) => self.params.target.width = width,
            EditUpdate::Height(height) => self.params.target.height = height,
            EditUpdate::Dimensions(dims) => self.params.target = dims,
            EditUpdate::CropInProgress(region) => self.crop = Some(region),
            EditUpdate::CompleteCrop(region) => {
                self.crop = Some(region);
                self.completed_crop = region.is_complete().then_some(region);
            }
            EditUpdate::DisplaySize(_) => {}
        }

        self.state = SessionState::Editing;
        Ok(())
    }

    /// Change record metadata; does not affect the session state.
    pub fn update_metadata(&mut self, update: MetadataUpdate) -> Result<(), SessionError> {
        self.require_open("edit metadata")?;

        match update {
            MetadataUpdate::Title(title) => self.draft.title = title,
            MetadataUpdate::Description(description) => self.draft.description = description,
            MetadataUpdate::Copyright(copyright) => self.draft.copyright = copyright,
            MetadataUpdate::Name(name) => self.draft.name = name,
            MetadataUpdate::Folder(folder) => self.draft.folder_id = folder,
        }
        Ok(())
    }

    /// Compositor inputs for the current state.
    ///
    /// `None` without a source, or when a completed crop exists but the
    /// image has no on-screen size to scale it from.
    pub fn compose_request(&self) -> Option<ComposeRequest> {
        let source = self.source.as_ref()?;
        let natural = source.dimensions();

        let rect = match &self.completed_crop {
            Some(region) => {
                let crop = region.to_pixels(self.displayed);
                resolve(self.displayed, natural, Some(&crop))?
            }
            None => AbsoluteRect::full(natural),
        };

        Some(ComposeRequest {
            rect,
            rotation_degrees: self.params.rotation_degrees,
            filter: self.params.filter,
            output: self.params.target,
        })
    }

    /// Finalize the edit into a save request.
    pub fn save(&mut self) -> Result<SaveRequest, SessionError> {
        let mut record = self.finalize("save")?;
        let is_new = matches!(self.mode, SessionMode::New);
        if is_new {
            record.id = None;
        }
        if is_new && record.folder_id.is_none() {
            return Err(ValidationError::NoFolderSelected.into());
        }

        self.state = SessionState::Saved;
        tracing::info!(id = ?record.id, is_new, "saved edit");
        Ok(SaveRequest { record, is_new })
    }

    /// Save the edit as a new image next to the stored one.
    ///
    /// The id is dropped and the title becomes `title + copy_suffix + (N + 1)`
    /// where `N` is the number of images in the gallery.
    pub fn copy_and_save(&mut self, gallery_image_count: usize) -> Result<SaveRequest, SessionError> {
        if !matches!(self.mode, SessionMode::Edit(_)) {
            if !self.state.is_open() {
                return Err(self.invalid("copy and save"));
            }
            return Err(ValidationError::NotEditingExisting.into());
        }

        let mut record = self.finalize("copy and save")?;
        if record.folder_id.is_none() {
            return Err(ValidationError::NoFolderSelected.into());
        }
        record.id = None;
        record.title = format!(
            "{}{}{}",
            record.title,
            self.config.copy_suffix,
            gallery_image_count + 1
        );

        self.state = SessionState::Saved;
        tracing::info!(title = %record.title, "saved edit as copy");
        Ok(SaveRequest {
            record,
            is_new: true,
        })
    }

    /// The persistence collaborator failed; reopen the edit for another try.
    pub fn save_failed(&mut self, error: PersistenceError) -> SessionError {
        if self.state != SessionState::Saved {
            return self.invalid("report a failed save");
        }

        tracing::warn!(%error, "save failed, returning to editing");
        self.state = SessionState::Editing;
        error.into()
    }

    /// Close the editor, dropping the source and any pending acquisition.
    pub fn close(&mut self) {
        let was = self.state;
        self.reset();
        self.state = SessionState::Discarded;
        tracing::info!(from = %was, "closed editor");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&RasterImage> {
        self.source.as_ref()
    }

    /// Increases every time a new source is loaded.
    pub fn source_revision(&self) -> u64 {
        self.source_revision
    }

    pub fn params(&self) -> &EditParameters {
        &self.params
    }

    /// The crop as last reported, in percent; `None` until an image loads.
    pub fn crop(&self) -> Option<&CropRegion> {
        self.crop.as_ref()
    }

    pub fn completed_crop(&self) -> Option<&CropRegion> {
        self.completed_crop.as_ref()
    }

    pub fn displayed(&self) -> Dimensions {
        self.displayed
    }

    /// Metadata as currently entered.
    pub fn draft(&self) -> &ImageRecord {
        &self.draft
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.source = None;
        self.params = EditParameters::default();
        self.crop = None;
        self.completed_crop = None;
        self.displayed = Dimensions::default();
    }

    fn load_source(&mut self, image: RasterImage) {
        self.params = EditParameters::for_source(image.dimensions());
        self.crop = Some(CropRegion::full());
        self.completed_crop = None;
        self.source = Some(image);
        self.source_revision += 1;
        self.state = SessionState::Loaded;
    }

    /// Compose the final PNG into a copy of the draft record.
    fn finalize(&self, action: &'static str) -> Result<ImageRecord, SessionError> {
        match self.state {
            SessionState::Empty => return Err(ValidationError::NoSource.into()),
            SessionState::Loaded | SessionState::Editing => {}
            _ => return Err(self.invalid(action)),
        }

        let source = self.source.as_ref().ok_or(ValidationError::NoSource)?;
        let request = self
            .compose_request()
            .ok_or(ValidationError::GeometryUnavailable)?;
        let size = request.output_size(source.dimensions());
        if !canvas_fits(size) {
            return Err(ValidationError::OutputTooLarge {
                width: size.width,
                height: size.height,
            }
            .into());
        }
        let png = compose_png(source, &request, self.config.resample)?
            .ok_or(ValidationError::GeometryUnavailable)?;

        let mut record = self.draft.clone();
        record.content = ImageContent::Encoded(png);
        Ok(record)
    }

    fn require_open(&self, action: &'static str) -> Result<(), SessionError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FolderId, ImageId};
    use crate::decode::{DecodeError, ResampleFilter};
    use crate::encode::encode_png;
    use crate::filter::FilterKind;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 64, 255]);
            }
        }
        encode_png(&pixels, width, height).unwrap()
    }

    fn folders() -> Vec<Folder> {
        vec![
            Folder {
                id: FolderId(1),
                name: "Holidays".to_string(),
            },
            Folder {
                id: FolderId(2),
                name: "Pets".to_string(),
            },
        ]
    }

    fn stored_record() -> ImageRecord {
        ImageRecord {
            id: Some(ImageId(17)),
            folder_id: Some(FolderId(2)),
            name: "cat.png".to_string(),
            title: "Cat".to_string(),
            description: "A cat".to_string(),
            copyright: "me".to_string(),
            content: ImageContent::Remote("https://x/Pets/cat.png?v=1".to_string()),
        }
    }

    fn loaded_session(width: u32, height: u32) -> EditSession {
        let mut session = EditSession::default();
        session.open_for_new(&folders());
        let ticket = session.begin_acquisition().unwrap();
        session
            .acquire_source(ticket, &png_bytes(width, height), Some("upload.png"))
            .unwrap();
        session
    }

    fn decoded_content(request: &SaveRequest) -> image::RgbaImage {
        match &request.record.content {
            ImageContent::Encoded(bytes) => image::load_from_memory(bytes).unwrap().to_rgba8(),
            other => panic!("expected encoded content, got {:?}", other),
        }
    }

    #[test]
    fn test_new_session_is_closed() {
        let session = EditSession::default();
        assert_eq!(session.state(), SessionState::Discarded);
        assert!(session.source().is_none());
    }

    #[test]
    fn test_open_for_new_preselects_first_folder() {
        let mut session = EditSession::default();
        session.open_for_new(&folders());

        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.draft().folder_id, Some(FolderId(1)));
        assert_eq!(session.params(), &EditParameters::default());
    }

    #[test]
    fn test_save_without_source_fails() {
        let mut session = EditSession::default();
        session.open_for_new(&folders()[..1]);

        assert_eq!(
            session.save(),
            Err(SessionError::Validation(ValidationError::NoSource))
        );
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_acquire_resets_to_defaults() {
        let mut session = loaded_session(40, 20);
        session.update(EditUpdate::RotateBy(90)).unwrap();
        session.update(EditUpdate::Filter(FilterKind::Sepia)).unwrap();

        let ticket = session.begin_acquisition().unwrap();
        let outcome = session
            .acquire_source(ticket, &png_bytes(30, 10), Some("second.png"))
            .unwrap();

        assert_eq!(outcome, AcquireOutcome::Applied);
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.params().rotation_degrees, 0);
        assert_eq!(session.params().filter, FilterKind::None);
        assert_eq!(session.params().target, Dimensions::new(30, 10));
        assert_eq!(session.crop(), Some(&CropRegion::full()));
        assert!(session.completed_crop().is_none());
        assert_eq!(session.draft().name, "second.png");
        assert_eq!(session.source_revision(), 2);
    }

    #[test]
    fn test_stale_acquisition_discarded() {
        let mut session = EditSession::default();
        session.open_for_new(&folders());

        let first = session.begin_acquisition().unwrap();
        let second = session.begin_acquisition().unwrap();

        let outcome = session.acquire_source(first, &png_bytes(4, 4), None).unwrap();
        assert_eq!(outcome, AcquireOutcome::Discarded);
        assert_eq!(session.state(), SessionState::Empty);

        let outcome = session.acquire_source(second, &png_bytes(4, 4), None).unwrap();
        assert_eq!(outcome, AcquireOutcome::Applied);
    }

    #[test]
    fn test_acquisition_after_close_discarded() {
        let mut session = EditSession::default();
        session.open_for_new(&folders());
        let ticket = session.begin_acquisition().unwrap();
        session.close();

        let outcome = session.acquire_source(ticket, &png_bytes(4, 4), None).unwrap();
        assert_eq!(outcome, AcquireOutcome::Discarded);
        assert!(session.source().is_none());

        // Reopening does not revive the old ticket either
        session.open_for_new(&folders());
        let outcome = session.acquire_source(ticket, &png_bytes(4, 4), None).unwrap();
        assert_eq!(outcome, AcquireOutcome::Discarded);
    }

    #[test]
    fn test_decode_failure_leaves_session_untouched() {
        let mut session = loaded_session(8, 8);
        session.update(EditUpdate::Filter(FilterKind::Invert)).unwrap();

        let ticket = session.begin_acquisition().unwrap();
        let result = session.acquire_source(ticket, b"<html>not an image</html>", None);

        assert_eq!(
            result,
            Err(SessionError::Decode(DecodeError::InvalidFormat))
        );
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.params().filter, FilterKind::Invert);
        assert_eq!(session.source().map(|s| s.width), Some(8));
    }

    #[test]
    fn test_update_without_source_is_noop() {
        let mut session = EditSession::default();
        session.open_for_new(&folders());

        session.update(EditUpdate::RotateBy(90)).unwrap();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.params().rotation_degrees, 0);
    }

    #[test]
    fn test_update_moves_to_editing() {
        let mut session = loaded_session(8, 8);
        session.update(EditUpdate::RotateBy(-90)).unwrap();
        session.update(EditUpdate::RotateBy(-90)).unwrap();

        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.params().rotation_degrees, -180);
        assert_eq!(session.params().normalized_rotation(), 180);
    }

    #[test]
    fn test_display_size_does_not_count_as_edit() {
        let mut session = loaded_session(8, 8);
        session
            .update(EditUpdate::DisplaySize(Dimensions::new(4, 4)))
            .unwrap();

        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.displayed(), Dimensions::new(4, 4));
    }

    #[test]
    fn test_crop_in_progress_does_not_change_compose_inputs() {
        let mut session = loaded_session(20, 10);
        session
            .update(EditUpdate::DisplaySize(Dimensions::new(10, 5)))
            .unwrap();
        let before = session.compose_request();

        session
            .update(EditUpdate::CropInProgress(CropRegion::new(10.0, 10.0, 30.0, 30.0)))
            .unwrap();
        assert_eq!(session.compose_request(), before);

        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(10.0, 10.0, 30.0, 30.0)))
            .unwrap();
        assert_ne!(session.compose_request(), before);
    }

    #[test]
    fn test_incomplete_crop_clears_completed() {
        let mut session = loaded_session(20, 10);
        session
            .update(EditUpdate::DisplaySize(Dimensions::new(20, 10)))
            .unwrap();
        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(0.0, 0.0, 50.0, 50.0)))
            .unwrap();
        assert!(session.completed_crop().is_some());

        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(0.0, 0.0, 0.0, 50.0)))
            .unwrap();
        assert!(session.completed_crop().is_none());
    }

    #[test]
    fn test_left_half_scenario() {
        let mut session = loaded_session(1000, 500);
        session
            .update(EditUpdate::DisplaySize(Dimensions::new(500, 250)))
            .unwrap();
        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(0.0, 0.0, 50.0, 100.0)))
            .unwrap();
        session
            .update(EditUpdate::Dimensions(Dimensions::default()))
            .unwrap();

        let request = session.save().unwrap();
        let output = decoded_content(&request);

        assert_eq!(output.dimensions(), (500, 500));
        let source = session.source().unwrap();
        for (x, y) in [(0u32, 0u32), (499, 10), (123, 456)] {
            assert_eq!(output.get_pixel(x, y).0, source.pixel(x, y));
        }
    }

    #[test]
    fn test_crop_completed_before_layout() {
        let mut session = loaded_session(1000, 500);
        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(0.0, 0.0, 50.0, 100.0)))
            .unwrap();
        session
            .update(EditUpdate::DisplaySize(Dimensions::new(500, 250)))
            .unwrap();
        session
            .update(EditUpdate::Dimensions(Dimensions::default()))
            .unwrap();

        let request = session.compose_request().unwrap();
        assert_eq!(
            request.rect,
            AbsoluteRect {
                x: 0.0,
                y: 0.0,
                width: 500.0,
                height: 500.0,
            }
        );
        let saved = session.save().unwrap();
        assert_eq!(decoded_content(&saved).dimensions(), (500, 500));
    }

    #[test]
    fn test_crop_follows_layout_resize() {
        let mut session = loaded_session(1000, 500);
        session
            .update(EditUpdate::DisplaySize(Dimensions::new(500, 250)))
            .unwrap();
        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(50.0, 0.0, 50.0, 50.0)))
            .unwrap();
        let before = session.compose_request().unwrap().rect;

        session
            .update(EditUpdate::DisplaySize(Dimensions::new(250, 125)))
            .unwrap();
        assert_eq!(session.compose_request().unwrap().rect, before);
        assert_eq!(before.x, 500.0);
        assert_eq!(before.height, 250.0);
    }

    #[test]
    fn test_oversized_target_blocks_save() {
        let mut session = loaded_session(8, 8);
        session
            .update(EditUpdate::Dimensions(Dimensions::new(u32::MAX, u32::MAX)))
            .unwrap();

        assert_eq!(
            session.save(),
            Err(SessionError::Validation(ValidationError::OutputTooLarge {
                width: u32::MAX,
                height: u32::MAX,
            }))
        );
        assert_eq!(session.state(), SessionState::Editing);

        session
            .update(EditUpdate::Dimensions(Dimensions::new(16, 16)))
            .unwrap();
        assert!(session.save().is_ok());
    }

    #[test]
    fn test_crop_without_layout_blocks_save() {
        let mut session = loaded_session(20, 10);
        session
            .update(EditUpdate::CompleteCrop(CropRegion::new(0.0, 0.0, 50.0, 50.0)))
            .unwrap();

        assert!(session.compose_request().is_none());
        assert_eq!(
            session.save(),
            Err(SessionError::Validation(ValidationError::GeometryUnavailable))
        );
    }

    #[test]
    fn test_save_new_requires_folder() {
        let mut session = EditSession::default();
        session.open_for_new(&[]);
        let ticket = session.begin_acquisition().unwrap();
        session.acquire_source(ticket, &png_bytes(4, 4), None).unwrap();

        assert_eq!(
            session.save(),
            Err(SessionError::Validation(ValidationError::NoFolderSelected))
        );

        session
            .update_metadata(MetadataUpdate::Folder(Some(FolderId(3))))
            .unwrap();
        let request = session.save().unwrap();
        assert!(request.is_new);
        assert_eq!(request.record.folder_id, Some(FolderId(3)));
        assert_eq!(session.state(), SessionState::Saved);
    }

    #[test]
    fn test_save_new_carries_metadata() {
        let mut session = loaded_session(6, 6);
        session
            .update_metadata(MetadataUpdate::Title("Sunset".to_string()))
            .unwrap();
        session
            .update_metadata(MetadataUpdate::Copyright("ACME".to_string()))
            .unwrap();

        let request = session.save().unwrap();
        assert_eq!(request.record.id, None);
        assert_eq!(request.record.title, "Sunset");
        assert_eq!(request.record.copyright, "ACME");
        assert_eq!(request.record.name, "upload.png");
        assert_eq!(decoded_content(&request).dimensions(), (6, 6));
    }

    #[test]
    fn test_open_for_edit_starts_from_clean_slate() {
        let mut session = EditSession::default();
        session
            .open_for_edit(stored_record(), &png_bytes(12, 8))
            .unwrap();

        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.params().rotation_degrees, 0);
        assert_eq!(session.params().filter, FilterKind::None);
        assert!(session.completed_crop().is_none());
        assert_eq!(session.draft().title, "Cat");
        assert!(matches!(session.mode(), SessionMode::Edit(_)));
    }

    #[test]
    fn test_open_for_edit_with_bad_bytes() {
        let mut session = EditSession::default();
        let result = session.open_for_edit(stored_record(), &[]);

        assert_eq!(result, Err(SessionError::Decode(DecodeError::Empty)));
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.draft().id, Some(ImageId(17)));
    }

    #[test]
    fn test_save_existing_keeps_id() {
        let mut session = EditSession::default();
        session
            .open_for_edit(stored_record(), &png_bytes(12, 8))
            .unwrap();
        session.update(EditUpdate::RotateBy(180)).unwrap();

        let request = session.save().unwrap();
        assert!(!request.is_new);
        assert_eq!(request.record.id, Some(ImageId(17)));
        assert_eq!(request.record.folder_id, Some(FolderId(2)));
    }

    #[test]
    fn test_copy_and_save() {
        let mut session = EditSession::default();
        session
            .open_for_edit(stored_record(), &png_bytes(12, 8))
            .unwrap();

        let request = session.copy_and_save(9).unwrap();
        assert!(request.is_new);
        assert_eq!(request.record.id, None);
        assert_eq!(request.record.title, "Cat_Copy10");
        assert_eq!(request.record.name, "cat.png");
        assert_eq!(session.state(), SessionState::Saved);
    }

    #[test]
    fn test_copy_and_save_with_blank_title() {
        let mut record = stored_record();
        record.title = String::new();
        let mut session = EditSession::default();
        session.open_for_edit(record, &png_bytes(4, 4)).unwrap();

        let request = session.copy_and_save(9).unwrap();
        assert_eq!(request.record.title, "_Copy10");
    }

    #[test]
    fn test_copy_and_save_with_custom_suffix() {
        let config = EditorConfig {
            copy_suffix: " copy ".to_string(),
            ..EditorConfig::default()
        };
        let mut session = EditSession::new(config);
        session
            .open_for_edit(stored_record(), &png_bytes(2, 2))
            .unwrap();

        let request = session.copy_and_save(0).unwrap();
        assert_eq!(request.record.title, "Cat copy 1");
    }

    #[test]
    fn test_copy_and_save_requires_existing() {
        let mut session = loaded_session(4, 4);
        assert_eq!(
            session.copy_and_save(3),
            Err(SessionError::Validation(ValidationError::NotEditingExisting))
        );
    }

    #[test]
    fn test_save_failed_returns_to_editing() {
        let mut session = loaded_session(4, 4);
        let first = session.save().unwrap();

        let err = session.save_failed(PersistenceError("503".to_string()));
        assert_eq!(err, SessionError::Persistence(PersistenceError("503".to_string())));
        assert_eq!(session.state(), SessionState::Editing);

        // Retry without re-editing produces the same artifact
        let second = session.save().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_failed_outside_saved() {
        let mut session = loaded_session(4, 4);
        let err = session.save_failed(PersistenceError("x".to_string()));
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn test_saved_session_rejects_edits() {
        let mut session = loaded_session(4, 4);
        session.save().unwrap();

        assert!(matches!(
            session.update(EditUpdate::RotateBy(90)),
            Err(SessionError::InvalidTransition {
                state: SessionState::Saved,
                ..
            })
        ));
        assert!(matches!(
            session.save(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_close_from_any_state() {
        let mut session = loaded_session(4, 4);
        session.close();

        assert_eq!(session.state(), SessionState::Discarded);
        assert!(session.source().is_none());
        assert!(session.begin_acquisition().is_err());
        assert!(session
            .update_metadata(MetadataUpdate::Title("x".to_string()))
            .is_err());
    }

    #[test]
    fn test_resample_setting_reaches_compositor() {
        let config = EditorConfig {
            resample: ResampleFilter::Nearest,
            ..EditorConfig::default()
        };
        let mut session = EditSession::new(config);
        session.open_for_new(&folders());
        let ticket = session.begin_acquisition().unwrap();
        session.acquire_source(ticket, &png_bytes(4, 4), None).unwrap();
        session
            .update(EditUpdate::Dimensions(Dimensions::new(8, 8)))
            .unwrap();

        let output = decoded_content(&session.save().unwrap());
        // Nearest-neighbor doubling keeps pixel values exact
        assert_eq!(output.get_pixel(1, 1).0, [0, 0, 64, 255]);
        assert_eq!(output.get_pixel(7, 7).0, [3, 3, 64, 255]);
    }
}
