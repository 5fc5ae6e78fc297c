//! Session states, events and errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{FolderId, ImageRecord};
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::filter::FilterKind;
use crate::transform::CropRegion;
use crate::Dimensions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Open, no source loaded
    Empty,
    /// Source decoded, parameters at their defaults
    Loaded,
    /// At least one parameter changed since loading
    Editing,
    /// Finalized into a save request
    Saved,
    /// Closed without saving
    Discarded,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loaded => "loaded",
            SessionState::Editing => "editing",
            SessionState::Saved => "saved",
            SessionState::Discarded => "discarded",
        }
    }

    /// True while the editor is open and accepting input.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            SessionState::Empty | SessionState::Loaded | SessionState::Editing
        )
    }

    pub fn has_source(self) -> bool {
        matches!(self, SessionState::Loaded | SessionState::Editing)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the session creates a new image or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    New,
    Edit(Box<ImageRecord>),
}

/// Changes to the edit parameters and crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum EditUpdate {
    /// Add to the accumulated rotation (e.g. +90 / -90)
    RotateBy(i32),
    SetRotation(i32),
    Filter(FilterKind),
    Width(u32),
    Height(u32),
    Dimensions(Dimensions),
    /// Crop rectangle while the user is still dragging
    CropInProgress(CropRegion),
    /// Crop rectangle once the drag ends
    CompleteCrop(CropRegion),
    /// On-screen size of the image being cropped
    DisplaySize(Dimensions),
}

/// Changes to the record metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum MetadataUpdate {
    Title(String),
    Description(String),
    Copyright(String),
    Name(String),
    Folder(Option<FolderId>),
}

/// Generation token handed out when an asynchronous acquisition starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcquisitionTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The bytes became the session's source
    Applied,
    /// The ticket was stale; the bytes were dropped
    Discarded,
}

/// What the persistence collaborator receives on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub record: ImageRecord,
    /// True when a new list item must be created
    pub is_new: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No image loaded")]
    NoSource,

    #[error("Please select a folder for the new image")]
    NoFolderSelected,

    #[error("Copy and save is only available when editing a stored image")]
    NotEditingExisting,

    #[error("The image has not been laid out yet")]
    GeometryUnavailable,

    #[error("Output size {width}x{height} is too large")]
    OutputTooLarge { width: u32, height: u32 },
}

/// Failure reported by the persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Saving failed: {0}")]
pub struct PersistenceError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Cannot {action} while the session is {state}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },
}
