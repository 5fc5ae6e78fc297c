//! Photo Gallery Core - Image composition library
//!
//! This crate provides the editing core for the photo gallery: crop geometry,
//! the compositor, live preview, the edit session state machine and the
//! gallery catalog.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod decode;
pub mod encode;
pub mod filter;
pub mod luminance;
pub mod preview;
pub mod session;
pub mod transform;

pub use compose::{compose, compose_png, ComposeRequest};
pub use config::EditorConfig;
pub use filter::{apply_filter, FilterKind};
pub use transform::{crop_rect, resolve, rotate_about_center, AbsoluteRect, CropRegion, PixelCrop};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both sides are non-zero.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Edit parameters applied on top of the crop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditParameters {
    /// Accumulated rotation in degrees, unbounded (e.g. repeated -90 steps)
    pub rotation_degrees: i32,
    /// Color filter
    pub filter: FilterKind,
    /// Output size; 0 on either axis means "derive from crop"
    pub target: Dimensions,
}

impl EditParameters {
    /// Create parameters for a freshly loaded source of the given size
    pub fn for_source(natural: Dimensions) -> Self {
        Self {
            target: natural,
            ..Self::default()
        }
    }

    /// Rotation reduced to `0..360`
    pub fn normalized_rotation(&self) -> i32 {
        transform::normalize_degrees(self.rotation_degrees)
    }
}
