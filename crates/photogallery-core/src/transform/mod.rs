//! Crop geometry, cropping and rotation.
//!
//! # Coordinate System
//!
//! - Crop regions arrive in percent of the displayed image and are resolved
//!   to natural pixels by [`resolve`]
//! - Rotation angles are integer degrees, positive = clockwise
//! - Origin is top-left corner

mod crop;
mod geometry;
mod rotation;

pub use crop::crop_rect;
pub use geometry::{resolve, AbsoluteRect, CropRegion, PixelCrop};
pub use rotation::{normalize_degrees, rotate_about_center};
