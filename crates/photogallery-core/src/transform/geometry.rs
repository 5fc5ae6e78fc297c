//! Crop geometry: percentage crops → displayed pixels → source pixels.
//!
//! The crop widget works on the image as laid out on screen, which is usually
//! smaller than the decoded raster. A crop therefore goes through two scales:
//!
//! 1. [`CropRegion::to_pixels`] converts the percentage rectangle into
//!    displayed pixels for the current layout size.
//! 2. [`resolve`] scales displayed pixels into natural (source) pixels.

use serde::{Deserialize, Serialize};

use crate::Dimensions;

/// A crop rectangle in percent (0–100) of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole image, which is the crop every freshly loaded image starts with.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    /// True once the rectangle has a positive, finite area.
    pub fn is_complete(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Convert to displayed pixels for the given on-screen image size.
    pub fn to_pixels(&self, displayed: Dimensions) -> PixelCrop {
        let w = displayed.width as f64;
        let h = displayed.height as f64;
        PixelCrop {
            x: self.x / 100.0 * w,
            y: self.y / 100.0 * h,
            width: self.width / 100.0 * w,
            height: self.height / 100.0 * h,
        }
    }
}

impl Default for CropRegion {
    fn default() -> Self {
        Self::full()
    }
}

/// A completed crop in displayed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelCrop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelCrop {
    /// Finite, non-negative origin and positive size.
    fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// A crop rectangle in source (natural) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl AbsoluteRect {
    /// The full natural-pixel rectangle.
    pub fn full(natural: Dimensions) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: natural.width as f64,
            height: natural.height as f64,
        }
    }

    /// Width and height rounded to whole pixels, at least 1x1.
    pub fn pixel_size(&self) -> Dimensions {
        Dimensions::new(
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }
}

/// Resolve a completed crop into source-pixel coordinates.
///
/// Returns `None` when either size is zero (image not laid out or not
/// decoded yet); callers treat that as a silent no-op. A missing or malformed
/// crop (negative, NaN, empty) resolves to the full image. The result always
/// lies within `[0, natural.width] x [0, natural.height]`.
pub fn resolve(
    displayed: Dimensions,
    natural: Dimensions,
    crop: Option<&PixelCrop>,
) -> Option<AbsoluteRect> {
    if !displayed.has_area() || !natural.has_area() {
        return None;
    }

    let full = AbsoluteRect::full(natural);
    let Some(crop) = crop.filter(|c| c.is_well_formed()) else {
        return Some(full);
    };

    let scale_x = natural.width as f64 / displayed.width as f64;
    let scale_y = natural.height as f64 / displayed.height as f64;

    let x = (crop.x * scale_x).min(full.width);
    let y = (crop.y * scale_y).min(full.height);
    let width = (crop.width * scale_x).min(full.width - x);
    let height = (crop.height * scale_y).min(full.height - y);

    if width <= 0.0 || height <= 0.0 {
        return Some(full);
    }

    Some(AbsoluteRect {
        x,
        y,
        width,
        height,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
