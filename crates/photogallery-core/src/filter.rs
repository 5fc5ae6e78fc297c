//! Color filters matching the CSS `filter` functions at 100% strength.
//!
//! Filters are per-pixel color transforms and leave alpha untouched, so
//! transparent canvas regions stay transparent.
//!
//! ## Matrices (W3C Filter Effects)
//! - `grayscale(100%)`: every channel = BT.709 luminance
//! - `sepia(100%)`: the standard sepia tone matrix
//! - `invert(100%)`: `255 - c` per color channel

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::RasterImage;
use crate::luminance::calculate_luminance_u8;

const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Filter selected in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Pixels pass through unmodified.
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
}

impl FilterKind {
    /// All filters in the order the editor offers them.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::None,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
    ];

    /// The equivalent CSS filter string, usable for a live `<img>` preview.
    pub fn css(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale(100%)",
            FilterKind::Sepia => "sepia(100%)",
            FilterKind::Invert => "invert(100%)",
        }
    }

    /// Short identifier used in configuration and the JS bindings.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    /// Accepts both the short identifier and the CSS string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|kind| normalized == kind.as_str() || normalized == kind.css())
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Apply a filter to an image in place.
pub fn apply_filter(image: &mut RasterImage, kind: FilterKind) {
    match kind {
        FilterKind::None => {}
        FilterKind::Grayscale => {
            for px in image.pixels.chunks_exact_mut(RasterImage::CHANNELS) {
                let lum = calculate_luminance_u8(px[0], px[1], px[2]);
                px[0] = lum;
                px[1] = lum;
                px[2] = lum;
            }
        }
        FilterKind::Sepia => {
            for px in image.pixels.chunks_exact_mut(RasterImage::CHANNELS) {
                let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
                for (channel, row) in SEPIA_MATRIX.iter().enumerate() {
                    let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
                    px[channel] = v.clamp(0.0, 255.0).round() as u8;
                }
            }
        }
        FilterKind::Invert => {
            for px in image.pixels.chunks_exact_mut(RasterImage::CHANNELS) {
                px[0] = 255 - px[0];
                px[1] = 255 - px[1];
                px[2] = 255 - px[2];
            }
        }
    }
}
