//! Image decoding for acquired bytes.
//!
//! This module provides functionality for:
//! - Sniffing and decoding PNG, JPEG, GIF, WebP and BMP bytes into RGBA
//! - Applying EXIF orientation so the raster matches what the browser shows
//! - Exact-size resampling for the compositor's stretch step
//!
//! # Architecture
//!
//! Decoding is synchronous and single-threaded. Acquisition (file reads, URL
//! fetches, clipboard reads) happens outside the core; only the resolved bytes
//! reach this module.

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, get_orientation, sniff_mime};
pub use resize::resize;
pub use types::{DecodeError, Orientation, RasterImage, ResampleFilter};
