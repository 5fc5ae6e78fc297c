//! Output encoding for the photo gallery.
//!
//! This module provides functionality for:
//! - Encoding composed rasters to PNG
//! - Converting encoded bytes to and from base64 `data:` URLs
//!
//! # Examples
//!
//! ```ignore
//! use photogallery_core::encode::{encode_data_url, encode_png};
//!
//! let pixels = vec![128u8; 100 * 100 * 4];
//! let png = encode_png(&pixels, 100, 100).unwrap();
//! let url = encode_data_url(&png, "image/png");
//! ```

mod data_url;
mod png;

pub use data_url::{decode_data_url, encode_data_url};
pub use png::{encode_png, EncodeError};

/// MIME type of composed output.
pub const OUTPUT_MIME: &str = "image/png";
