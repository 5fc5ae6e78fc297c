//! Extracting the crop rectangle from the source raster.
//!
//! Coordinates are natural pixels as produced by [`super::resolve`]. Fractional
//! edges are rounded to the nearest pixel before copying.

use super::geometry::AbsoluteRect;
use crate::decode::RasterImage;

/// Copy the pixels under `rect` into a new image.
///
/// # Behavior
///
/// - Coordinates beyond the image bounds are clamped
/// - Minimum output dimension is 1x1 pixels
/// - A rectangle covering the whole image returns a copy of the source
pub fn crop_rect(image: &RasterImage, rect: &AbsoluteRect) -> RasterImage {
    let src_w = image.width as f64;
    let src_h = image.height as f64;

    // Fast path: full crop returns a clone
    if rect.x <= 0.0 && rect.y <= 0.0 && rect.width >= src_w && rect.height >= src_h {
        return image.clone();
    }

    let px_left = (rect.x.clamp(0.0, src_w)).round() as u32;
    let px_top = (rect.y.clamp(0.0, src_h)).round() as u32;
    let px_width = (rect.width.clamp(0.0, src_w)).round() as u32;
    let px_height = (rect.height.clamp(0.0, src_h)).round() as u32;

    // Clamp to image bounds
    let px_left = px_left.min(image.width.saturating_sub(1));
    let px_top = px_top.min(image.height.saturating_sub(1));
    let px_right = (px_left + px_width).min(image.width);
    let px_bottom = (px_top + px_height).min(image.height);

    let out_width = px_right.saturating_sub(px_left).max(1);
    let out_height = px_bottom.saturating_sub(px_top).max(1);

    let row_bytes = out_width as usize * RasterImage::CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    for y in 0..out_height {
        let src_y = (px_top + y) as usize;
        let start = (src_y * image.width as usize + px_left as usize) * RasterImage::CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    RasterImage::new(out_width, out_height, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (4u32..=100, 4u32..=100)
    }

    fn fraction_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
    }

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    fn scaled(width: u32, height: u32, (l, t, w, h): (f64, f64, f64, f64)) -> AbsoluteRect {
        AbsoluteRect {
            x: l * width as f64,
            y: t * height as f64,
            width: w * width as f64,
            height: h * height as f64,
        }
    }

    proptest! {
        /// Property: Output dimensions are positive and bounded by input.
        #[test]
        fn prop_output_bounded(
            (width, height) in dimensions_strategy(),
            fractions in fraction_strategy(),
        ) {
            let img = create_test_image(width, height);
            let result = crop_rect(&img, &scaled(width, height, fractions));

            prop_assert!(result.width >= 1 && result.width <= width);
            prop_assert!(result.height >= 1 && result.height <= height);
        }

        /// Property: Pixel data length matches dimensions.
        #[test]
        fn prop_pixel_data_matches_dimensions(
            (width, height) in dimensions_strategy(),
            fractions in fraction_strategy(),
        ) {
            let img = create_test_image(width, height);
            let result = crop_rect(&img, &scaled(width, height, fractions));

            prop_assert_eq!(
                result.pixels.len(),
                (result.width * result.height * 4) as usize
            );
        }

        /// Property: The first output pixel is the source pixel at the rounded origin.
        #[test]
        fn prop_origin_pixel_matches_source(
            (width, height) in (10u32..=50, 10u32..=50),
            (left, top) in (0.0f64..=0.5, 0.0f64..=0.5),
        ) {
            let img = create_test_image(width, height);
            let r = scaled(width, height, (left, top, 0.4, 0.4));
            let result = crop_rect(&img, &r);

            let ox = (r.x.round() as u32).min(width - 1);
            let oy = (r.y.round() as u32).min(height - 1);
            prop_assert_eq!(result.pixel(0, 0), img.pixel(ox, oy));
        }
    }
}
