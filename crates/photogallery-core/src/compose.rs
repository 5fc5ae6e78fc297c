//! The compositor: crop, stretch, filter and rotate into one output raster.
//!
//! # Pipeline
//!
//! 1. Pick the output canvas size (explicit target, else the crop size, else
//!    the natural size)
//! 2. Cut the crop rectangle out of the source and stretch it over the canvas
//! 3. Apply the color filter
//! 4. Rotate about the canvas center, clipping at the canvas edges
//!
//! Composition is a pure function of its inputs, so the live preview and the
//! final save produce the same pixels.

use serde::{Deserialize, Serialize};

use crate::decode::{resize, RasterImage, ResampleFilter};
use crate::encode::{encode_png, EncodeError};
use crate::filter::{apply_filter, FilterKind};
use crate::transform::{crop_rect, rotate_about_center, AbsoluteRect};
use crate::Dimensions;

/// Longest canvas side the compositor will allocate.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Largest canvas area, in pixels, the compositor will allocate (~160 MB RGBA).
pub const MAX_CANVAS_PIXELS: u32 = 40_000_000;

/// True if a canvas of `size` can be allocated.
pub fn canvas_fits(size: Dimensions) -> bool {
    size.has_area()
        && size.width <= MAX_CANVAS_SIDE
        && size.height <= MAX_CANVAS_SIDE
        && size
            .width
            .checked_mul(size.height)
            .is_some_and(|pixels| pixels <= MAX_CANVAS_PIXELS)
}

/// Everything the compositor needs besides the source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    /// Crop in natural pixels
    pub rect: AbsoluteRect,
    pub rotation_degrees: i32,
    pub filter: FilterKind,
    /// Target size; ignored unless both sides are non-zero
    pub output: Dimensions,
}

impl ComposeRequest {
    /// Resolve the output canvas size against the source.
    pub fn output_size(&self, natural: Dimensions) -> Dimensions {
        if self.output.has_area() {
            return self.output;
        }
        if self.rect.width > 0.0 && self.rect.height > 0.0 {
            return self.rect.pixel_size();
        }
        natural
    }
}

/// Render `source` according to `request`.
///
/// Returns `None` if the source is not decoded, or the output size is empty
/// or larger than [`canvas_fits`] allows.
pub fn compose(
    source: &RasterImage,
    request: &ComposeRequest,
    resample: ResampleFilter,
) -> Option<RasterImage> {
    if source.is_empty() {
        return None;
    }

    let size = request.output_size(source.dimensions());
    if !canvas_fits(size) {
        if size.has_area() {
            tracing::warn!(
                width = size.width,
                height = size.height,
                "output canvas too large, skipping compose"
            );
        }
        return None;
    }

    let cropped = crop_rect(source, &request.rect);
    let mut canvas = resize(&cropped, size.width, size.height, resample)?;
    apply_filter(&mut canvas, request.filter);
    let output = rotate_about_center(&canvas, request.rotation_degrees, resample);

    tracing::debug!(
        width = output.width,
        height = output.height,
        rotation = request.rotation_degrees,
        filter = %request.filter,
        "composed image"
    );

    Some(output)
}

/// Compose and encode the result as PNG.
pub fn compose_png(
    source: &RasterImage,
    request: &ComposeRequest,
    resample: ResampleFilter,
) -> Result<Option<Vec<u8>>, EncodeError> {
    compose(source, request, resample)
        .map(|image| encode_png(&image.pixels, image.width, image.height))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[
                    (x * 255 / width) as u8,
                    (y * 255 / height) as u8,
                    128,
                    255,
                ]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    fn request(rect: AbsoluteRect) -> ComposeRequest {
        ComposeRequest {
            rect,
            rotation_degrees: 0,
            filter: FilterKind::None,
            output: Dimensions::default(),
        }
    }

    #[test]
    fn test_output_size_priority() {
        let natural = Dimensions::new(1000, 500);
        let mut req = request(AbsoluteRect {
            x: 0.0,
            y: 0.0,
            width: 300.0,
            height: 200.0,
        });

        assert_eq!(req.output_size(natural), Dimensions::new(300, 200));

        req.output = Dimensions::new(64, 32);
        assert_eq!(req.output_size(natural), Dimensions::new(64, 32));

        // One unset side falls back to the crop size
        req.output = Dimensions::new(64, 0);
        assert_eq!(req.output_size(natural), Dimensions::new(300, 200));

        req.rect.width = 0.0;
        req.output = Dimensions::default();
        assert_eq!(req.output_size(natural), natural);
    }

    #[test]
    fn test_left_half_crop_stretches_to_square() {
        let source = gradient(1000, 500);
        let rect = AbsoluteRect {
            x: 0.0,
            y: 0.0,
            width: 500.0,
            height: 500.0,
        };
        let output = compose(&source, &request(rect), ResampleFilter::Bilinear).unwrap();

        assert_eq!(output.width, 500);
        assert_eq!(output.height, 500);
        for (x, y) in [(0, 0), (250, 100), (499, 499)] {
            assert_eq!(output.pixel(x, y), source.pixel(x, y));
        }
    }

    #[test]
    fn test_identity_matches_resize() {
        let source = gradient(40, 30);
        let mut req = request(AbsoluteRect::full(source.dimensions()));
        req.output = Dimensions::new(20, 15);

        let output = compose(&source, &req, ResampleFilter::Bilinear).unwrap();
        let expected = resize(&source, 20, 15, ResampleFilter::Bilinear).unwrap();

        assert_eq!(output, expected);
    }

    #[test]
    fn test_identity_without_target_is_source() {
        let source = gradient(16, 9);
        let output = compose(
            &source,
            &request(AbsoluteRect::full(source.dimensions())),
            ResampleFilter::Lanczos3,
        )
        .unwrap();

        assert_eq!(output, source);
    }

    #[test]
    fn test_filter_then_rotation() {
        let source = gradient(8, 8);
        let mut req = request(AbsoluteRect::full(source.dimensions()));
        req.filter = FilterKind::Invert;
        req.rotation_degrees = 180;

        let output = compose(&source, &req, ResampleFilter::Bilinear).unwrap();
        let [r, g, b, a] = source.pixel(0, 0);
        assert_eq!(output.pixel(7, 7), [255 - r, 255 - g, 255 - b, a]);
    }

    #[test]
    fn test_rotation_on_wide_canvas_leaves_transparent_edges() {
        let source = gradient(20, 10);
        let mut req = request(AbsoluteRect::full(source.dimensions()));
        req.rotation_degrees = -90;
        req.filter = FilterKind::Invert;

        let output = compose(&source, &req, ResampleFilter::Bilinear).unwrap();
        assert_eq!(output.width, 20);
        assert_eq!(output.height, 10);
        // Uncovered canvas stays fully transparent even under invert
        assert_eq!(output.pixel(0, 5), [0, 0, 0, 0]);
        assert_eq!(output.pixel(10, 5)[3], 255);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let source = gradient(12, 7);
        let mut req = request(AbsoluteRect::full(source.dimensions()));
        req.rotation_degrees = -360;

        assert_eq!(compose(&source, &req, ResampleFilter::Bilinear).unwrap(), source);
    }

    #[test]
    fn test_empty_source_is_noop() {
        let source = RasterImage::new(0, 0, vec![]);
        let req = request(AbsoluteRect::full(Dimensions::new(10, 10)));

        assert!(compose(&source, &req, ResampleFilter::Bilinear).is_none());
        assert_eq!(compose_png(&source, &req, ResampleFilter::Bilinear), Ok(None));
    }

    #[test]
    fn test_canvas_limits() {
        assert!(canvas_fits(Dimensions::new(1, 1)));
        assert!(canvas_fits(Dimensions::new(MAX_CANVAS_SIDE, 2000)));
        assert!(!canvas_fits(Dimensions::new(0, 10)));
        assert!(!canvas_fits(Dimensions::new(MAX_CANVAS_SIDE + 1, 1)));
        assert!(!canvas_fits(Dimensions::new(MAX_CANVAS_SIDE, MAX_CANVAS_SIDE)));
        assert!(!canvas_fits(Dimensions::new(u32::MAX, u32::MAX)));
    }

    #[test]
    fn test_oversized_target_is_noop() {
        let source = gradient(10, 10);
        let mut req = request(AbsoluteRect::full(source.dimensions()));
        req.output = Dimensions::new(u32::MAX, u32::MAX);

        assert!(compose(&source, &req, ResampleFilter::Bilinear).is_none());
        assert_eq!(compose_png(&source, &req, ResampleFilter::Bilinear), Ok(None));

        req.output = Dimensions::new(1, MAX_CANVAS_SIDE + 1);
        assert!(compose(&source, &req, ResampleFilter::Bilinear).is_none());
    }

    #[test]
    fn test_compose_png_is_idempotent() {
        let source = gradient(30, 20);
        let req = ComposeRequest {
            rect: AbsoluteRect {
                x: 3.0,
                y: 2.0,
                width: 20.0,
                height: 10.0,
            },
            rotation_degrees: 90,
            filter: FilterKind::Sepia,
            output: Dimensions::new(25, 25),
        };

        let first = compose_png(&source, &req, ResampleFilter::Bilinear).unwrap().unwrap();
        let second = compose_png(&source, &req, ResampleFilter::Bilinear).unwrap().unwrap();
        assert_eq!(first, second);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
