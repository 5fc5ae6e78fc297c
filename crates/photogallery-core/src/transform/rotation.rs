//! Rotation of a drawn image about the output canvas center.
//!
//! The canvas keeps its size: content that rotates past an edge is clipped
//! and canvas areas the rotated image no longer covers become transparent.
//! Angles are in degrees, positive = clockwise (y axis points down).
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel we find where it came from in the
//! unrotated image. With `(dx, dy)` measured from the canvas center:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ)
//! src_y = -dx * sin(θ) + dy * cos(θ)
//! ```
//!
//! Quarter turns are remapped exactly using doubled coordinates so that no
//! resampling happens and four 90° steps reproduce the input on a square
//! canvas. Any other angle is sampled with the requested filter.

use crate::decode::{RasterImage, ResampleFilter};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Normalize an accumulated angle into `0..360`.
///
/// ```text
/// -90 -> 270, 450 -> 90, -720 -> 0
/// ```
#[inline]
pub fn normalize_degrees(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Rotate `image` about its center, keeping the canvas size.
pub fn rotate_about_center(
    image: &RasterImage,
    degrees: i32,
    filter: ResampleFilter,
) -> RasterImage {
    match normalize_degrees(degrees) {
        0 => image.clone(),
        quarter @ (90 | 180 | 270) => rotate_quarter(image, quarter),
        other => rotate_sampled(image, other as f64, filter),
    }
}

/// Exact remap for 90, 180 and 270 degrees.
fn rotate_quarter(image: &RasterImage, degrees: i32) -> RasterImage {
    let (w, h) = (image.width as i64, image.height as i64);
    let mut output = RasterImage::transparent(image.width, image.height);

    for y in 0..h {
        // Doubled offsets from the center keep half-pixel centers integral
        let dy2 = 2 * y + 1 - h;
        for x in 0..w {
            let dx2 = 2 * x + 1 - w;
            let (sx2, sy2) = match degrees {
                90 => (dy2, -dx2),
                180 => (-dx2, -dy2),
                _ => (-dy2, dx2),
            };

            let sx = (sx2 + w).div_euclid(2);
            let sy = (sy2 + h).div_euclid(2);
            if sx < 0 || sx >= w || sy < 0 || sy >= h {
                continue;
            }

            let pixel = image.pixel(sx as u32, sy as u32);
            let dst = ((y * w + x) as usize) * RasterImage::CHANNELS;
            output.pixels[dst..dst + 4].copy_from_slice(&pixel);
        }
    }

    output
}

/// Arbitrary-angle rotation through inverse mapping and sampling.
fn rotate_sampled(image: &RasterImage, angle_degrees: f64, filter: ResampleFilter) -> RasterImage {
    let (w, h) = (image.width as f64, image.height as f64);
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let cx = w / 2.0;
    let cy = h / 2.0;

    let mut output = RasterImage::transparent(image.width, image.height);

    for dst_y in 0..image.height {
        for dst_x in 0..image.width {
            // Pixel centers, measured from the canvas center
            let dx = dst_x as f64 + 0.5 - cx;
            let dy = dst_y as f64 + 0.5 - cy;

            // Back into pixel-index space where centers sit on integers
            let src_x = dx * cos + dy * sin + cx - 0.5;
            let src_y = -dx * sin + dy * cos + cy - 0.5;

            let pixel = match filter {
                ResampleFilter::Nearest => sample_nearest(image, src_x, src_y),
                ResampleFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                ResampleFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            let dst = (dst_y as usize * image.width as usize + dst_x as usize)
                * RasterImage::CHANNELS;
            output.pixels[dst..dst + 4].copy_from_slice(&pixel);
        }
    }

    output
}

/// True when the point falls on the image, measured to the outer pixel edges.
#[inline]
fn covers(image: &RasterImage, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x < image.width as f64 - 0.5 && y < image.height as f64 - 0.5
}

/// Get a pixel as [f64; 4], clamping coordinates to the image edge.
#[inline]
fn get_pixel_f64(image: &RasterImage, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, image.width as i64 - 1) as u32;
    let y = py.clamp(0, image.height as i64 - 1) as u32;
    image.pixel(x, y).map(f64::from)
}

fn sample_nearest(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if !covers(image, x, y) {
        return TRANSPARENT;
    }
    let px = (x.round() as i64).clamp(0, image.width as i64 - 1) as u32;
    let py = (y.round() as i64).clamp(0, image.height as i64 - 1) as u32;
    image.pixel(px, py)
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if !covers(image, x, y) {
        return TRANSPARENT;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighborhood.
fn sample_lanczos3(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);

    // Fall back to bilinear where the kernel would leave the image
    if x < 2.0 || x >= w - 3.0 || y < 2.0 || y >= h - 3.0 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for i in 0..4 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
