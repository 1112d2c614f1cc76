//! Viewport-fitting resize transforms.
//!
//! Two ways to map a source image onto an exact `width × height` canvas:
//!
//! - [`fit_resize`] — letterbox: the whole image, centered on black.
//! - [`fill_resize`] — cover: fill the canvas, center-cropping the overflow.
//!
//! Both preserve the source aspect ratio, resample with Lanczos3, and are
//! deterministic for identical inputs. Orientation correction must already
//! have happened; these functions trust the dimensions they are given.

use super::calculations::fit_dimensions;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

/// Scale to fit entirely within `width × height`, centered on a black canvas
/// of exactly that size.
pub fn fit_resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (inner_w, inner_h) = fit_dimensions((img.width(), img.height()), (width, height));
    let resized = img
        .resize_exact(inner_w, inner_h, FilterType::Lanczos3)
        .to_rgb8();

    let mut canvas = RgbImage::from_pixel(width, height, image::Rgb([0, 0, 0]));
    let x = (width - inner_w) / 2;
    let y = (height - inner_h) / 2;
    imageops::replace(&mut canvas, &resized, x as i64, y as i64);
    DynamicImage::ImageRgb8(canvas)
}

/// Scale to fully cover `width × height`, then center-crop to exactly that
/// size. No letterboxing; content at the long edge is lost.
pub fn fill_resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let filled = img.resize_to_fill(width, height, FilterType::Lanczos3);
    DynamicImage::ImageRgb8(filled.to_rgb8())
}
