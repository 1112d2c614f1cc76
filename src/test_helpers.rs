//! Shared test utilities: synthetic image fixtures.
//!
//! Tests never ship binary fixtures — every image is generated through the
//! `image` crate's own encoders, so the catalog's content sniffing and the
//! compositor's decoders see real files.

use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Write a small valid JPEG with the given dimensions and a gradient fill.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a small valid PNG with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a JPEG filled with one solid color. Handy when a test needs to tell
/// two renders apart by their pixels.
pub fn create_solid_jpeg(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}
