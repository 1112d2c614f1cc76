//! EXIF orientation correction.
//!
//! Cameras store pixels in sensor order and record how the device was held
//! in EXIF tag 0x0112. Every read of an image's dimensions and every resize
//! must happen *after* applying this correction, otherwise portrait photos
//! classify as landscape and the combined layout pairs the wrong images.
//!
//! The eight standard cases are expressed as compositions of the `image`
//! crate's rotate/flip primitives. An unknown or missing code is treated as
//! the identity.

use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;

/// The 8 standard EXIF orientation cases, named by what must be done to the
/// stored pixels to display them correctly. Rotations are clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Code 1: stored upright.
    Normal,
    /// Code 2: mirrored across the vertical axis.
    FlipHorizontal,
    /// Code 3: upside down.
    Rotate180,
    /// Code 4: mirrored across the horizontal axis.
    FlipVertical,
    /// Code 5: transposed (mirror + 270° rotation).
    Transpose,
    /// Code 6: rotate 90° clockwise to display.
    Rotate90,
    /// Code 7: transversed (mirror + 90° rotation).
    Transverse,
    /// Code 8: rotate 270° clockwise to display.
    Rotate270,
}

impl Orientation {
    /// Map an EXIF orientation value. Anything outside 1..=8 is identity.
    pub fn from_exif_code(code: u16) -> Self {
        match code {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    pub fn to_exif_code(self) -> u16 {
        match self {
            Orientation::Normal => 1,
            Orientation::FlipHorizontal => 2,
            Orientation::Rotate180 => 3,
            Orientation::FlipVertical => 4,
            Orientation::Transpose => 5,
            Orientation::Rotate90 => 6,
            Orientation::Transverse => 7,
            Orientation::Rotate270 => 8,
        }
    }

    /// The orientation that undoes this one. Only the pure rotations are not
    /// their own inverse.
    pub fn inverse(self) -> Self {
        match self {
            Orientation::Rotate90 => Orientation::Rotate270,
            Orientation::Rotate270 => Orientation::Rotate90,
            other => other,
        }
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }

    /// Apply the correction, producing a display-upright image.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Normal => img,
            Orientation::FlipHorizontal => img.fliph(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::FlipVertical => img.flipv(),
            Orientation::Transpose => img.rotate90().fliph(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Transverse => img.rotate270().fliph(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}

/// Read the orientation recorded in an encoded image's metadata.
///
/// Best-effort: undecodable input or absent metadata yields the identity,
/// never an error — orientation is a correction, not a gate.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(_) => return Orientation::Normal,
    };
    let mut decoder = match reader.into_decoder() {
        Ok(decoder) => decoder,
        Err(_) => return Orientation::Normal,
    };
    match decoder.orientation() {
        Ok(orientation) => Orientation::from_exif_code(orientation.to_exif() as u16),
        Err(_) => Orientation::Normal,
    }
}
