//! Rendering: decode, orient, fit, and re-encode for a requested viewport.
//!
//! The single-image path fits or fill-crops one photo onto the viewport and
//! re-encodes it in the format the source bytes were sniffed as (JPEG when
//! undetermined). The combined path pairs a photo whose orientation class
//! clashes with the viewport's with a second, like-oriented photo, splitting
//! the viewport between them — but only when the split actually wastes fewer
//! source pixels than a plain fill-crop would.
//!
//! Every decision that can fail here degrades rather than aborts: the caller
//! treats a rejected combined plan as "render single" and a failed render as
//! "no image this round". Selection state is never touched from this module.

use super::calculations::{combined_dimensions, cut_loss, is_portrait};
use super::orientation;
use super::transform::{fill_resize, fit_resize};
use crate::catalog::{MediaIndex, MediaItem};
use crate::settings::LayoutMode;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, imageops};
use log::debug;
use rand::Rng;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Re-encoding at lower quality would visibly degrade photos that are only
/// being letterboxed or cropped.
const JPEG_QUALITY: u8 = 95;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("failed to encode output: {0}")]
    Encode(String),
}

/// A decoded, orientation-corrected image plus its sniffed source format.
struct LoadedImage {
    image: DynamicImage,
    format: ImageFormat,
}

/// Read, sniff, decode, and orientation-correct one file.
fn load_oriented(path: &Path) -> Result<LoadedImage, RenderError> {
    let bytes = fs::read(path)?;
    let exif_orientation = orientation::read_orientation(&bytes);

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(RenderError::Io)?;
    let format = reader.format().unwrap_or(ImageFormat::Jpeg);
    let image = reader.decode().map_err(|e| RenderError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(LoadedImage {
        image: exif_orientation.apply(image),
        format,
    })
}

/// Orientation-corrected dimensions without a full decode.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), RenderError> {
    let bytes = fs::read(path)?;
    let exif_orientation = orientation::read_orientation(&bytes);

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(RenderError::Io)?;
    let (w, h) = reader.into_dimensions().map_err(|e| RenderError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(if exif_orientation.swaps_dimensions() {
        (h, w)
    } else {
        (w, h)
    })
}

/// Encode in the given format. JPEG gets an explicit quality; everything else
/// takes the encoder's defaults.
fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    let result = match format {
        ImageFormat::Jpeg => {
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
            img.write_with_encoder(encoder)
        }
        other => img.write_to(&mut cursor, other),
    };
    result.map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Render one photo onto the viewport. `Original` (and a fallen-back
/// `Combined`) letterbox-fits; `Crop` fill-crops.
pub fn render_single(
    path: &Path,
    width: u32,
    height: u32,
    layout: LayoutMode,
) -> Result<Vec<u8>, RenderError> {
    let loaded = load_oriented(path)?;
    let composed = match layout {
        LayoutMode::Crop => fill_resize(&loaded.image, width, height),
        LayoutMode::Original | LayoutMode::Combined => fit_resize(&loaded.image, width, height),
    };
    encode(&composed, loaded.format)
}

/// Decide whether the combined layout applies for this primary image, and if
/// so how much of the viewport each pane gets.
///
/// Rejected (returns `None`) when the primary's orientation class already
/// matches the viewport's, or when a plain fill-crop of the full viewport
/// would lose less of the primary than the halved pane would.
pub fn plan_combined(viewport: (u32, u32), primary_dims: (u32, u32)) -> Option<(f64, f64)> {
    let target = (viewport.0 as f64, viewport.1 as f64);
    let source = (primary_dims.0 as f64, primary_dims.1 as f64);

    if is_portrait(target) == is_portrait(source) {
        return None;
    }

    let pane = combined_dimensions(target, source);
    if cut_loss(target, source) < cut_loss(pane, source) {
        debug!("combined layout rejected: single fill loses less than the split pane");
        return None;
    }
    Some(pane)
}

/// Pick a partner for the combined layout: uniformly random among the album's
/// other items whose orientation class matches the primary's. Items whose
/// dimensions can't be probed are skipped.
pub fn choose_secondary<R: Rng>(
    index: &MediaIndex,
    primary_id: &str,
    primary_portrait: bool,
    rng: &mut R,
) -> Option<MediaItem> {
    let mut candidates: Vec<MediaItem> = Vec::new();
    for item in index.siblings(primary_id) {
        match probe_dimensions(&item.path) {
            Ok(dims) if is_portrait((dims.0 as f64, dims.1 as f64)) == primary_portrait => {
                candidates.push(item.clone());
            }
            Ok(_) => {}
            Err(err) => {
                debug!("skipping combined candidate '{}': {err}", item.filename);
            }
        }
    }
    if candidates.is_empty() {
        return None;
    }
    let pick = rng.random_range(0..candidates.len());
    Some(candidates.swap_remove(pick))
}

/// Fill-crop both photos into their pane and paste them onto one canvas of
/// the full viewport size: side by side when the width was halved, stacked
/// when the height was.
///
/// Pane dimensions round up and the second offset rounds down, so an odd
/// viewport axis is covered without a seam. Output is always JPEG.
pub fn render_combined(
    primary: &Path,
    secondary: &Path,
    width: u32,
    height: u32,
    pane: (f64, f64),
) -> Result<Vec<u8>, RenderError> {
    let pane_w = pane.0.ceil() as u32;
    let pane_h = pane.1.ceil() as u32;

    let first = load_oriented(primary)?;
    let second = load_oriented(secondary)?;
    let first = fill_resize(&first.image, pane_w, pane_h).to_rgb8();
    let second = fill_resize(&second.image, pane_w, pane_h).to_rgb8();

    let mut canvas = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    imageops::replace(&mut canvas, &first, 0, 0);
    if pane.0 < width as f64 {
        imageops::replace(&mut canvas, &second, pane.0.floor() as i64, 0);
    } else {
        imageops::replace(&mut canvas, &second, 0, pane.1.floor() as i64);
    }

    encode(&DynamicImage::ImageRgb8(canvas), ImageFormat::Jpeg)
}
