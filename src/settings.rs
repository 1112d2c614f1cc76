//! Per-album configuration surface.
//!
//! These types are *consumed* by the engine, not owned by it — whatever hosts
//! the engine (a dashboard integration, the CLI) decides where the values come
//! from and hands them over as an [`AlbumSettings`]. Everything is
//! serde-derived so hosts can persist or transport settings as they see fit.
//!
//! The rotation interval is deliberately a small enumerated set rather than a
//! free duration: slideshows only ever want a handful of sensible cadences,
//! and an enum keeps the configuration UI surface finite.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default render viewport when the caller doesn't specify one.
pub const DEFAULT_RENDER_WIDTH: u32 = 1024;
pub const DEFAULT_RENDER_HEIGHT: u32 = 512;

/// How the next media item is picked when the selection rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionMode {
    /// Uniformly random pick from the catalog snapshot; repeats allowed.
    #[default]
    Random,
    /// Next item in case-insensitive filename order, wrapping at the end.
    Sequential,
}

/// How long a selected image stays current before the render path rotates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationInterval {
    /// Never auto-advance; only an explicit advance changes the selection.
    Never,
    Seconds10,
    Seconds20,
    Seconds30,
    #[default]
    Seconds60,
    Seconds120,
    Seconds300,
}

impl RotationInterval {
    /// The interval as a duration, or `None` for [`RotationInterval::Never`].
    pub fn as_duration(self) -> Option<Duration> {
        let secs = match self {
            RotationInterval::Never => return None,
            RotationInterval::Seconds10 => 10,
            RotationInterval::Seconds20 => 20,
            RotationInterval::Seconds30 => 30,
            RotationInterval::Seconds60 => 60,
            RotationInterval::Seconds120 => 120,
            RotationInterval::Seconds300 => 300,
        };
        Some(Duration::from_secs(secs))
    }
}

/// How a selected image is fitted to the requested viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayoutMode {
    /// Letterbox-fit: the whole image, centered on a black canvas.
    #[default]
    Original,
    /// Fill-crop: cover the viewport, center-cropping the overflow.
    Crop,
    /// Pair two orientation-mismatched images side by side or stacked.
    /// Falls back to single-image rendering when not applicable.
    Combined,
}

/// Complete per-album configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumSettings {
    pub mode: SelectionMode,
    pub interval: RotationInterval,
    pub layout: LayoutMode,
    pub render_width: u32,
    pub render_height: u32,
}

impl Default for AlbumSettings {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            interval: RotationInterval::default(),
            layout: LayoutMode::default(),
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
        }
    }
}
