//! Image processing — pure Rust through the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe dimensions** | `ImageReader::into_dimensions` + orientation swap |
//! | **Orientation** | decoder metadata → 8-case rotate/flip composition |
//! | **Fit / fill** | Lanczos3 resize, `resize_to_fill` center crop |
//! | **Encode** | source-format encoder, JPEG quality 95 |
//!
//! The module is split into:
//! - **Calculations**: pure dimension math (unit testable, no I/O)
//! - **Orientation**: the EXIF correction applied before anything else
//! - **Transform**: fit-resize and fill-resize onto an exact canvas
//! - **Compositor**: the full render paths, including the combined layout

mod calculations;
pub mod compositor;
pub mod orientation;
pub mod transform;

pub use calculations::{combined_dimensions, cut_loss, fill_dimensions, fit_dimensions, is_portrait};
pub use compositor::{
    RenderError, choose_secondary, plan_combined, probe_dimensions, render_combined, render_single,
};
pub use orientation::Orientation;
pub use transform::{fill_resize, fit_resize};
