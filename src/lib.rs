//! # Stillframe
//!
//! A photo slideshow engine for fixed-size viewports — dashboards, wall
//! panels, picture frames. Your filesystem is the data source: a root
//! directory of image files becomes the "All" album, each subdirectory
//! becomes an album of its own, and the engine rotates through them
//! producing correctly oriented, correctly sized output bytes on demand.
//!
//! # Architecture: Demand-Driven Selection and Rendering
//!
//! Nothing happens on a timer. A presentation layer asks for a still image;
//! that request runs the whole pipeline:
//!
//! ```text
//! still_image(album, w, h)
//!   → confirm freshness   (rotate the selection if its interval elapsed)
//!   → render cache        (hit? return the previous bytes)
//!   → compositor          (decode → orient → fit/fill/combine → encode)
//!   → bytes returned and cached
//! ```
//!
//! This keeps selection lazy: an album nobody looks at never rotates, never
//! decodes a pixel, and never touches the disk after its initial scan.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Directory scanning, the acceptance filter, ordered media snapshots |
//! | [`selector`] | Per-album selection state machine (random/sequential, interval gate) |
//! | [`imaging`] | Orientation correction, fit/fill transforms, the compositor |
//! | [`cache`] | Per-selection render cache keyed by viewport and layout |
//! | [`session`] | Album sessions, change listeners, and the session registry |
//! | [`settings`] | The consumed configuration surface (modes, intervals, layouts) |
//! | [`worker`] | Bounded worker pool for blocking decode/encode/scan work |
//!
//! # Design Decisions
//!
//! ## The Combined Layout
//!
//! A landscape photo on a portrait viewport (or vice versa) wastes most of
//! the screen — letterboxed to a sliver or crop-gutted. Combined mode
//! instead splits the viewport between two photos that share the primary's
//! orientation class, stacked or side by side depending on which viewport
//! axis dominates. The split only happens when it measurably wastes fewer
//! source pixels than a plain fill-crop (the cut-loss comparison in
//! [`imaging`]); otherwise the engine quietly falls back to single-image
//! rendering. Every failure in the combined ladder degrades the same way.
//!
//! ## Snapshots Over Live Views
//!
//! The catalog hands out immutable `Arc` snapshots. A rescan builds a new
//! index and swaps it in; renders in flight keep reading the snapshot they
//! started with. Selection state references items by id, so a rescan can
//! invalidate a selection without dangling anything — a stale id is simply
//! replaced on the next render.
//!
//! ## One Mutex Per Album
//!
//! Selection state and the render cache are not safe for concurrent
//! mutation, and don't need to be: a slideshow serves one image at a time.
//! Each session owns one mutex; distinct albums render in parallel on the
//! shared [`worker`] pool, which also bounds total pixel work for the
//! process.

pub mod cache;
pub mod catalog;
pub mod imaging;
pub mod selector;
pub mod session;
pub mod settings;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
