//! In-memory render cache.
//!
//! Rendering is the expensive step of a still-image request — decode, two
//! Lanczos passes, re-encode — and dashboards ask for the same viewport over
//! and over between rotations. This cache memoizes finished output bytes per
//! `(width, height, layout)` tuple, scoped to the current selection.
//!
//! The cache itself never does I/O and never outlives a selection: the owning
//! session clears it whenever the current or secondary item changes or the
//! layout mode is switched. Entries are only ever whole, finished renders —
//! a failed render stores nothing.

use crate::settings::LayoutMode;
use std::collections::HashMap;

/// Cache key: one distinct rendered artifact per viewport and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub width: u32,
    pub height: u32,
    pub layout: LayoutMode,
}

#[derive(Debug, Default)]
pub struct RenderCache {
    entries: HashMap<RenderKey, Vec<u8>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RenderKey) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Store a finished render. At most one entry per key; a re-render for
    /// the same key replaces the previous bytes.
    pub fn insert(&mut self, key: RenderKey, bytes: Vec<u8>) {
        self.entries.insert(key, bytes);
    }

    /// Drop every entry. Called on selection advance and layout change.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
