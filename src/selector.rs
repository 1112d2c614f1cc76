//! Per-album selection state machine.
//!
//! A selector is either *empty* (nothing ever selected, or the catalog has
//! nothing to offer) or *holding* a current item id. Transitions happen in
//! exactly two places:
//!
//! - [`Selector::advance`] — pick the next item per the selection mode.
//! - [`Selector::confirm_fresh`] — the interval gate, called from the render
//!   path. Selection is lazy and demand-driven: no background timer ever
//!   rotates an image nobody is looking at.
//!
//! The selector stores ids, not items — a catalog rescan produces new item
//! instances, and an id that no longer resolves is simply treated as stale
//! on the next advance (sequential mode restarts at the first item).

use crate::catalog::MediaIndex;
use crate::settings::{RotationInterval, SelectionMode};
use log::warn;
use rand::Rng;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Selector {
    current_id: Option<String>,
    secondary_id: Option<String>,
    selected_at: Option<Instant>,
    last_interval: Option<Duration>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the currently held item, if any.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Id of the pinned combined-layout partner, if any.
    pub fn secondary_id(&self) -> Option<&str> {
        self.secondary_id.as_deref()
    }

    /// True when no item has ever been selected.
    pub fn is_empty(&self) -> bool {
        self.current_id.is_none()
    }

    /// The interval in force at the last `confirm_fresh` call.
    pub fn last_interval(&self) -> Option<Duration> {
        self.last_interval
    }

    /// Make `id` current: stamps the selection time and clears any pinned
    /// secondary — a new primary always gets a fresh partner search.
    pub fn select(&mut self, id: String, now: Instant) {
        self.current_id = Some(id);
        self.secondary_id = None;
        self.selected_at = Some(now);
    }

    /// Pin the combined-layout partner so renders at other viewport sizes
    /// reuse it. Cleared automatically by the next [`Selector::select`].
    pub fn pin_secondary(&mut self, id: String) {
        self.secondary_id = Some(id);
    }

    /// Select the next item from the snapshot.
    ///
    /// Random mode picks uniformly (repeats allowed). Sequential mode steps
    /// through the snapshot's filename order, wrapping past the end; a stale
    /// or absent current id restarts at the first item.
    ///
    /// An empty snapshot is a soft condition: state is left as-is and `false`
    /// is returned.
    pub fn advance<R: Rng>(
        &mut self,
        index: &MediaIndex,
        mode: SelectionMode,
        rng: &mut R,
        now: Instant,
    ) -> bool {
        if index.is_empty() {
            warn!("no media available to select");
            return false;
        }

        let next_id = match mode {
            SelectionMode::Random => {
                let pick = rng.random_range(0..index.len());
                index.get(pick).expect("index in range").id.clone()
            }
            SelectionMode::Sequential => {
                let next_pos = self
                    .current_id
                    .as_deref()
                    .and_then(|id| index.position(id))
                    .map(|pos| (pos + 1) % index.len())
                    .unwrap_or(0);
                index.get(next_pos).expect("index in range").id.clone()
            }
        };

        self.select(next_id, now);
        true
    }

    /// The interval gate: advance when the held item has outlived the
    /// rotation interval, or when nothing is held. `Never` never advances —
    /// not even from the empty state; initial selection is the session's
    /// job. Returns whether an advance happened.
    pub fn confirm_fresh<R: Rng>(
        &mut self,
        index: &MediaIndex,
        mode: SelectionMode,
        interval: RotationInterval,
        rng: &mut R,
        now: Instant,
    ) -> bool {
        let Some(interval) = interval.as_duration() else {
            return false;
        };
        self.last_interval = Some(interval);

        let due = match self.selected_at {
            None => true,
            Some(at) => self.current_id.is_none() || now.saturating_duration_since(at) > interval,
        };
        if due {
            self.advance(index, mode, rng, now)
        } else {
            false
        }
    }
}
