//! Album sessions and the session registry.
//!
//! An [`AlbumSession`] owns everything one album needs to serve still-image
//! requests: a catalog view, the selection state machine, the render cache,
//! and the album's settings. All mutable state sits behind one mutex, so no
//! two renders for the same album ever run concurrently — while distinct
//! albums, owning disjoint state, render in parallel on the shared worker
//! pool.
//!
//! The [`SessionRegistry`] is the process-level owner: it discovers albums
//! under a root directory (the recursive ALL album plus one album per
//! immediate subdirectory), constructs sessions lazily, and exposes the
//! album-id-keyed interface a presentation layer consumes. It is built at
//! startup and passed by reference — there is no ambient global.
//!
//! Interested parties subscribe to a session's change notifications
//! explicitly via [`AlbumSession::subscribe`] rather than by subclassing
//! anything; unsubscribing is just as explicit.

use crate::cache::{RenderCache, RenderKey};
use crate::catalog::{ALL_ALBUM_ID, Album, Catalog, MediaIndex, MediaItem};
use crate::imaging::{self, RenderError};
use crate::selector::Selector;
use crate::settings::{AlbumSettings, LayoutMode, RotationInterval, SelectionMode};
use crate::worker::{WorkerError, WorkerPool};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("worker pool error: {0}")]
    Worker(#[from] WorkerError),
}

/// Change notification pushed to subscribed listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SelectionChanged {
        album_id: String,
        media_id: Option<String>,
    },
}

pub type ListenerId = u64;
type Listener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// What a presentation layer shows about an album.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumSummary {
    pub id: String,
    pub title: String,
    pub item_count: usize,
}

/// What a presentation layer shows about the current item.
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    pub id: String,
    pub filename: String,
    pub path: PathBuf,
}

struct SessionState {
    selector: Selector,
    cache: RenderCache,
    settings: AlbumSettings,
}

pub struct AlbumSession {
    catalog: Catalog,
    state: Mutex<SessionState>,
    listeners: Mutex<HashMap<ListenerId, Listener>>,
    next_listener_id: AtomicU64,
    pool: Arc<WorkerPool>,
}

impl AlbumSession {
    /// Build a session: scans the album and, when the catalog is non-empty,
    /// makes the initial selection — so even `Never`-interval albums hold an
    /// image from the start.
    pub fn new(
        album: Album,
        recursive: bool,
        settings: AlbumSettings,
        pool: Arc<WorkerPool>,
    ) -> Self {
        let catalog = if recursive {
            Catalog::new_recursive(album)
        } else {
            Catalog::new(album)
        };

        let root = catalog.album().root.clone();
        let index = match pool
            .run(move || crate::catalog::scan_media(&root, recursive).map(MediaIndex::from_items))
        {
            Ok(Ok(index)) => catalog.install(index),
            Ok(Err(err)) => {
                warn!("scan of album '{}' failed: {err}", catalog.album().id);
                catalog.snapshot()
            }
            Err(err) => {
                warn!("scan of album '{}' lost: {err}", catalog.album().id);
                catalog.snapshot()
            }
        };

        let mut selector = Selector::new();
        if !index.is_empty() {
            let mut rng = rand::rng();
            selector.advance(&index, settings.mode, &mut rng, Instant::now());
        }

        Self {
            catalog,
            state: Mutex::new(SessionState {
                selector,
                cache: RenderCache::new(),
                settings,
            }),
            listeners: Mutex::new(HashMap::new()),
            next_listener_id: AtomicU64::new(1),
            pool,
        }
    }

    pub fn album(&self) -> &Album {
        self.catalog.album()
    }

    pub fn summary(&self) -> AlbumSummary {
        let album = self.catalog.album();
        AlbumSummary {
            id: album.id.clone(),
            title: album.title.clone(),
            item_count: self.catalog.item_count(),
        }
    }

    pub fn settings(&self) -> AlbumSettings {
        self.lock_state().settings
    }

    /// Info about the current item, or `None` when nothing is selected or
    /// the selection no longer resolves.
    pub fn media_info(&self) -> Option<MediaInfo> {
        let state = self.lock_state();
        let id = state.selector.current_id()?;
        let index = self.catalog.snapshot();
        index.resolve(id).map(|item| MediaInfo {
            id: item.id.clone(),
            filename: item.filename.clone(),
            path: item.path.clone(),
        })
    }

    /// Register a change listener; returns the id used to unsubscribe.
    pub fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.lock_listeners().insert(id, listener);
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.lock_listeners().remove(&id);
    }

    /// Re-scan the album directory on the worker pool and install the fresh
    /// index. Selection state is untouched; a now-stale current id is dealt
    /// with lazily by the next render or advance.
    pub fn rescan(&self) {
        let root = self.catalog.album().root.clone();
        let recursive = self.catalog.is_recursive();
        match self.pool.run(move || {
            crate::catalog::scan_media(&root, recursive).map(MediaIndex::from_items)
        }) {
            Ok(Ok(index)) => {
                self.catalog.install(index);
            }
            Ok(Err(err)) => {
                warn!("rescan of album '{}' failed: {err}", self.album().id);
                self.catalog.install(MediaIndex::default());
            }
            Err(err) => warn!("rescan of album '{}' lost: {err}", self.album().id),
        }
    }

    /// Explicit "next" action: advances immediately, bypassing the interval
    /// gate, using the override mode if given. Returns whether the selection
    /// actually moved.
    pub fn advance_selection(&self, mode_override: Option<SelectionMode>) -> bool {
        let event = {
            let mut state = self.lock_state();
            let index = self.catalog.snapshot();
            let mode = mode_override.unwrap_or(state.settings.mode);
            let mut rng = rand::rng();
            if state.selector.advance(&index, mode, &mut rng, Instant::now()) {
                state.cache.clear();
                Some(SessionEvent::SelectionChanged {
                    album_id: self.album().id.clone(),
                    media_id: state.selector.current_id().map(str::to_string),
                })
            } else {
                None
            }
        };
        let advanced = event.is_some();
        if let Some(event) = event {
            self.notify(&event);
        }
        advanced
    }

    /// Switch the layout mode. Invalidates all cached renders — `Original`
    /// bytes must never answer a `Crop` request's fallback and vice versa.
    pub fn set_layout(&self, layout: LayoutMode) {
        let mut state = self.lock_state();
        if state.settings.layout != layout {
            state.settings.layout = layout;
            state.cache.clear();
        }
    }

    pub fn set_mode(&self, mode: SelectionMode) {
        self.lock_state().settings.mode = mode;
    }

    pub fn set_interval(&self, interval: RotationInterval) {
        self.lock_state().settings.interval = interval;
    }

    /// Serve a still image for the requested viewport (album defaults when
    /// unspecified).
    ///
    /// This is the demand-driven heart of the engine: it runs the interval
    /// gate, replaces a stale selection, consults the cache, and only then
    /// renders — single image, or the combined pair with its fallback ladder.
    /// `Ok(None)` means no media is available; render failures leave the
    /// selection untouched so the caller can retry or advance.
    pub fn still_image(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Vec<u8>>, SessionError> {
        let (result, event) = {
            let mut state = self.lock_state();
            let width = width.unwrap_or(state.settings.render_width);
            let height = height.unwrap_or(state.settings.render_height);
            let mode = state.settings.mode;
            let interval = state.settings.interval;
            let index = self.catalog.snapshot();
            let mut rng = rand::rng();
            let now = Instant::now();

            let mut changed = false;

            // A current id the latest scan no longer knows is stale; advancing
            // respects the configured mode and re-enters the sorted order.
            let stale = state
                .selector
                .current_id()
                .is_some_and(|id| index.resolve(id).is_none());
            if stale {
                debug!("current media is stale, reselecting");
                changed |= state.selector.advance(&index, mode, &mut rng, now);
            }

            changed |= state
                .selector
                .confirm_fresh(&index, mode, interval, &mut rng, now);
            if changed {
                state.cache.clear();
            }
            let event = changed.then(|| SessionEvent::SelectionChanged {
                album_id: self.album().id.clone(),
                media_id: state.selector.current_id().map(str::to_string),
            });

            let result = self.render_current(&mut state, &index, width, height, &mut rng);
            (result, event)
        };

        if let Some(event) = event {
            self.notify(&event);
        }
        result
    }

    /// Render (or fetch from cache) the current selection at the given size.
    /// Expects the interval gate to have already run.
    fn render_current(
        &self,
        state: &mut SessionState,
        index: &Arc<MediaIndex>,
        width: u32,
        height: u32,
        rng: &mut impl rand::Rng,
    ) -> Result<Option<Vec<u8>>, SessionError> {
        let Some(current_id) = state.selector.current_id().map(str::to_string) else {
            warn!("no media selected for album '{}'", self.album().id);
            return Ok(None);
        };
        let Some(primary) = index.resolve(&current_id).cloned() else {
            warn!("no media selected for album '{}'", self.album().id);
            return Ok(None);
        };

        let layout = state.settings.layout;
        let key = RenderKey {
            width,
            height,
            layout,
        };
        if let Some(bytes) = state.cache.get(&key) {
            return Ok(Some(bytes.to_vec()));
        }

        let mut bytes = None;
        if layout == LayoutMode::Combined {
            match self.render_combined(state, index, &primary, width, height, rng) {
                Ok(rendered) => bytes = rendered,
                Err(err) => {
                    warn!(
                        "combined render failed for album '{}', falling back: {err}",
                        self.album().id
                    );
                }
            }
        }

        let bytes = match bytes {
            Some(bytes) => bytes,
            None => {
                let path = primary.path.clone();
                self.pool
                    .run(move || imaging::render_single(&path, width, height, layout))??
            }
        };

        state.cache.insert(key, bytes.clone());
        Ok(Some(bytes))
    }

    /// The combined-layout ladder. `Ok(None)` means one of the preconditions
    /// rejected the layout (orientation match, cut-loss comparison, no
    /// eligible partner) — not an error.
    fn render_combined(
        &self,
        state: &mut SessionState,
        index: &Arc<MediaIndex>,
        primary: &MediaItem,
        width: u32,
        height: u32,
        rng: &mut impl rand::Rng,
    ) -> Result<Option<Vec<u8>>, SessionError> {
        let primary_path = primary.path.clone();
        let primary_dims = self
            .pool
            .run(move || imaging::probe_dimensions(&primary_path))??;

        let Some(pane) = imaging::plan_combined((width, height), primary_dims) else {
            return Ok(None);
        };
        let primary_portrait = imaging::is_portrait((primary_dims.0 as f64, primary_dims.1 as f64));

        // Reuse a pinned partner if it still resolves; otherwise search.
        let pinned = state
            .selector
            .secondary_id()
            .and_then(|id| index.resolve(id).cloned());
        let secondary = match pinned {
            Some(item) => item,
            None => {
                let search_index = index.clone();
                let primary_id = primary.id.clone();
                let seed: u64 = rng.random();
                let found = self.pool.run(move || {
                    use rand::SeedableRng;
                    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                    imaging::choose_secondary(&search_index, &primary_id, primary_portrait, &mut rng)
                })?;
                match found {
                    Some(item) => {
                        debug!(
                            "album '{}': pairing '{}' with '{}'",
                            self.album().id,
                            primary.filename,
                            item.filename
                        );
                        // The secondary is part of the cache's identity:
                        // entries rendered before the pin are stale now.
                        state.selector.pin_secondary(item.id.clone());
                        state.cache.clear();
                        item
                    }
                    None => return Ok(None),
                }
            }
        };

        let primary_path = primary.path.clone();
        let secondary_path = secondary.path.clone();
        let bytes = self.pool.run(move || {
            imaging::render_combined(&primary_path, &secondary_path, width, height, pane)
        })??;
        Ok(Some(bytes))
    }

    fn notify(&self, event: &SessionEvent) {
        for listener in self.lock_listeners().values() {
            listener(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }

    fn lock_listeners(&self) -> MutexGuard<'_, HashMap<ListenerId, Listener>> {
        self.listeners.lock().expect("session listener lock poisoned")
    }
}

/// Process-level owner of album sessions, keyed by album id.
pub struct SessionRegistry {
    root: PathBuf,
    defaults: AlbumSettings,
    pool: Arc<WorkerPool>,
    sessions: Mutex<HashMap<String, Arc<AlbumSession>>>,
}

impl SessionRegistry {
    pub fn new(root: PathBuf, defaults: AlbumSettings) -> Result<Self, WorkerError> {
        Ok(Self::with_pool(
            root,
            defaults,
            Arc::new(WorkerPool::with_default_threads()?),
        ))
    }

    pub fn with_pool(root: PathBuf, defaults: AlbumSettings, pool: Arc<WorkerPool>) -> Self {
        Self {
            root,
            defaults,
            pool,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Albums available under the root: the recursive ALL album plus one per
    /// immediate subdirectory.
    pub fn discover_albums(&self) -> Vec<Album> {
        let mut albums = vec![Album {
            id: ALL_ALBUM_ID.to_string(),
            title: "All".to_string(),
            root: self.root.clone(),
        }];

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("cannot list albums under {}: {err}", self.root.display());
                return albums;
            }
        };
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .filter(|p| !hidden_dir(p))
            .collect();
        subdirs.sort();

        for dir in subdirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            albums.push(Album {
                id: name.clone(),
                title: name,
                root: dir,
            });
        }
        albums
    }

    /// The session for an album, constructed on first use. An unknown id
    /// falls back to the ALL album with a warning.
    pub fn session(&self, album_id: &str) -> Arc<AlbumSession> {
        let album = self.resolve_album(album_id).unwrap_or_else(|| {
            warn!("album not found: {album_id}, using {ALL_ALBUM_ID}");
            Album {
                id: ALL_ALBUM_ID.to_string(),
                title: "All".to_string(),
                root: self.root.clone(),
            }
        });

        let mut sessions = self.sessions.lock().expect("registry lock poisoned");
        sessions
            .entry(album.id.clone())
            .or_insert_with(|| {
                let recursive = album.id == ALL_ALBUM_ID;
                Arc::new(AlbumSession::new(
                    album,
                    recursive,
                    self.defaults,
                    self.pool.clone(),
                ))
            })
            .clone()
    }

    fn resolve_album(&self, album_id: &str) -> Option<Album> {
        if album_id == ALL_ALBUM_ID {
            return Some(Album {
                id: ALL_ALBUM_ID.to_string(),
                title: "All".to_string(),
                root: self.root.clone(),
            });
        }
        let dir = self.root.join(album_id);
        if dir.is_dir() {
            Some(Album {
                id: album_id.to_string(),
                title: album_id.to_string(),
                root: dir,
            })
        } else {
            None
        }
    }

    // ---- the presentation-layer interface -------------------------------

    pub fn still_image(
        &self,
        album_id: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Vec<u8>>, SessionError> {
        self.session(album_id).still_image(width, height)
    }

    pub fn advance_selection(&self, album_id: &str, mode_override: Option<SelectionMode>) {
        self.session(album_id).advance_selection(mode_override);
    }

    pub fn album_summary(&self, album_id: &str) -> AlbumSummary {
        self.session(album_id).summary()
    }

    pub fn current_media_info(&self, album_id: &str) -> Option<MediaInfo> {
        self.session(album_id).media_info()
    }

    /// Summaries for every discovered album. Instantiates sessions, so each
    /// album gets scanned.
    pub fn albums(&self) -> Vec<AlbumSummary> {
        self.discover_albums()
            .iter()
            .map(|album| self.session(&album.id).summary())
            .collect()
    }
}

fn hidden_dir(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_solid_jpeg, create_test_jpeg};
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    fn pool() -> Arc<WorkerPool> {
        Arc::new(WorkerPool::new(2).unwrap())
    }

    fn album(root: &Path) -> Album {
        Album {
            id: "test".to_string(),
            title: "Test".to_string(),
            root: root.to_path_buf(),
        }
    }

    /// Sequential + Never: selection only moves when a test says so.
    fn pinned_settings(layout: LayoutMode) -> AlbumSettings {
        AlbumSettings {
            mode: SelectionMode::Sequential,
            interval: RotationInterval::Never,
            layout,
            ..AlbumSettings::default()
        }
    }

    fn decoded_size(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(bytes).unwrap();
        (img.width(), img.height())
    }

    // =========================================================================
    // Still image basics
    // =========================================================================

    #[test]
    fn empty_album_yields_no_image() {
        let tmp = TempDir::new().unwrap();
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        assert!(session.still_image(Some(200), Some(100)).unwrap().is_none());
        assert!(session.media_info().is_none());
    }

    #[test]
    fn still_image_matches_requested_viewport() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 640, 480);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Crop),
            pool(),
        );

        let bytes = session.still_image(Some(320), Some(160)).unwrap().unwrap();
        assert_eq!(decoded_size(&bytes), (320, 160));
    }

    #[test]
    fn still_image_uses_configured_default_size() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 640, 480);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let bytes = session.still_image(None, None).unwrap().unwrap();
        assert_eq!(decoded_size(&bytes), (1024, 512));
    }

    #[test]
    fn session_selects_initially_even_with_never_interval() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let info = session.media_info().unwrap();
        assert_eq!(info.filename, "a.jpg");
    }

    // =========================================================================
    // Cache behavior
    // =========================================================================

    #[test]
    fn repeated_requests_return_identical_bytes() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 640, 480);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let first = session.still_image(Some(200), Some(100)).unwrap().unwrap();
        let second = session.still_image(Some(200), Some(100)).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn advancing_invalidates_cached_renders() {
        let tmp = TempDir::new().unwrap();
        create_solid_jpeg(&tmp.path().join("a.jpg"), 400, 300, [200, 0, 0]);
        create_solid_jpeg(&tmp.path().join("b.jpg"), 400, 300, [0, 0, 200]);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Crop),
            pool(),
        );

        let before = session.still_image(Some(200), Some(150)).unwrap().unwrap();
        session.advance_selection(None);
        let after = session.still_image(Some(200), Some(150)).unwrap().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn layout_change_invalidates_cached_renders() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 640, 480);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let letterboxed = session.still_image(Some(320), Some(100)).unwrap().unwrap();
        session.set_layout(LayoutMode::Crop);
        let cropped = session.still_image(Some(320), Some(100)).unwrap().unwrap();
        assert_ne!(letterboxed, cropped);
    }

    // =========================================================================
    // Combined layout through the session
    // =========================================================================

    #[test]
    fn combined_falls_back_when_orientation_matches_viewport() {
        let tmp = TempDir::new().unwrap();
        // Landscape image, landscape viewport
        create_test_jpeg(&tmp.path().join("a.jpg"), 1000, 750);
        create_test_jpeg(&tmp.path().join("b.jpg"), 1000, 750);

        let combined_session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Combined),
            pool(),
        );
        let original_session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let combined = combined_session
            .still_image(Some(1024), Some(512))
            .unwrap()
            .unwrap();
        let original = original_session
            .still_image(Some(1024), Some(512))
            .unwrap()
            .unwrap();
        assert_eq!(combined, original);
    }

    #[test]
    fn combined_pairs_two_landscapes_on_a_portrait_viewport() {
        let tmp = TempDir::new().unwrap();
        create_solid_jpeg(&tmp.path().join("a.jpg"), 400, 300, [200, 0, 0]);
        create_solid_jpeg(&tmp.path().join("b.jpg"), 400, 300, [0, 0, 200]);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Combined),
            pool(),
        );

        let bytes = session.still_image(Some(512), Some(1024)).unwrap().unwrap();
        assert_eq!(decoded_size(&bytes), (512, 1024));

        // The partner got pinned for subsequent renders.
        let state = session.lock_state();
        assert!(state.selector.secondary_id().is_some());
    }

    #[test]
    fn combined_unavailable_without_a_like_oriented_partner() {
        let tmp = TempDir::new().unwrap();
        // One landscape primary, one portrait sibling: no eligible partner.
        create_solid_jpeg(&tmp.path().join("a.jpg"), 400, 300, [200, 0, 0]);
        create_solid_jpeg(&tmp.path().join("b.jpg"), 300, 400, [0, 0, 200]);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Combined),
            pool(),
        );

        let bytes = session.still_image(Some(512), Some(1024)).unwrap().unwrap();
        // Single-image fallback still fills the viewport.
        assert_eq!(decoded_size(&bytes), (512, 1024));
        let state = session.lock_state();
        assert!(state.selector.secondary_id().is_none());
    }

    // =========================================================================
    // Staleness and rescans
    // =========================================================================

    #[test]
    fn stale_selection_is_replaced_on_render() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);
        create_test_jpeg(&tmp.path().join("b.jpg"), 64, 48);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );
        assert_eq!(session.media_info().unwrap().filename, "a.jpg");

        std::fs::remove_file(tmp.path().join("a.jpg")).unwrap();
        session.rescan();

        let bytes = session.still_image(Some(100), Some(100)).unwrap();
        assert!(bytes.is_some());
        assert_eq!(session.media_info().unwrap().filename, "b.jpg");
    }

    #[test]
    fn rescan_updates_the_summary_count() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );
        assert_eq!(session.summary().item_count, 1);

        create_test_jpeg(&tmp.path().join("b.jpg"), 64, 48);
        session.rescan();
        assert_eq!(session.summary().item_count, 2);
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    #[test]
    fn listeners_hear_advances_until_unsubscribed() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);
        create_test_jpeg(&tmp.path().join("b.jpg"), 64, 48);
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let heard = Arc::new(AtomicUsize::new(0));
        let heard_in_listener = heard.clone();
        let id = session.subscribe(Box::new(move |event| {
            assert!(matches!(event, SessionEvent::SelectionChanged { .. }));
            heard_in_listener.fetch_add(1, Ordering::SeqCst);
        }));

        session.advance_selection(None);
        assert_eq!(heard.load(Ordering::SeqCst), 1);

        session.unsubscribe(id);
        session.advance_selection(None);
        assert_eq!(heard.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn advance_with_override_uses_that_mode() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            create_test_jpeg(&tmp.path().join(name), 64, 48);
        }
        let session = AlbumSession::new(
            album(tmp.path()),
            false,
            // Random by default; the override forces a deterministic step.
            AlbumSettings {
                mode: SelectionMode::Random,
                interval: RotationInterval::Never,
                layout: LayoutMode::Original,
                ..AlbumSettings::default()
            },
            pool(),
        );

        let before = session.media_info().unwrap().filename;
        session.advance_selection(Some(SelectionMode::Sequential));
        let after = session.media_info().unwrap().filename;
        assert_ne!(before, after);
    }

    // =========================================================================
    // Registry
    // =========================================================================

    #[test]
    fn registry_discovers_all_plus_subdirectories() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("loose.jpg"), 64, 48);
        let vacation = tmp.path().join("vacation");
        std::fs::create_dir(&vacation).unwrap();
        create_test_jpeg(&vacation.join("beach.jpg"), 64, 48);

        let registry = SessionRegistry::with_pool(
            tmp.path().to_path_buf(),
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let albums = registry.discover_albums();
        let ids: Vec<&str> = albums.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![ALL_ALBUM_ID, "vacation"]);
    }

    #[test]
    fn all_album_counts_recursively_subalbums_do_not() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("loose.jpg"), 64, 48);
        let vacation = tmp.path().join("vacation");
        std::fs::create_dir(&vacation).unwrap();
        create_test_jpeg(&vacation.join("beach.jpg"), 64, 48);

        let registry = SessionRegistry::with_pool(
            tmp.path().to_path_buf(),
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        assert_eq!(registry.album_summary(ALL_ALBUM_ID).item_count, 2);
        assert_eq!(registry.album_summary("vacation").item_count, 1);
    }

    #[test]
    fn unknown_album_falls_back_to_all() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);

        let registry = SessionRegistry::with_pool(
            tmp.path().to_path_buf(),
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let summary = registry.album_summary("no-such-album");
        assert_eq!(summary.id, ALL_ALBUM_ID);
    }

    #[test]
    fn registry_serves_still_images_by_album_id() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 640, 480);

        let registry = SessionRegistry::with_pool(
            tmp.path().to_path_buf(),
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let bytes = registry
            .still_image(ALL_ALBUM_ID, Some(200), Some(100))
            .unwrap()
            .unwrap();
        assert_eq!(decoded_size(&bytes), (200, 100));
        assert_eq!(
            registry.current_media_info(ALL_ALBUM_ID).unwrap().filename,
            "a.jpg"
        );
    }

    #[test]
    fn registry_reuses_sessions() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);

        let registry = SessionRegistry::with_pool(
            tmp.path().to_path_buf(),
            pinned_settings(LayoutMode::Original),
            pool(),
        );

        let first = registry.session(ALL_ALBUM_ID);
        let second = registry.session(ALL_ALBUM_ID);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
