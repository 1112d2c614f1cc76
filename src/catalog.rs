//! Album discovery and media indexing.
//!
//! The filesystem is the only data source: an album is a directory of image
//! files, and the distinguished [`ALL_ALBUM_ID`] album aggregates every image
//! under the root recursively. Scanning produces a [`MediaIndex`] — an
//! immutable, filename-sorted snapshot — that the selector and compositor
//! read from. Rescans never mutate a snapshot in place; they build a fresh
//! index and swap it atomically, so concurrent readers keep a consistent view.
//!
//! ## File acceptance
//!
//! A file becomes a [`MediaItem`] only if all of these hold:
//!
//! - its extension is on the fixed allow-list (jpg, jpeg, png, gif, bmp,
//!   webp — case-insensitive),
//! - it is a regular file of at most 20 MiB,
//! - the format sniffed from its leading bytes agrees with the extension.
//!
//! Hidden files (leading `.`) are skipped outright.
//!
//! ## Ordering
//!
//! Items are sorted case-insensitively by filename, with the raw filename as
//! a tie-break so the order is total and reproducible. This ordering is the
//! contract for sequential selection. Item ids are filenames; when the
//! recursive ALL album surfaces the same filename twice, the last-seen file
//! wins.

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

/// Id of the album that aggregates every image under the root, recursively.
pub const ALL_ALBUM_ID: &str = "ALL";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Files larger than this are never indexed.
const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Leading bytes read for format sniffing. All supported formats put their
/// magic number within the first few bytes.
const SNIFF_BYTES: usize = 64;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable album root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A named collection of media items backed by one directory.
#[derive(Debug, Clone)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub root: PathBuf,
}

/// One indexed image file. Rebuilt from scratch on every scan — holders keep
/// the `id`, never the struct, across rescans.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Stable id, derived from the filename.
    pub id: String,
    pub filename: String,
    pub path: PathBuf,
    pub created_at: SystemTime,
}

impl MediaItem {
    fn from_path(path: PathBuf) -> Option<Self> {
        let filename = path.file_name()?.to_string_lossy().to_string();
        let created_at = file_created_at(&path);
        Some(Self {
            id: filename.clone(),
            filename,
            path,
            created_at,
        })
    }
}

/// The earlier of the file's creation and modification time; now if neither
/// is readable.
fn file_created_at(path: &Path) -> SystemTime {
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return SystemTime::now(),
    };
    match (meta.created().ok(), meta.modified().ok()) {
        (Some(c), Some(m)) => c.min(m),
        (Some(t), None) | (None, Some(t)) => t,
        (None, None) => SystemTime::now(),
    }
}

/// Immutable, ordered snapshot of an album's media.
#[derive(Debug, Default)]
pub struct MediaIndex {
    items: Vec<MediaItem>,
    by_id: HashMap<String, usize>,
}

impl MediaIndex {
    /// Build an index: duplicate ids collapse to the last-seen item, then
    /// everything is sorted case-insensitively by filename (raw filename as
    /// tie-break, so the order is total).
    pub fn from_items(items: Vec<MediaItem>) -> Self {
        let mut last_seen: HashMap<String, MediaItem> = HashMap::new();
        for item in items {
            last_seen.insert(item.id.clone(), item);
        }

        let mut items: Vec<MediaItem> = last_seen.into_values().collect();
        items.sort_by(|a, b| {
            a.filename
                .to_lowercase()
                .cmp(&b.filename.to_lowercase())
                .then_with(|| a.filename.cmp(&b.filename))
        });

        let by_id = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.clone(), i))
            .collect();

        Self { items, by_id }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Look up an item by id.
    pub fn resolve(&self, id: &str) -> Option<&MediaItem> {
        self.by_id.get(id).map(|&i| &self.items[i])
    }

    /// Position of an item in the sorted order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// All items except the one with the given id, in index order.
    pub fn siblings(&self, exclude_id: &str) -> Vec<&MediaItem> {
        self.items.iter().filter(|m| m.id != exclude_id).collect()
    }
}

/// One album's view of the filesystem: scan configuration plus the current
/// index snapshot.
pub struct Catalog {
    album: Album,
    recursive: bool,
    index: RwLock<Arc<MediaIndex>>,
}

impl Catalog {
    /// A catalog that scans only the album directory itself.
    pub fn new(album: Album) -> Self {
        Self {
            album,
            recursive: false,
            index: RwLock::new(Arc::new(MediaIndex::default())),
        }
    }

    /// A catalog that walks the whole tree under the album root (the ALL
    /// album).
    pub fn new_recursive(album: Album) -> Self {
        Self {
            album,
            recursive: true,
            index: RwLock::new(Arc::new(MediaIndex::default())),
        }
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Number of items in the current snapshot.
    pub fn item_count(&self) -> usize {
        self.snapshot().len()
    }

    /// The current index snapshot. Cheap; safe to hold across a rescan.
    pub fn snapshot(&self) -> Arc<MediaIndex> {
        self.index.read().expect("catalog index lock poisoned").clone()
    }

    /// Atomically install a freshly built index. Readers holding the old
    /// snapshot are unaffected.
    pub fn install(&self, index: MediaIndex) -> Arc<MediaIndex> {
        debug!("album '{}': indexed {} items", self.album.id, index.len());
        let fresh = Arc::new(index);
        *self.index.write().expect("catalog index lock poisoned") = fresh.clone();
        fresh
    }

    /// Re-scan the album directory and atomically install the new index.
    ///
    /// An unreadable root degrades to an empty index with a warning — the
    /// engine keeps working with zero items. Never touches selection state.
    pub fn rescan(&self) -> Arc<MediaIndex> {
        let items = match scan_media(&self.album.root, self.recursive) {
            Ok(items) => items,
            Err(err) => {
                warn!("scan of album '{}' failed: {err}", self.album.id);
                Vec::new()
            }
        };
        self.install(MediaIndex::from_items(items))
    }
}

/// Scan a directory for acceptable image files.
pub fn scan_media(root: &Path, recursive: bool) -> Result<Vec<MediaItem>, CatalogError> {
    // Surface root unreadability as one error; per-file problems only skip
    // the file.
    fs::read_dir(root).map_err(|source| CatalogError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let candidates: Vec<PathBuf> = if recursive {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    } else {
        fs::read_dir(root)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect()
    };

    let items = candidates
        .into_iter()
        .filter(|p| !is_hidden(p))
        .filter(|p| is_valid_image(p))
        .filter_map(MediaItem::from_path)
        .collect();
    Ok(items)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true)
}

/// Acceptance check: allow-listed extension, size ceiling, and agreement
/// between the sniffed content format and the extension.
fn is_valid_image(path: &Path) -> bool {
    let ext = match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
        Some(ext) => ext,
        None => return false,
    };
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return false,
    };
    if !meta.is_file() {
        return false;
    }
    if meta.len() > MAX_FILE_BYTES {
        warn!("skipping oversized file ({} bytes): {}", meta.len(), path.display());
        return false;
    }

    let expected = match image::ImageFormat::from_extension(&ext) {
        Some(fmt) => fmt,
        None => return false,
    };
    match sniff_format(path) {
        Some(actual) if actual == expected => true,
        Some(actual) => {
            warn!(
                "extension/content mismatch ({ext} vs {actual:?}): {}",
                path.display()
            );
            false
        }
        None => false,
    }
}

/// Guess the image format from the file's leading bytes.
fn sniff_format(path: &Path) -> Option<image::ImageFormat> {
    let mut head = [0u8; SNIFF_BYTES];
    let mut file = fs::File::open(path).ok()?;
    let n = file.read(&mut head).ok()?;
    image::guess_format(&head[..n]).ok()
}
