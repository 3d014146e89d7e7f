//! Persistent Tier Module
//!
//! Optional second storage tier: cache entries mirrored to a single JSON
//! file so they survive a restart.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::CacheEntry;

// == Persistent Tier ==
/// File-backed map of cache key to entry.
///
/// The whole file is read once on open and rewritten after every change.
/// I/O failures are logged and never surface to callers.
#[derive(Debug)]
pub struct PersistentTier {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl PersistentTier {
    /// Opens the tier backed by `path`, loading any entries already on disk.
    ///
    /// A missing file starts empty; an unreadable one is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable cache file");
                HashMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "persistent tier opened");
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the entry for `key` if present and unexpired.
    ///
    /// An expired entry is removed from the file.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if !entry.is_expired() {
            return Some(entry.clone());
        }
        self.entries.remove(key);
        self.flush();
        None
    }

    pub fn insert(&mut self, key: String, entry: CacheEntry) {
        self.entries.insert(key, entry);
        self.flush();
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.flush();
        }
        removed
    }

    /// Removes every entry whose key contains `pattern`.
    pub fn remove_matching(&mut self, pattern: &str) -> usize {
        self.retain(|key, _| !key.contains(pattern))
    }

    pub fn remove_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        self.retain(|_, entry| !entry.is_expired_at(now))
    }

    pub fn clear(&mut self) -> usize {
        self.retain(|_, _| false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&String, &mut CacheEntry) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(keep);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.flush();
        }
        removed
    }

    fn flush(&self) {
        if let Err(err) = save(&self.path, &self.entries) {
            warn!(path = %self.path.display(), error = %err, "failed to write cache file");
        }
    }
}

fn load(path: &Path) -> io::Result<HashMap<String, CacheEntry>> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(err) => Err(err),
    }
}

fn save(path: &Path, entries: &HashMap<String, CacheEntry>) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json =
        serde_json::to_vec(entries).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
