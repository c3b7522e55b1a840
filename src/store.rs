//! Persistent notification-history store.
//!
//! A path-addressed key-value map from torrent name to the per-category
//! last-notified timestamps, serialized as pretty-printed JSON. The store is
//! an explicit handle passed into the deduplication policy; nothing in the
//! crate touches the file behind its back.
//!
//! Writes go through [`NotificationStore::flush`], which stages the new
//! contents in a temporary file in the same directory, fsyncs it, and renames
//! it over the store path, so a crash mid-write leaves the previous state
//! intact. There is no cross-process locking: the design assumes at most one
//! tool instance runs against a given store file at a time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Per-torrent value: category label mapped to last-notified timestamp.
pub type CategoryTimes = BTreeMap<String, NaiveDateTime>;

/// Errors that can occur while opening or flushing the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or staging the store file failed.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file holds invalid JSON.
    #[error("store at {path} is corrupt: {source}")]
    Corrupt {
        /// Store file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Durable map of torrent name to per-category last-notified timestamps.
#[derive(Debug)]
pub struct NotificationStore {
    path: PathBuf,
    entries: BTreeMap<String, CategoryTimes>,
}

impl NotificationStore {
    /// Opens the store at `path`, reading existing contents if present.
    ///
    /// A missing file is not an error: the store opens empty and the file is
    /// created on the first [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file exists but cannot be read or
    /// does not contain valid store JSON.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        Ok(Self { path, entries })
    }

    /// Returns the last-notified timestamp for `name` under `category`, if
    /// one was recorded.
    #[must_use]
    pub fn last_notified(&self, name: &str, category: &str) -> Option<NaiveDateTime> {
        self.entries.get(name).and_then(|c| c.get(category)).copied()
    }

    /// Replaces the entire per-category map for `name`.
    pub fn replace(&mut self, name: &str, times: CategoryTimes) {
        self.entries.insert(name.to_string(), times);
    }

    /// Removes the entry for `name`, returning `true` if one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Returns the names of all recorded torrents.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterates over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryTimes)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of recorded torrents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Durably writes the current contents to the store path.
    ///
    /// The contents are staged in a temporary file in the store's directory,
    /// fsynced, and renamed over the path, so readers never observe a
    /// half-written store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when staging, syncing, or renaming fails.
    pub fn flush(&self) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut staged, &self.entries).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e.into(),
        })?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged
            .persist(&self.path)
            .map_err(|e| io_err(e.error))?;

        Ok(())
    }
}
