//! Modification-time keyed parse cache.
//!
//! A cached value is served for as long as the backing file's mtime matches
//! the one observed when it was parsed. A failed parse is never cached, so a
//! broken file is retried on every access until it parses.
//!
//! Filesystems with coarse mtime granularity can hide a rewrite that lands in
//! the same tick as the previous one; that case is not detected.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::catalog::ParseFailure;

/// One cached parse result.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub source_mtime: SystemTime,
    pub value: Arc<T>,
}

/// Path → (mtime, parsed value). Unbounded for the life of the process.
#[derive(Debug)]
pub struct EntityCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T> EntityCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the cached value for `path` if its mtime is unchanged,
    /// otherwise run `parse` and cache a successful result.
    pub fn get_or_parse<F>(&mut self, path: &Path, parse: F) -> Result<Arc<T>, ParseFailure>
    where
        F: FnOnce(&Path) -> Result<T, ParseFailure>,
    {
        let mtime = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| ParseFailure::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(entry) = self.entries.get(path) {
            if entry.source_mtime == mtime {
                tracing::trace!("cache hit: {}", path.display());
                return Ok(Arc::clone(&entry.value));
            }
        }

        let value = Arc::new(parse(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                source_mtime: mtime,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
