//! Persistent result cache.
//!
//! A single JSON file holds the whole key → entry mapping, tagged with a
//! format version. `get` loads the file and looks the key up; `put` loads
//! the current mapping, replaces one entry and rewrites the file.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the cache file, so a reader never observes a half-written file.
//! The store is single-writer: two processes writing at once can still lose
//! one of their updates (the last rename wins). Entries never expire.

mod types;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::CACHE_FORMAT_VERSION;
use crate::error_handling::CacheError;
use crate::http::RequestTarget;
use crate::parse::ClassifiedResult;

pub use types::{CacheEntry, CacheKey};
use types::{CacheFile, CacheFileHeader};

/// File-backed cache of classified results and search results.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks up `key`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Io` if the cache file exists but cannot be read.
    /// A corrupt file or one with another format version reads as empty.
    pub fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let mut entries = self.load()?;
        Ok(entries.remove(&key.signature()))
    }

    /// Inserts or replaces the entry for `key` and rewrites the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the mapping cannot be
    /// serialized, or the new file cannot be written and renamed into place.
    pub fn put(&self, key: &CacheKey, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.load()?;
        entries.insert(key.signature(), entry);
        self.write(CacheFile::new(entries))
    }

    pub fn get_page(&self, target: &RequestTarget) -> Result<Option<ClassifiedResult>, CacheError> {
        match self.get(&CacheKey::Page(target.clone()))? {
            Some(CacheEntry::Page(result)) => Ok(Some(result)),
            Some(other) => {
                warn!("Ignoring cache entry of unexpected kind for {target}: {other:?}");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn put_page(
        &self,
        target: &RequestTarget,
        result: &ClassifiedResult,
    ) -> Result<(), CacheError> {
        self.put(
            &CacheKey::Page(target.clone()),
            CacheEntry::Page(result.clone()),
        )
    }

    /// `term` must already be normalized.
    pub fn get_search(&self, term: &str) -> Result<Option<Vec<String>>, CacheError> {
        match self.get(&CacheKey::Search(term.to_string()))? {
            Some(CacheEntry::SearchResults(links)) => Ok(Some(links)),
            Some(other) => {
                warn!("Ignoring cache entry of unexpected kind for search '{term}': {other:?}");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// `term` must already be normalized.
    pub fn put_search(&self, term: &str, links: &[String]) -> Result<(), CacheError> {
        self.put(
            &CacheKey::Search(term.to_string()),
            CacheEntry::SearchResults(links.to_vec()),
        )
    }

    fn load(&self) -> Result<BTreeMap<String, CacheEntry>, CacheError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read(&self.path).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;

        match serde_json::from_slice::<CacheFileHeader>(&content) {
            Ok(header) if header.format_version == CACHE_FORMAT_VERSION => {}
            Ok(header) => {
                warn!(
                    "Ignoring cache file {} with format version {} (expected {})",
                    self.path.display(),
                    header.format_version,
                    CACHE_FORMAT_VERSION
                );
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable cache file {}: {}",
                    self.path.display(),
                    e
                );
                return Ok(BTreeMap::new());
            }
        }

        match serde_json::from_slice::<CacheFile>(&content) {
            Ok(file) => {
                debug!(
                    "Loaded {} cache entries from {}",
                    file.entries.len(),
                    self.path.display()
                );
                Ok(file.entries)
            }
            Err(e) => {
                warn!("Ignoring corrupt cache file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn write(&self, file: CacheFile) -> Result<(), CacheError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let content = serde_json::to_string_pretty(&file)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path)
            .map_err(|source| CacheError::Persist {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Wrote {} cache entries to {}",
            file.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
