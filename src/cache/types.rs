//! Cache key and file format types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::CACHE_FORMAT_VERSION;
use crate::http::RequestTarget;
use crate::parse::ClassifiedResult;

/// Identifies one cache entry. Page fetches and searches live in separate
/// namespaces, so their signatures never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A page fetch, keyed by the originally requested target.
    Page(RequestTarget),
    /// A search, keyed by the normalized search term.
    Search(String),
}

impl CacheKey {
    /// The string stored in the cache file.
    pub fn signature(&self) -> String {
        match self {
            CacheKey::Page(target) => format!("page:{}", target.signature()),
            CacheKey::Search(term) => format!("search:{term}"),
        }
    }
}

/// A cached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CacheEntry {
    Page(ClassifiedResult),
    SearchResults(Vec<String>),
}

/// Only the version field, read before committing to the full layout.
#[derive(Debug, Deserialize)]
pub(crate) struct CacheFileHeader {
    pub(crate) format_version: u32,
}

/// On-disk layout of the cache file.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CacheFile {
    pub(crate) format_version: u32,
    pub(crate) entries: BTreeMap<String, CacheEntry>,
}

impl CacheFile {
    pub(crate) fn new(entries: BTreeMap<String, CacheEntry>) -> Self {
        Self {
            format_version: CACHE_FORMAT_VERSION,
            entries,
        }
    }
}
