//! Configuration constants.
//!
//! This module defines the constants used throughout the client, including
//! the wire port, timeouts, size limits, and the search engine endpoint.

/// Port used for every retrieval (TLS only, no plain-text fallback)
pub const HTTPS_PORT: u16 = 443;

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Default time allowed for the TLS exchange after connecting, in seconds.
/// Applies to the TLS handshake and to every read of the response stream.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Size of each read from the TLS stream
pub const READ_CHUNK_SIZE: usize = 4096;

/// Maximum accepted response size in bytes (10MB).
/// A peer that keeps sending past this is treated as a malformed response.
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

// Redirects
/// Maximum number of redirect hops followed before giving up
pub const MAX_REDIRECT_HOPS: u32 = 5;

// Content classification
/// Maximum length of the text sample kept for markup responses, in characters
pub const TEXT_SAMPLE_MAX_CHARS: usize = 100;
/// Content-Type substring that selects the structured-data path
pub const JSON_CONTENT_TYPE: &str = "application/json";

// Search
/// Host of the search engine results page
pub const SEARCH_HOST: &str = "www.google.com";
/// Path of the results page; the encoded term is appended
pub const SEARCH_PATH_PREFIX: &str = "/search?q=";
/// Maximum number of result links returned by a search
pub const MAX_SEARCH_RESULTS: usize = 10;

// Cache
/// Default cache file, relative to the working directory
pub const DEFAULT_CACHE_PATH: &str = "./rawfetch_cache.json";
/// Version written into the cache file; files with another version are ignored
pub const CACHE_FORMAT_VERSION: u32 = 1;

// URL validation
/// Maximum URL length accepted on the command line (matches common browser limits)
pub const MAX_URL_LENGTH: usize = 2048;
