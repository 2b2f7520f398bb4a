//! Error handling.
//!
//! This module provides:
//! - `FetchError`, the single failure type of the fetch pipeline and search
//! - `ErrorType`, the user-facing kind each failure is reported under
//! - `CacheError` for cache file operations
//! - `InitializationError` for start-up failures
//!
//! Error kinds are:
//! - **Connectivity**: DNS, TCP connect, TLS handshake and socket failures
//! - **Timeout**: a bounded socket read/write elapsed
//! - **MalformedResponse**: response bytes that cannot be framed
//! - **Parse**: a JSON body that does not parse
//! - **RedirectLimitExceeded**: the redirect hop bound was reached
//! - **NoResults**: a search produced no usable links
//! - **InvalidTarget**: the requested URL has no usable host

mod types;

// Re-export public API
pub use types::{CacheError, ErrorType, FetchError, InitializationError};
