//! Error type definitions.
//!
//! This module defines the fetch, cache and initialization errors used
//! throughout the client, and the `ErrorType` kinds they are reported under.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors that end a single fetch (or search) attempt.
///
/// Every variant is terminal: nothing in the pipeline retries.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The target could not be turned into a host and path.
    #[error("invalid request target '{0}'")]
    InvalidTarget(String),

    /// Host name did not resolve.
    #[error("DNS resolution failed for {host}: {source}")]
    Dns {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// TCP connection could not be established.
    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// TLS handshake (or server name validation) failed.
    #[error("TLS handshake with {host} failed: {message}")]
    Tls { host: String, message: String },

    /// Socket read or write exceeded the configured timeout.
    #[error("timed out talking to {host} after {seconds}s")]
    Timeout { host: String, seconds: u64 },

    /// Any other socket error while writing the request or reading the response.
    #[error("I/O error talking to {host}: {source}")]
    Io {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Response bytes could not be framed (no header/body separator, bad
    /// status line, redirect without `Location`, oversized response).
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Body declared as JSON did not parse.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Redirect hop bound reached.
    #[error("too many redirects ({max_hops} hops) while fetching {target}")]
    RedirectLimitExceeded { max_hops: u32, target: String },

    /// Search page yielded no usable result links.
    #[error("no search results for '{term}'")]
    NoResults { term: String },
}

impl FetchError {
    /// Returns the kind this error is reported under.
    pub fn kind(&self) -> ErrorType {
        match self {
            FetchError::InvalidTarget(_) => ErrorType::InvalidTarget,
            FetchError::Dns { .. }
            | FetchError::Connect { .. }
            | FetchError::Tls { .. }
            | FetchError::Io { .. } => ErrorType::Connectivity,
            FetchError::Timeout { .. } => ErrorType::Timeout,
            FetchError::MalformedResponse(_) => ErrorType::MalformedResponse,
            FetchError::Parse(_) => ErrorType::Parse,
            FetchError::RedirectLimitExceeded { .. } => ErrorType::RedirectLimitExceeded,
            FetchError::NoResults { .. } => ErrorType::NoResults,
        }
    }
}

/// Error types for cache file operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading, creating or writing the cache file failed.
    #[error("cache file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache map could not be serialized.
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The temporary file could not be renamed over the cache file.
    #[error("failed to replace cache file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Kinds of fetch failures, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    InvalidTarget,
    Connectivity,
    Timeout,
    MalformedResponse,
    Parse,
    RedirectLimitExceeded,
    NoResults,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidTarget => "invalid target",
            ErrorType::Connectivity => "connectivity error",
            ErrorType::Timeout => "timeout",
            ErrorType::MalformedResponse => "malformed response",
            ErrorType::Parse => "parse error",
            ErrorType::RedirectLimitExceeded => "redirect limit exceeded",
            ErrorType::NoResults => "no results",
        }
    }
}
