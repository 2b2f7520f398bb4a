//! Request targets and URL normalization.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::FetchError;

/// The `(host, path)` pair identifying one retrievable resource.
///
/// `path` always starts with `/` and carries the query string, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTarget {
    pub host: String,
    pub path: String,
}

impl RequestTarget {
    /// Builds a target, defaulting an empty path to `/`.
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            host: host.into(),
            path,
        }
    }

    /// Parses a user-supplied URL into a target.
    ///
    /// Adds an `https://` prefix when no scheme is given. Only `http` and
    /// `https` are accepted; either way the request goes out over TLS.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidTarget` for over-long URLs, unparseable
    /// URLs, unsupported schemes, or URLs without a host.
    pub fn from_url(url: &str) -> Result<Self, FetchError> {
        let url = url.trim();
        let normalized = validate_and_normalize_url(url)
            .ok_or_else(|| FetchError::InvalidTarget(url.to_string()))?;
        let parsed =
            Url::parse(&normalized).map_err(|_| FetchError::InvalidTarget(url.to_string()))?;
        Self::from_parsed(&parsed).ok_or_else(|| FetchError::InvalidTarget(url.to_string()))
    }

    /// Extracts host, path and query from an already parsed URL.
    ///
    /// Returns `None` when the URL has no host.
    pub(crate) fn from_parsed(url: &Url) -> Option<Self> {
        let host = url.host_str().filter(|h| !h.is_empty())?;
        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        Some(Self::new(host, path))
    }

    /// Cache signature: host and path joined with `_`.
    pub fn signature(&self) -> String {
        format!("{}_{}", self.host, self.path)
    }

    /// The target as an `https` URL, used as the base for resolving
    /// relative `Location` values.
    pub fn to_url(&self) -> Result<Url, FetchError> {
        Url::parse(&format!("https://{}{}", self.host, self.path))
            .map_err(|_| FetchError::InvalidTarget(self.to_string()))
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.path)
    }
}

/// Validates and normalizes a URL.
///
/// Adds https:// prefix if missing, then validates that the URL is syntactically
/// valid and uses http/https scheme. Logs a warning and returns None if the URL
/// is invalid, too long, or uses an unsupported scheme.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            url.chars().take(50).collect::<String>()
        );
        return None;
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting normalized URL exceeding maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        );
        return None;
    }

    match Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => {
                Some(normalized)
            }
            "http" | "https" => {
                warn!("Rejecting URL without a host: {url}");
                None
            }
            _ => {
                warn!("Rejecting unsupported scheme for URL: {url}");
                None
            }
        },
        Err(_) => {
            warn!("Rejecting invalid URL: {url}");
            None
        }
    }
}
