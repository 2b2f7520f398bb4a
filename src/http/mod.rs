//! HTTP message types.
//!
//! This module provides:
//! - `RequestTarget`, the `(host, path)` pair a fetch is addressed to
//! - The request encoder and response decoder (`codec`)

pub mod codec;
mod target;

// Re-export public API
pub use codec::{decode_response, encode_request, Headers, RawResponse, StatusLine};
pub use target::{validate_and_normalize_url, RequestTarget};
