//! rawfetch library: a blocking HTTP/1.1-over-TLS client with a local result cache.
//!
//! A fetch opens one TLS connection to port 443, sends a minimal `GET` with
//! `Connection: close`, reads until the peer closes, follows redirects (up to
//! five hops by default), and classifies the response:
//! JSON bodies become a [`ClassifiedResult::StructuredDocument`], everything
//! else is parsed as HTML into a [`ClassifiedResult::PageExtract`] holding
//! outbound links and a short text sample. Results are cached in a JSON file
//! keyed by request target, so a repeated fetch makes no network calls.
//!
//! # Example
//!
//! ```no_run
//! use rawfetch::{Client, Config, RequestTarget};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! rawfetch::initialization::init_crypto_provider();
//! let client = Client::from_config(&Config::default());
//! let target = RequestTarget::from_url("https://example.com/")?;
//! let result = client.fetch_page(&target)?;
//! println!("{}", serde_json::to_string_pretty(&result.to_display_value())?);
//! # Ok(())
//! # }
//! ```
//!
//! # Limitations
//!
//! Single request at a time, no connection reuse, no chunked or compressed
//! bodies (they are kept verbatim), and a single-writer cache file.

pub mod cache;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod http;
pub mod initialization;
pub mod parse;
pub mod search;
pub mod transport;
mod utils;

// Re-export public API
pub use cache::{CacheEntry, CacheKey, CacheStore};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{CacheError, ErrorType, FetchError};
pub use fetch::{Client, RedirectState};
pub use http::{RawResponse, RequestTarget};
pub use parse::{ClassifiedResult, LinkRule};
pub use search::search;
pub use transport::{TlsTransport, Transport};
