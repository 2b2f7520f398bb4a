//! Response classification and HTML extraction.
//!
//! This module turns a decoded response into a `ClassifiedResult`:
//! - JSON bodies become a `StructuredDocument`
//! - Everything else is parsed as HTML into a `PageExtract` (links and a
//!   visible-text sample)
//!
//! All HTML parsing is done with CSS selectors via the `scraper` crate.

mod classify;
mod links;
mod text;

// Re-export public API
pub use classify::{classify, is_json_content_type, ClassifiedResult};
pub use links::{anchor_hrefs, extract_page_links, LinkRule};
pub use text::extract_text_sample;
