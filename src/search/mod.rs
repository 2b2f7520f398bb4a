//! Web search on top of the fetch pipeline.
//!
//! Fetches the search engine's results page for a term and keeps up to
//! `MAX_SEARCH_RESULTS` result links, picked with
//! `LinkRule::SearchResultRedirect`. Only non-empty result lists are cached,
//! under the normalized term. The results page itself never enters the page
//! cache, so a term that found nothing is searched again next time.

use log::{info, warn};
use url::form_urlencoded;

use crate::config::{MAX_SEARCH_RESULTS, SEARCH_HOST, SEARCH_PATH_PREFIX};
use crate::error_handling::FetchError;
use crate::fetch::Client;
use crate::http::RequestTarget;
use crate::parse::{ClassifiedResult, LinkRule};
use crate::transport::Transport;

/// Normalizes a term for use as a cache key: trimmed, inner whitespace
/// collapsed to single spaces, lowercased.
pub fn normalize_search_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The results page target for `term` (form-urlencoded).
pub fn search_target(term: &str) -> RequestTarget {
    let encoded: String = form_urlencoded::byte_serialize(term.trim().as_bytes()).collect();
    RequestTarget::new(SEARCH_HOST, format!("{SEARCH_PATH_PREFIX}{encoded}"))
}

/// Extracts result links from a classified results page.
///
/// Only a `PageExtract` can hold results; a JSON document yields none.
pub fn extract_search_results(result: &ClassifiedResult) -> Vec<String> {
    let Some(links) = result.links() else {
        return Vec::new();
    };
    let mut results = LinkRule::SearchResultRedirect.filter(links.iter().map(String::as_str));
    results.truncate(MAX_SEARCH_RESULTS);
    results
}

/// Searches for `term` and returns up to `MAX_SEARCH_RESULTS` links.
///
/// # Errors
///
/// - `FetchError::NoResults` for an empty term, or when the results page
///   contains no result links
/// - any error from fetching the results page
pub fn search<T: Transport>(client: &Client<T>, term: &str) -> Result<Vec<String>, FetchError> {
    let normalized = normalize_search_term(term);
    if normalized.is_empty() {
        return Err(FetchError::NoResults {
            term: term.to_string(),
        });
    }

    match client.cache().get_search(&normalized) {
        Ok(Some(cached)) => {
            info!("Using cached data for search '{normalized}'");
            return Ok(cached);
        }
        Ok(None) => {}
        Err(e) => warn!("Cache lookup failed, searching '{normalized}' anyway: {e}"),
    }

    let page = client.fetch_uncached(&search_target(term))?;
    let results = extract_search_results(&page);
    if results.is_empty() {
        return Err(FetchError::NoResults {
            term: term.to_string(),
        });
    }

    info!("Found {} result(s) for '{normalized}'", results.len());
    if let Err(e) = client.cache().put_search(&normalized, &results) {
        warn!("Failed to cache search results for '{normalized}': {e}");
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_search_term() {
        assert_eq!(normalize_search_term("  Rust   TLS\tclient "), "rust tls client");
        assert_eq!(normalize_search_term("cats"), "cats");
        assert_eq!(normalize_search_term("   "), "");
    }

    #[test]
    fn test_search_target_encodes_term() {
        let target = search_target("cats");
        assert_eq!(target, RequestTarget::new("www.google.com", "/search?q=cats"));

        let target = search_target("c++ & rust?");
        assert_eq!(target.path, "/search?q=c%2B%2B+%26+rust%3F");
    }

    #[test]
    fn test_extract_search_results_caps_at_ten() {
        let links = (0..25)
            .map(|i| format!("/url?q=https://r{i}.test/&sa=U"))
            .collect();
        let page = ClassifiedResult::PageExtract {
            links,
            text_sample: String::new(),
        };
        let results = extract_search_results(&page);
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results[0], "https://r0.test/");
        assert_eq!(results[9], "https://r9.test/");
    }

    #[test]
    fn test_extract_search_results_from_json_is_empty() {
        let doc = ClassifiedResult::StructuredDocument(serde_json::json!({"links": ["x"]}));
        assert!(extract_search_results(&doc).is_empty());
    }
}
