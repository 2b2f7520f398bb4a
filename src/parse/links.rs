//! Anchor link extraction rules.
//!
//! Two rules exist, one per use site, and they are never interchanged:
//! - `LinkRule::ContainsHttp` picks page links for a generic fetch
//! - `LinkRule::SearchResultRedirect` picks result links from a search page

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::config::SEARCH_HOST;

const ANCHOR_SELECTOR_STR: &str = "a[href]";
const SEARCH_REDIRECT_PATH: &str = "/url";
const SEARCH_REDIRECT_PARAM: &str = "q";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| crate::utils::static_selector(ANCHOR_SELECTOR_STR, "ANCHOR_SELECTOR"));

/// A named rule deciding which `href` values count as links, and what link
/// each accepted `href` yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRule {
    /// Any `href` containing the substring `http`, kept verbatim
    /// (surrounding whitespace included).
    ///
    /// Deliberately loose: it is not URL validation.
    ContainsHttp,
    /// Search engine result redirects of the form `/url?q=<target>`
    /// (relative, or absolute on the search host). Yields the decoded
    /// `q` target when it is an `http`/`https` URL.
    SearchResultRedirect,
}

impl LinkRule {
    /// Applies the rule to one `href`.
    pub fn apply(&self, href: &str) -> Option<String> {
        match self {
            LinkRule::ContainsHttp => href.contains("http").then(|| href.to_string()),
            LinkRule::SearchResultRedirect => search_redirect_target(href),
        }
    }

    /// Applies the rule to a list of candidate `href` values, keeping order
    /// and dropping duplicates.
    pub fn filter<'a, I>(&self, hrefs: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = std::collections::HashSet::new();
        hrefs
            .into_iter()
            .filter_map(|href| self.apply(href))
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }
}

/// Collects the raw `href` attribute of every anchor in document order.
pub fn anchor_hrefs(document: &Html) -> Vec<&str> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .collect()
}

/// Extracts page links with `LinkRule::ContainsHttp`.
///
/// Duplicates are kept: the list mirrors the anchors on the page.
pub fn extract_page_links(document: &Html) -> Vec<String> {
    anchor_hrefs(document)
        .into_iter()
        .filter_map(|href| LinkRule::ContainsHttp.apply(href))
        .collect()
}

fn search_redirect_target(href: &str) -> Option<String> {
    let base = Url::parse(&format!("https://{SEARCH_HOST}/")).ok()?;
    let url = base.join(href).ok()?;
    if url.host_str() != Some(SEARCH_HOST) || url.path() != SEARCH_REDIRECT_PATH {
        return None;
    }
    let target = url
        .query_pairs()
        .find(|(key, _)| key == SEARCH_REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())?;
    let parsed = Url::parse(&target).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(target)
}
