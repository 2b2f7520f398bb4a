//! CSS selector helpers.

use scraper::Selector;

/// Compiles one of the crate's built-in CSS selectors.
///
/// Meant for `LazyLock` statics whose selector text is a literal.
///
/// # Panics
///
/// Panics if `selector_str` is not valid CSS, naming `name` in the message.
pub fn static_selector(selector_str: &str, name: &str) -> Selector {
    Selector::parse(selector_str)
        .unwrap_or_else(|e| panic!("built-in selector {name} ('{selector_str}') is invalid: {e}"))
}
