//! Visible text sampling.

use scraper::{Html, Node};

use crate::config::TEXT_SAMPLE_MAX_CHARS;

/// Elements whose text content is never rendered.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line when rendered. Text in different blocks is
/// separated by a space; text split only by inline markup is not.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "html", "legend", "li", "main", "nav", "ol", "option",
    "p", "pre", "section", "summary", "table", "td", "th", "tr", "ul",
];

/// Returns the first `TEXT_SAMPLE_MAX_CHARS` characters of the document's
/// visible text.
///
/// Text nodes inside `script`, `style`, `noscript`, `template` and `head`
/// are skipped, and runs of whitespace collapse to a single space. Block
/// boundaries and `<br>` count as whitespace; inline markup such as
/// `<b>Hel</b>lo` does not. The result is trimmed and never exceeds the
/// character limit.
pub fn extract_text_sample(document: &Html) -> String {
    let mut collapsed = String::new();
    let mut pending_space = false;
    let mut last_block = None;

    'nodes: for node in document.tree.root().descendants() {
        let text = match node.value() {
            Node::Text(text) => text,
            Node::Element(element) if element.name() == "br" => {
                pending_space = !collapsed.is_empty();
                continue;
            }
            _ => continue,
        };
        if node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| INVISIBLE_ELEMENTS.contains(&e.name()))
        {
            continue;
        }

        let block = node
            .ancestors()
            .find(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| BLOCK_ELEMENTS.contains(&e.name()))
            })
            .map(|a| a.id());
        if block != last_block {
            pending_space = !collapsed.is_empty();
            last_block = block;
        }

        for ch in text.chars() {
            if ch.is_whitespace() {
                pending_space = !collapsed.is_empty();
                continue;
            }
            if pending_space {
                collapsed.push(' ');
                pending_space = false;
            }
            collapsed.push(ch);
            if collapsed.chars().count() >= TEXT_SAMPLE_MAX_CHARS {
                break 'nodes;
            }
        }
    }

    truncate_chars(collapsed.trim(), TEXT_SAMPLE_MAX_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}
