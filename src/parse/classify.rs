//! Content-type driven classification of responses.

use log::debug;
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::config::JSON_CONTENT_TYPE;
use crate::error_handling::FetchError;
use crate::http::RawResponse;

use super::links::extract_page_links;
use super::text::extract_text_sample;

/// The classified outcome of a fetch. This is what gets cached and printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClassifiedResult {
    /// Body of a response declared as JSON.
    StructuredDocument(serde_json::Value),
    /// Links and a short text sample from a markup response.
    PageExtract {
        links: Vec<String>,
        #[serde(rename = "text")]
        text_sample: String,
    },
}

impl ClassifiedResult {
    /// Page links, when this is a markup extract.
    pub fn links(&self) -> Option<&[String]> {
        match self {
            ClassifiedResult::PageExtract { links, .. } => Some(links),
            ClassifiedResult::StructuredDocument(_) => None,
        }
    }

    /// The value shown to the user: the JSON document itself, or
    /// `{"links": [...], "text": "..."}` for a page extract.
    pub fn to_display_value(&self) -> serde_json::Value {
        match self {
            ClassifiedResult::StructuredDocument(value) => value.clone(),
            ClassifiedResult::PageExtract { links, text_sample } => serde_json::json!({
                "links": links,
                "text": text_sample,
            }),
        }
    }
}

/// Whether a `Content-Type` value selects the structured-data path.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(JSON_CONTENT_TYPE)
}

/// Classifies a response by its declared `Content-Type`.
///
/// JSON content types are parsed with `serde_json`; everything else,
/// including a missing `Content-Type`, is parsed as markup.
///
/// # Errors
///
/// Returns `FetchError::Parse` when a body declared as JSON does not parse.
/// There is no fallback to markup parsing.
pub fn classify(response: &RawResponse) -> Result<ClassifiedResult, FetchError> {
    let content_type = response.content_type().unwrap_or_default();

    if is_json_content_type(content_type) {
        debug!("Classifying {} byte body as JSON", response.body.len());
        let value: serde_json::Value = serde_json::from_slice(&response.body)?;
        return Ok(ClassifiedResult::StructuredDocument(value));
    }

    debug!(
        "Classifying {} byte body as markup (Content-Type: '{}')",
        response.body.len(),
        content_type
    );
    let body = String::from_utf8_lossy(&response.body);
    let document = Html::parse_document(&body);
    Ok(ClassifiedResult::PageExtract {
        links: extract_page_links(&document),
        text_sample: extract_text_sample(&document),
    })
}
