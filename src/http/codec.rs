//! HTTP/1.1 message framing.
//!
//! Builds the minimal retrieval request and splits raw response bytes into a
//! status line, headers and body.
//!
//! Known limitation: the body is used verbatim. Chunked transfer-encoding and
//! content-encoding are not decoded; `decode_response` logs a warning when a
//! response declares either, so every caller sees the same behavior.

use log::{debug, warn};

use crate::error_handling::FetchError;
use crate::http::target::RequestTarget;

const HEADER_BODY_SEPARATOR: &[u8] = b"\r\n\r\n";
const LINE_SEPARATOR: &str = "\r\n";

/// Parsed response status line (`HTTP/1.1 302 Found`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: String,
    pub code: u16,
    pub reason: String,
}

impl StatusLine {
    /// Parses `VERSION CODE [REASON]`.
    pub fn parse(line: &str) -> Result<Self, FetchError> {
        let mut parts = line.trim().splitn(3, ' ');
        let version = parts.next().unwrap_or_default();
        if !version.starts_with("HTTP/") {
            return Err(FetchError::MalformedResponse(format!(
                "invalid status line '{line}'"
            )));
        }
        let code = parts
            .next()
            .and_then(|c| c.parse::<u16>().ok())
            .ok_or_else(|| {
                FetchError::MalformedResponse(format!("invalid status code in '{line}'"))
            })?;
        let reason = parts.next().unwrap_or_default().trim().to_string();
        Ok(Self {
            version: version.to_string(),
            code,
            reason,
        })
    }

    /// Whether the code is in the 3xx class.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.code)
    }
}

/// Response headers in arrival order, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Value of the last header named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of the first header named `name`.
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A decoded response. Scoped to a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusLine,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Declared `Content-Type`, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }
}

/// Encodes the retrieval request for `target`.
///
/// Exactly a request line, a `Host` header and `Connection: close`, so the
/// peer closes the stream once the response is sent.
pub fn encode_request(target: &RequestTarget) -> Vec<u8> {
    format!(
        "GET {} HTTP/1.1\r\n\
         Host: {}\r\n\
         Connection: close\r\n\
         \r\n",
        target.path, target.host
    )
    .into_bytes()
}

/// Decodes raw response bytes.
///
/// Splits on the first blank line; the header section is decoded as lossy
/// UTF-8, the body is kept as-is.
///
/// # Errors
///
/// Returns `FetchError::MalformedResponse` when there is no header/body
/// separator or the status line does not parse.
pub fn decode_response(raw: &[u8]) -> Result<RawResponse, FetchError> {
    let split_at = find_subsequence(raw, HEADER_BODY_SEPARATOR).ok_or_else(|| {
        FetchError::MalformedResponse(format!(
            "no header/body separator in {} bytes",
            raw.len()
        ))
    })?;
    let head = String::from_utf8_lossy(&raw[..split_at]);
    let body = raw[split_at + HEADER_BODY_SEPARATOR.len()..].to_vec();

    let mut lines = head.split(LINE_SEPARATOR);
    let status = StatusLine::parse(lines.next().unwrap_or_default())?;

    let mut headers = Headers::default();
    for line in lines {
        match line.split_once(':') {
            Some((name, value)) => headers.push(name.trim(), value.trim()),
            None => debug!("Skipping header line without a colon: '{line}'"),
        }
    }

    if let Some(te) = headers.get("Transfer-Encoding") {
        warn!("Response uses Transfer-Encoding '{te}'; body is kept undecoded");
    }
    if let Some(ce) = headers.get("Content-Encoding") {
        if !ce.eq_ignore_ascii_case("identity") {
            warn!("Response uses Content-Encoding '{ce}'; body is kept undecoded");
        }
    }

    debug!(
        "Decoded response: status {} ({} headers, {} body bytes)",
        status.code,
        headers.len(),
        body.len()
    );

    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_request_is_minimal() {
        let request = encode_request(&RequestTarget::new("example.com", "/a?b=c"));
        assert_eq!(
            String::from_utf8(request).unwrap(),
            "GET /a?b=c HTTP/1.1\r\nHost: example.com\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_decode_basic_response() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nX-Test: 1\r\n\r\n<p>hi</p>";
        let response = decode_response(raw).unwrap();
        assert_eq!(response.status.code, 200);
        assert_eq!(response.status.reason, "OK");
        assert_eq!(response.status.version, "HTTP/1.1");
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.body, b"<p>hi</p>");
    }

    #[test]
    fn test_decode_splits_on_first_separator_only() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\nline one\r\n\r\nline two";
        let response = decode_response(raw).unwrap();
        assert!(response.headers.is_empty());
        assert_eq!(response.body, b"line one\r\n\r\nline two");
    }

    #[test]
    fn test_decode_without_separator_is_malformed() {
        let err = decode_response(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert!(decode_response(b"").is_err());
    }

    #[test]
    fn test_decode_bad_status_line_is_malformed() {
        let err = decode_response(b"garbage\r\n\r\nbody").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        let err = decode_response(b"HTTP/1.1 abc OK\r\n\r\nbody").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_status_without_reason() {
        let response = decode_response(b"HTTP/1.1 204\r\n\r\n").unwrap();
        assert_eq!(response.status.code, 204);
        assert_eq!(response.status.reason, "");
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let raw = b"HTTP/1.1 200 OK\r\ncontent-TYPE: application/json\r\n\r\n{}";
        let response = decode_response(raw).unwrap();
        assert_eq!(
            response.headers.get("Content-Type"),
            Some("application/json")
        );
    }

    #[test]
    fn test_repeated_header_last_wins_first_available() {
        let raw = b"HTTP/1.1 302 Found\r\nLocation: /first\r\nlocation: /second\r\n\r\n";
        let response = decode_response(raw).unwrap();
        assert_eq!(response.headers.get("Location"), Some("/second"));
        assert_eq!(response.headers.get_first("Location"), Some("/first"));
    }

    #[test]
    fn test_header_value_keeps_inner_colons() {
        let raw = b"HTTP/1.1 301 Moved\r\nLocation: https://example.com:8443/x\r\n\r\n";
        let response = decode_response(raw).unwrap();
        assert_eq!(
            response.headers.get("location"),
            Some("https://example.com:8443/x")
        );
    }

    #[test]
    fn test_body_is_kept_verbatim() {
        let mut raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
        raw.extend_from_slice(b"5\r\nhello\r\n0\r\n\r\n");
        let response = decode_response(&raw).unwrap();
        assert_eq!(response.body, b"5\r\nhello\r\n0\r\n\r\n");
    }

    #[test]
    fn test_non_utf8_body_is_preserved() {
        let mut raw = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0x00]);
        let response = decode_response(&raw).unwrap();
        assert_eq!(response.body, vec![0xff, 0xfe, 0x00]);
    }

    #[test]
    fn test_status_line_redirect_class() {
        assert!(StatusLine::parse("HTTP/1.1 301 Moved").unwrap().is_redirect());
        assert!(StatusLine::parse("HTTP/1.1 308 Permanent Redirect")
            .unwrap()
            .is_redirect());
        assert!(!StatusLine::parse("HTTP/1.1 200 OK").unwrap().is_redirect());
        assert!(!StatusLine::parse("HTTP/1.0 404 Not Found").unwrap().is_redirect());
    }
}
