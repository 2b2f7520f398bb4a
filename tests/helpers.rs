// Shared test helpers: a scripted transport and cache/client construction.
//
// The scripted transport replays canned raw responses in order and records
// every requested target, so tests can assert exactly how many network
// calls a pipeline made.

use std::cell::RefCell;
use std::collections::VecDeque;

use rawfetch::{CacheStore, Client, FetchError, RequestTarget, Transport};
use tempfile::TempDir;

/// Replays canned responses; fails once the script runs out.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Vec<u8>>>,
    requests: RefCell<Vec<RequestTarget>>,
}

impl ScriptedTransport {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            responses: RefCell::new(
                responses
                    .into_iter()
                    .map(|r| r.as_ref().to_vec())
                    .collect(),
            ),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Every target fetched so far, in order.
    pub fn requests(&self) -> Vec<RequestTarget> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn fetch(&self, target: &RequestTarget) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(target.clone());
        self.responses.borrow_mut().pop_front().ok_or_else(|| FetchError::Connect {
            host: target.host.clone(),
            port: 443,
            source: std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "scripted transport has no more responses",
            ),
        })
    }
}

/// Builds a client over `transport` with its cache file in `dir`.
pub fn client_in(dir: &TempDir, transport: ScriptedTransport) -> Client<ScriptedTransport> {
    Client::new(transport, CacheStore::new(dir.path().join("cache.json")))
}

/// A raw 200 response with the given content type and body.
pub fn ok_response(content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// A raw 302 response pointing at `location`.
#[allow(dead_code)] // Used by other test files
pub fn redirect_response(location: &str) -> String {
    format!("HTTP/1.1 302 Found\r\nLocation: {location}\r\nContent-Length: 0\r\n\r\n")
}
