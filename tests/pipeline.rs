//! End-to-end tests of the fetch pipeline over a scripted transport.
//!
//! Covers cache memoization, redirect following and content classification
//! as seen through the public `Client` API.

mod helpers;

use helpers::{client_in, ok_response, redirect_response, ScriptedTransport};
use rawfetch::{ClassifiedResult, ErrorType, FetchError, RequestTarget};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_json_response_is_structured_and_cached() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new([ok_response("application/json", r#"{"a":1}"#)]),
    );
    let target = RequestTarget::new("api.example.com", "/thing");

    let first = client.fetch_page(&target).unwrap();
    assert_eq!(first, ClassifiedResult::StructuredDocument(json!({"a": 1})));
    assert_eq!(client.transport().request_count(), 1);

    // Second fetch is served from the cache: no new connection
    let second = client.fetch_page(&target).unwrap();
    assert_eq!(second, first);
    assert_eq!(client.transport().request_count(), 1);
}

#[test]
fn test_cache_is_shared_across_client_instances() {
    let dir = TempDir::new().unwrap();
    let target = RequestTarget::new("example.com", "/");
    let page = ok_response("text/html", r#"<a href="https://a.test">a</a>"#);

    let first = client_in(&dir, ScriptedTransport::new([page]))
        .fetch_page(&target)
        .unwrap();

    let offline = client_in(&dir, ScriptedTransport::new(Vec::<String>::new()));
    let second = offline.fetch_page(&target).unwrap();
    assert_eq!(second, first);
    assert_eq!(offline.transport().request_count(), 0);
}

#[test]
fn test_relative_redirect_is_followed_on_same_host() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new([
            redirect_response("/new"),
            ok_response("text/html", "<p>moved here</p>"),
        ]),
    );

    let result = client
        .fetch_page(&RequestTarget::new("example.com", "/old"))
        .unwrap();

    assert_eq!(
        client.transport().requests(),
        vec![
            RequestTarget::new("example.com", "/old"),
            RequestTarget::new("example.com", "/new"),
        ]
    );
    assert_eq!(
        result,
        ClassifiedResult::PageExtract {
            links: vec![],
            text_sample: "moved here".into(),
        }
    );
}

#[test]
fn test_redirect_result_is_cached_under_original_target() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new([
            redirect_response("https://www.example.com/"),
            ok_response("application/json", "[true]"),
        ]),
    );
    let original = RequestTarget::new("example.com", "/");
    client.fetch_page(&original).unwrap();

    assert!(client.cache().get_page(&original).unwrap().is_some());
    assert!(client
        .cache()
        .get_page(&RequestTarget::new("www.example.com", "/"))
        .unwrap()
        .is_none());
}

#[test]
fn test_six_redirects_yield_redirect_limit_exceeded() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new((0..6).map(|i| redirect_response(&format!("/hop{i}")))),
    );
    let target = RequestTarget::new("example.com", "/");

    let err = client.fetch_page(&target).unwrap_err();
    assert_eq!(err.kind(), ErrorType::RedirectLimitExceeded);
    assert_eq!(client.transport().request_count(), 6);

    // Failures are never cached
    assert!(client.cache().get_page(&target).unwrap().is_none());
}

#[test]
fn test_configured_redirect_limit_is_respected() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new([redirect_response("/a"), redirect_response("/b")]),
    )
    .with_max_redirects(1);

    let err = client
        .fetch_page(&RequestTarget::new("example.com", "/"))
        .unwrap_err();
    assert!(matches!(
        err,
        FetchError::RedirectLimitExceeded { max_hops: 1, .. }
    ));
    assert_eq!(client.transport().request_count(), 2);
}

#[test]
fn test_markup_keeps_only_http_links() {
    let dir = TempDir::new().unwrap();
    let body = r#"<html><body><a href="http://x.test">x</a><a href="/y">y</a></body></html>"#;
    let client = client_in(
        &dir,
        ScriptedTransport::new([ok_response("text/html", body)]),
    );

    let result = client
        .fetch_page(&RequestTarget::new("example.com", "/"))
        .unwrap();
    assert_eq!(result.links(), Some(&["http://x.test".to_string()][..]));
}

#[test]
fn test_invalid_json_is_parse_error_and_not_cached() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new([ok_response("application/json", "{broken")]),
    );
    let target = RequestTarget::new("api.example.com", "/");

    let err = client.fetch_page(&target).unwrap_err();
    assert_eq!(err.kind(), ErrorType::Parse);
    assert!(client.cache().get_page(&target).unwrap().is_none());
}

#[test]
fn test_response_without_separator_is_malformed() {
    let dir = TempDir::new().unwrap();
    let client = client_in(
        &dir,
        ScriptedTransport::new(["HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n"]),
    );
    let err = client
        .fetch_page(&RequestTarget::new("example.com", "/"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorType::MalformedResponse);
}

#[test]
fn test_transport_failure_is_connectivity_error() {
    let dir = TempDir::new().unwrap();
    let client = client_in(&dir, ScriptedTransport::new(Vec::<String>::new()));
    let err = client
        .fetch_page(&RequestTarget::new("example.com", "/"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorType::Connectivity);
}

#[test]
fn test_unwritable_cache_does_not_lose_the_result() {
    let dir = TempDir::new().unwrap();
    // A directory where the cache file should be makes every write fail
    let cache_path = dir.path().join("cache.json");
    std::fs::create_dir(&cache_path).unwrap();
    let client = rawfetch::Client::new(
        ScriptedTransport::new([ok_response("application/json", "1")]),
        rawfetch::CacheStore::new(cache_path),
    );

    let result = client
        .fetch_page(&RequestTarget::new("example.com", "/"))
        .unwrap();
    assert_eq!(result, ClassifiedResult::StructuredDocument(json!(1)));
}
