//! HTTP redirect resolution.
//!
//! Follows 3xx responses by re-fetching the `Location` target, up to a
//! maximum number of hops carried in an immutable `RedirectState`.

use log::{debug, info};

use crate::config::MAX_REDIRECT_HOPS;
use crate::error_handling::FetchError;
use crate::http::{decode_response, RawResponse, RequestTarget};
use crate::transport::Transport;

/// Redirect progress threaded through each hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectState {
    pub hop_count: u32,
    pub max_hops: u32,
}

impl RedirectState {
    pub fn new(max_hops: u32) -> Self {
        Self {
            hop_count: 0,
            max_hops,
        }
    }

    /// The state for the following hop.
    pub fn next(self) -> Self {
        Self {
            hop_count: self.hop_count + 1,
            ..self
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.hop_count >= self.max_hops
    }
}

impl Default for RedirectState {
    fn default() -> Self {
        Self::new(MAX_REDIRECT_HOPS)
    }
}

/// The final, non-redirect response and the target that produced it.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub target: RequestTarget,
    pub response: RawResponse,
}

/// Fetches `target`, following redirects.
///
/// # Errors
///
/// - `FetchError::RedirectLimitExceeded` when a 3xx arrives after
///   `state.max_hops` hops have already been followed
/// - `FetchError::MalformedResponse` for a 3xx without a `Location` header
/// - any transport or decode error from an individual hop
pub fn resolve<T: Transport + ?Sized>(
    transport: &T,
    target: &RequestTarget,
    state: RedirectState,
) -> Result<Resolved, FetchError> {
    let raw = transport.fetch(target)?;
    let response = decode_response(&raw)?;

    if !response.status.is_redirect() {
        debug!(
            "Resolved {} with status {} after {} hop(s)",
            target, response.status.code, state.hop_count
        );
        return Ok(Resolved {
            target: target.clone(),
            response,
        });
    }

    if state.is_exhausted() {
        return Err(FetchError::RedirectLimitExceeded {
            max_hops: state.max_hops,
            target: target.to_string(),
        });
    }

    let location = response.headers.get_first("Location").ok_or_else(|| {
        FetchError::MalformedResponse(format!(
            "redirect status {} from {} without a Location header",
            response.status.code, target
        ))
    })?;
    let next_target = resolve_location(target, location)?;

    info!(
        "Redirect {} ({}/{}): {} -> {}",
        response.status.code,
        state.hop_count + 1,
        state.max_hops,
        target,
        next_target
    );
    resolve(transport, &next_target, state.next())
}

/// Resolves a `Location` value against the current target.
///
/// Absolute and scheme-relative locations supply their own host; anything
/// else keeps the current host. An empty path becomes `/`, so `?x=1`
/// redirects to `/?x=1` rather than to the current path.
///
/// # Errors
///
/// `FetchError::MalformedResponse` for an empty value, one that cannot be
/// joined onto the current URL, or one that resolves to no host.
pub fn resolve_location(
    current: &RequestTarget,
    location: &str,
) -> Result<RequestTarget, FetchError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(FetchError::MalformedResponse(format!(
            "redirect from {current} has an empty Location"
        )));
    }

    let base = current.to_url()?;
    let mut joined = base.join(location).map_err(|e| {
        FetchError::MalformedResponse(format!("unusable Location '{location}': {e}"))
    })?;
    // Host-less reference with no path part, e.g. "?x=1" or "#top"
    if location.split(['?', '#']).next().is_some_and(str::is_empty) {
        joined.set_path("/");
    }
    RequestTarget::from_parsed(&joined).ok_or_else(|| {
        FetchError::MalformedResponse(format!("Location '{location}' has no host"))
    })
}
