//! The fetch pipeline.
//!
//! `Client::fetch_page` consults the cache, and on a miss runs
//! transport → codec → redirects → classifier, then stores the result under
//! the originally requested target.

pub mod redirects;

use log::{info, warn};

use crate::cache::CacheStore;
use crate::config::{Config, MAX_REDIRECT_HOPS};
use crate::error_handling::FetchError;
use crate::http::RequestTarget;
use crate::parse::{classify, ClassifiedResult};
use crate::transport::{TlsTransport, Transport};

pub use redirects::{resolve, resolve_location, RedirectState, Resolved};

/// Cache-backed client over a `Transport`.
pub struct Client<T: Transport> {
    transport: T,
    cache: CacheStore,
    max_redirects: u32,
}

impl Client<TlsTransport> {
    /// Builds a TLS client from configuration.
    pub fn from_config(config: &Config) -> Self {
        Client::new(
            TlsTransport::new(config.timeout_seconds),
            CacheStore::new(config.cache_path.clone()),
        )
        .with_max_redirects(config.max_redirects)
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, cache: CacheStore) -> Self {
        Self {
            transport,
            cache,
            max_redirects: MAX_REDIRECT_HOPS,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches and classifies `target`, serving it from the cache when
    /// possible.
    ///
    /// A cache that cannot be read counts as a miss, and a failed cache write
    /// is logged without discarding the result.
    ///
    /// # Errors
    ///
    /// Any `FetchError` from the transport, decoding, redirect resolution or
    /// classification. Nothing is cached on error.
    pub fn fetch_page(&self, target: &RequestTarget) -> Result<ClassifiedResult, FetchError> {
        match self.cache.get_page(target) {
            Ok(Some(cached)) => {
                info!("Using cached data for {target}");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed, fetching {target} anyway: {e}"),
        }

        let result = self.fetch_uncached(target)?;
        if let Err(e) = self.cache.put_page(target, &result) {
            warn!("Failed to cache result for {target}: {e}");
        }
        Ok(result)
    }

    /// Fetches and classifies `target` over the network, bypassing the page
    /// cache in both directions.
    pub(crate) fn fetch_uncached(
        &self,
        target: &RequestTarget,
    ) -> Result<ClassifiedResult, FetchError> {
        let resolved = resolve(
            &self.transport,
            target,
            RedirectState::new(self.max_redirects),
        )?;
        if resolved.target != *target {
            info!("{} resolved to {}", target, resolved.target);
        }
        classify(&resolved.response)
    }
}
