//! Application initialization.
//!
//! This module provides the process-wide setup performed once by the binary:
//! - Logger configuration
//! - The `rustls` crypto provider

mod logger;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. Must be called before
/// any TLS connection is established.
pub fn init_crypto_provider() {
    // Err only means a provider is already installed
    let _ = CryptoProvider::install_default(default_provider());
}
