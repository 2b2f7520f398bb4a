//! Shared utilities.

mod selector;

pub use selector::static_selector;
