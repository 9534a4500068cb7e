//! In-memory caching adapters.
//!
//! Uses `moka` for TTL-based concurrent caching of derived access tokens.

pub mod moka_token_cache;

pub use moka_token_cache::MokaTokenCache;
