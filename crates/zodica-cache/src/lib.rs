//! TTL key-value cache for generated horoscope content
//!
//! Keys follow a canonical query-string scheme so every component (request
//! path, batch warmer, cache-busting endpoint) addresses the same entries.
//! The store absorbs backend failures entirely: a broken cache degrades to
//! regeneration, never to a request error.

#![allow(clippy::must_use_candidate)]

mod keys;
mod store;

pub use keys::{HOROSCOPE_DOMAIN, build_key, daily_key, horoscope_key};
pub use store::{CacheError, ContentCache};
