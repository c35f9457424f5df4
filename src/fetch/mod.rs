//! Fetch Module
//!
//! HTTP access to the CRM JSON API through the shared response cache.

mod client;
mod options;

pub use client::{CachedFetcher, CSRF_HEADER};
pub use options::RequestOptions;
