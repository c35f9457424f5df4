//! CRM Client - client-side utility layer for the CRM JSON API
//!
//! Response caching with TTL expiration, debounced autocomplete, line-item
//! pricing, list query state and form helpers.

pub mod autocomplete;
pub mod cache;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod fetch;
pub mod forms;
pub mod list;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod tasks;

pub use config::Config;
pub use context::CrmContext;
pub use error::{CrmError, Result};
pub use fetch::{CachedFetcher, RequestOptions};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use tasks::{debounce, spawn_refresh_task};
