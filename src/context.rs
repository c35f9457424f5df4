//! Shared client context
//!
//! Every component receives a [`CrmContext`] at construction instead of
//! reaching for a global. Two contexts never share a cache, so tests and
//! multiple embedded UIs stay isolated.

use std::sync::Arc;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::CachedFetcher;
use crate::notify::{Notifier, TracingNotifier};

/// Configuration plus the shared HTTP client, response cache and notifier.
///
/// Cloning shares all of them.
#[derive(Clone)]
pub struct CrmContext {
    config: Config,
    fetcher: CachedFetcher,
}

impl CrmContext {
    /// Creates a context that reports notices through the log.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Creates a context that reports notices to `notifier`.
    pub fn with_notifier(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            fetcher: CachedFetcher::new(config, notifier)?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &CachedFetcher {
        &self.fetcher
    }

    pub fn cache(&self) -> &SharedCache {
        self.fetcher.cache()
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        self.fetcher.notifier()
    }
}
