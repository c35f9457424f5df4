//! Cached Fetch
//!
//! Wraps HTTP requests with the shared TTL cache and uniform error reporting.
//!
//! A live cache entry answers a request without touching the network, which
//! bounds traffic to one call per key per TTL window. Two callers asking for
//! the same key before the first response lands will both go to the network:
//! there is no in-flight deduplication.

use std::sync::Arc;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{shared_cache, SharedCache};
use crate::config::Config;
use crate::error::{CrmError, Result};
use crate::notify::{Notice, Notifier};

use super::RequestOptions;

/// Header carrying the CSRF token on state-changing calls.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client bound to one API base URL and one response cache.
///
/// Clone is cheap: the reqwest client, cache and notifier are all shared.
#[derive(Clone)]
pub struct CachedFetcher {
    client: Client,
    base_url: Url,
    cache: SharedCache,
    notifier: Arc<dyn Notifier>,
    csrf_token: Option<String>,
}

impl CachedFetcher {
    /// Builds a fetcher with its own cache from configuration.
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            client,
            base_url,
            cache: shared_cache(config.cache_ttl()),
            notifier,
            csrf_token: config.csrf_token.clone(),
        })
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path (or absolute URL) against the base URL.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        Ok(self.base_url.join(url)?)
    }

    // == Cached Fetch ==
    /// Returns the decoded JSON body of `url`, consulting the cache first.
    ///
    /// With a `cache_key` and a live entry, no request is made. Otherwise the
    /// request runs; a failure raises an error notice (unless the options are
    /// quiet) before the error is returned, and a success is stored under
    /// `cache_key`.
    pub async fn cached_fetch(
        &self,
        url: &str,
        cache_key: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Value> {
        if let Some(key) = cache_key {
            if let Some(hit) = self.cache.write().await.get(key) {
                debug!(key, "cache hit");
                return Ok(hit);
            }
        }

        let value = match self.request_json(url, options).await {
            Ok(value) => value,
            Err(err) => {
                self.report(url, &err, options);
                return Err(err);
            }
        };

        if let Some(key) = cache_key {
            self.cache.write().await.set(key, value.clone());
        }

        Ok(value)
    }

    /// [`cached_fetch`](Self::cached_fetch) decoded into `T`.
    ///
    /// A body that does not decode is dropped from the cache again.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cache_key: Option<&str>,
        options: &RequestOptions,
    ) -> Result<T> {
        let value = self.cached_fetch(url, cache_key, options).await?;

        match serde_json::from_value(value) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                if let Some(key) = cache_key {
                    self.cache.write().await.remove(key);
                }
                let err = CrmError::from(e);
                self.report(url, &err, options);
                Err(err)
            }
        }
    }

    /// Fetches a raw body (exports). Never cached.
    pub async fn download(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>> {
        let result = match self.send(url, options).await {
            Ok(response) => response.bytes().await.map_err(CrmError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => {
                self.report(url, &err, options);
                Err(err)
            }
        }
    }

    async fn request_json(&self, url: &str, options: &RequestOptions) -> Result<Value> {
        let response = self.send(url, options).await?;
        let body = response.bytes().await?;

        // Bulk and delete endpoints may answer with an empty body
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        let url = self.resolve(url)?;
        debug!(method = %options.method, %url, "sending request");

        let mut request = self.client.request(options.method.clone(), url);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if options.csrf {
            match &self.csrf_token {
                Some(token) => request = request.header(CSRF_HEADER, token.as_str()),
                None => warn!("state-changing request sent without a CSRF token"),
            }
        }
        if let Some(body) = &options.json {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::status(
                status.as_u16(),
                format!("HTTP error! status: {}", status.as_u16()),
            ));
        }

        Ok(response)
    }

    fn report(&self, url: &str, err: &CrmError, options: &RequestOptions) {
        if options.notify_on_error {
            warn!(url, error = %err, "request failed");
            self.notifier.notify(Notice::error(err.to_string()));
        } else {
            debug!(url, error = %err, "request failed");
        }
    }
}
