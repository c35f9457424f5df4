//! Per-request options for [`CachedFetcher`](super::CachedFetcher).

use reqwest::Method;
use serde_json::Value;

/// Everything about a request except its URL and cache key.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Query parameters, appended in order
    pub query: Vec<(String, String)>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// JSON request body
    pub json: Option<Value>,
    /// Attach the configured CSRF token
    pub csrf: bool,
    /// Raise an error notice when the request fails
    pub notify_on_error: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            headers: Vec::new(),
            json: None,
            csrf: false,
            notify_on_error: true,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    /// State-changing POST without a body. Carries the CSRF token.
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            csrf: true,
            ..Self::default()
        }
    }

    /// State-changing POST with a JSON body. Carries the CSRF token.
    pub fn post_json(body: Value) -> Self {
        Self {
            json: Some(body),
            ..Self::post()
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Failures are only logged; the caller reports them its own way.
    pub fn quiet(mut self) -> Self {
        self.notify_on_error = false;
        self
    }
}
