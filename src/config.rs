//! Configuration Module
//!
//! Handles loading and managing client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL that relative endpoint paths are resolved against
    pub base_url: String,
    /// Lifetime of cached API responses in milliseconds
    pub cache_ttl_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Quiet period for debounced input handlers in milliseconds
    pub debounce_ms: u64,
    /// Minimum query length before autocomplete hits the network
    pub autocomplete_min_chars: usize,
    /// Delay before a blurred autocomplete dropdown is dismissed
    pub blur_grace_ms: u64,
    /// Rows per list page
    pub page_size: usize,
    /// Background dashboard refresh interval in seconds
    pub dashboard_refresh_secs: u64,
    /// Age after which a saved form draft is no longer restored
    pub draft_max_age_secs: u64,
    /// Quiet period before a form draft is written
    pub autosave_delay_ms: u64,
    /// Directory holding form drafts
    pub draft_dir: PathBuf,
    /// Directory export files are written to
    pub export_dir: PathBuf,
    /// Token sent as `X-CSRFToken` on state-changing calls
    pub csrf_token: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CRM_BASE_URL` - API base URL (default: http://127.0.0.1:8000)
    /// - `CRM_CACHE_TTL_MS` - Cache lifetime (default: 300000)
    /// - `CRM_REQUEST_TIMEOUT_SECS` - Request timeout (default: 30)
    /// - `CRM_DEBOUNCE_MS` - Input debounce (default: 300)
    /// - `CRM_AUTOCOMPLETE_MIN_CHARS` - Autocomplete threshold (default: 2)
    /// - `CRM_BLUR_GRACE_MS` - Dropdown blur grace (default: 200)
    /// - `CRM_PAGE_SIZE` - List page size (default: 20)
    /// - `CRM_DASHBOARD_REFRESH_SECS` - Dashboard refresh interval (default: 300)
    /// - `CRM_DRAFT_MAX_AGE_SECS` - Draft restore window (default: 3600)
    /// - `CRM_AUTOSAVE_DELAY_MS` - Draft auto-save debounce (default: 2000)
    /// - `CRM_DRAFT_DIR` - Draft directory (default: user cache dir)
    /// - `CRM_EXPORT_DIR` - Export directory (default: current dir)
    /// - `CRM_CSRF_TOKEN` - CSRF token (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("CRM_BASE_URL").unwrap_or(defaults.base_url),
            cache_ttl_ms: parsed_var("CRM_CACHE_TTL_MS").unwrap_or(defaults.cache_ttl_ms),
            request_timeout_secs: parsed_var("CRM_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            debounce_ms: parsed_var("CRM_DEBOUNCE_MS").unwrap_or(defaults.debounce_ms),
            autocomplete_min_chars: parsed_var("CRM_AUTOCOMPLETE_MIN_CHARS")
                .unwrap_or(defaults.autocomplete_min_chars),
            blur_grace_ms: parsed_var("CRM_BLUR_GRACE_MS").unwrap_or(defaults.blur_grace_ms),
            page_size: parsed_var("CRM_PAGE_SIZE")
                .filter(|size: &usize| *size > 0)
                .unwrap_or(defaults.page_size),
            dashboard_refresh_secs: parsed_var("CRM_DASHBOARD_REFRESH_SECS")
                .unwrap_or(defaults.dashboard_refresh_secs),
            draft_max_age_secs: parsed_var("CRM_DRAFT_MAX_AGE_SECS")
                .unwrap_or(defaults.draft_max_age_secs),
            autosave_delay_ms: parsed_var("CRM_AUTOSAVE_DELAY_MS")
                .unwrap_or(defaults.autosave_delay_ms),
            draft_dir: env::var("CRM_DRAFT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.draft_dir),
            export_dir: env::var("CRM_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            csrf_token: env::var("CRM_CSRF_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    pub fn dashboard_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_refresh_secs)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            cache_ttl_ms: 5 * 60 * 1000,
            request_timeout_secs: 30,
            debounce_ms: 300,
            autocomplete_min_chars: 2,
            blur_grace_ms: 200,
            page_size: 20,
            dashboard_refresh_secs: 5 * 60,
            draft_max_age_secs: 60 * 60,
            autosave_delay_ms: 2000,
            draft_dir: default_draft_dir(),
            export_dir: PathBuf::from("."),
            csrf_token: None,
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn default_draft_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("crm_client")
        .join("drafts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_ttl_ms, 300_000);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.autocomplete_min_chars, 2);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.draft_max_age_secs, 3600);
        assert!(config.csrf_token.is_none());
        assert!(config.draft_dir.ends_with("drafts"));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CRM_CACHE_TTL_MS");
        env::remove_var("CRM_AUTOCOMPLETE_MIN_CHARS");
        env::remove_var("CRM_PAGE_SIZE");
        env::remove_var("CRM_CSRF_TOKEN");

        let config = Config::from_env();
        assert_eq!(config.cache_ttl_ms, 300_000);
        assert_eq!(config.autocomplete_min_chars, 2);
        assert_eq!(config.page_size, 20);
        assert!(config.csrf_token.is_none());
    }

    #[test]
    fn test_duration_helpers() {
        let config = Config {
            cache_ttl_ms: 1500,
            debounce_ms: 250,
            ..Config::default()
        };
        assert_eq!(config.cache_ttl(), Duration::from_millis(1500));
        assert_eq!(config.debounce_delay(), Duration::from_millis(250));
        assert_eq!(config.dashboard_refresh_interval(), Duration::from_secs(300));
    }
}
