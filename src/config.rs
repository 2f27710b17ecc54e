//! Client configuration
//!
//! Collects everything needed to build a `Gideon` client: credentials, the
//! remote origin, pacing, timeouts and cache settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Origin of the GIDEON REST API
pub const DEFAULT_BASE_URL: &str = "https://api.gideononline.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GIDEON_API_KEY";

/// Default minimum spacing between remote calls
const DEFAULT_PACING_MS: u64 = 500;

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for constructing a `Gideon` client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key; checked only when a request is about to be sent
    pub api_key: Option<String>,
    /// Origin that request paths are appended to
    pub base_url: String,
    /// Minimum spacing between remote calls; `None` disables pacing
    pub pacing_interval: Option<Duration>,
    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,
    /// Response cache settings
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            pacing_interval: Some(Duration::from_millis(DEFAULT_PACING_MS)),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the API key taken from `GIDEON_API_KEY`
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_pacing(mut self, interval: Option<Duration>) -> Self {
        self.pacing_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Persists the cache to the given file instead of the XDG default
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache.persistence = Some(path.into());
        self
    }

    /// Keeps the cache in memory only
    pub fn without_cache_file(mut self) -> Self {
        self.cache.persistence = None;
        self
    }
}
