// Configuration for the API client and request cache.
// Values come from the environment, with `.env` support for local development.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_DURATION, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_WINDOW};
use crate::error::{ApiError, Result};

/// Default HTTP timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Freshness and throttling limits for `RequestCache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a stored response is served without refetching.
    pub cache_duration: Duration,
    /// Length of each per-endpoint request window.
    pub rate_window_duration: Duration,
    /// Requests allowed per endpoint within one window.
    pub max_requests_per_window: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_duration: DEFAULT_CACHE_DURATION,
            rate_window_duration: DEFAULT_RATE_WINDOW,
            max_requests_per_window: DEFAULT_MAX_REQUESTS,
        }
    }
}

impl CacheConfig {
    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    pub fn with_rate_window(mut self, duration: Duration) -> Self {
        self.rate_window_duration = duration;
        self
    }

    pub fn with_max_requests(mut self, max: u32) -> Self {
        self.max_requests_per_window = max;
        self
    }
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the Overseas.ai backend, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    pub cache: CacheConfig,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
        }
    }

    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from a specific env file, falling back to the
    /// process environment for anything the file does not set.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        dotenv::from_path(path)
            .map_err(|e| ApiError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OVERSEAS_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidConfig("OVERSEAS_API_BASE_URL is not set".into()))?;

        let mut config = Self::new(base_url);
        config.token = lookup("OVERSEAS_API_TOKEN").filter(|t| !t.is_empty());

        let defaults = CacheConfig::default();
        config.timeout = Duration::from_secs(parse_or(
            &lookup,
            "OVERSEAS_API_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        ));
        config.cache = CacheConfig {
            cache_duration: Duration::from_secs(parse_or(
                &lookup,
                "OVERSEAS_CACHE_TTL_SECS",
                defaults.cache_duration.as_secs(),
            )),
            rate_window_duration: Duration::from_secs(parse_or(
                &lookup,
                "OVERSEAS_RATE_WINDOW_SECS",
                defaults.rate_window_duration.as_secs(),
            )),
            max_requests_per_window: parse_or(
                &lookup,
                "OVERSEAS_RATE_MAX_REQUESTS",
                defaults.max_requests_per_window,
            ),
        };

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%name, value = %raw, %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
