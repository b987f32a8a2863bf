// Error types for the Overseas.ai API client and request cache.
// Covers backend HTTP failures, configuration errors, and cache throttling.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the backend HTTP client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Overseas API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Upstream rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("Request budget exhausted for endpoint {endpoint}")]
    Throttled { endpoint: String },

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(", retry after {}s", secs),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Classifies a fetch failure as an upstream rate-limit response (HTTP 429).
///
/// `RequestCache` only looks at this signal; the error itself is passed back
/// to the caller untouched unless stale data can be served instead.
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

impl RateLimitSignal for ApiError {
    fn is_rate_limited(&self) -> bool {
        match self {
            ApiError::RateLimited { .. } => true,
            ApiError::Status { status, .. } => *status == StatusCode::TOO_MANY_REQUESTS,
            ApiError::Http(err) => err.is_rate_limited(),
            _ => false,
        }
    }
}

impl RateLimitSignal for reqwest::Error {
    fn is_rate_limited(&self) -> bool {
        self.status() == Some(StatusCode::TOO_MANY_REQUESTS)
    }
}

/// Errors returned by `RequestCache::request`.
#[derive(Error, Debug)]
pub enum RequestError<E> {
    /// The endpoint's request budget is spent and nothing is cached for the key.
    #[error("Rate limit exceeded for endpoint {endpoint}")]
    RateLimited { endpoint: String },

    /// Request parameters could not be serialized into a cache key.
    #[error("Invalid request parameters: {0}")]
    InvalidParams(#[source] serde_json::Error),

    /// The fetch function's own error, unchanged.
    #[error(transparent)]
    Upstream(E),
}

impl<E> RequestError<E> {
    /// Unwrap the upstream error, if this is one.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            RequestError::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RequestError<ApiError>> for ApiError {
    fn from(err: RequestError<ApiError>) -> Self {
        match err {
            RequestError::RateLimited { endpoint } => ApiError::Throttled { endpoint },
            RequestError::InvalidParams(err) => ApiError::Json(err),
            RequestError::Upstream(err) => err,
        }
    }
}
