// Cached, rate-limited client for the Overseas.ai job marketplace API.
// Outbound reads share one in-memory cache with per-endpoint request windows.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;

pub use api::{ApiClient, CachedApi};
pub use cache::RequestCache;
pub use config::{ApiConfig, CacheConfig};
pub use error::{ApiError, RateLimitSignal, RequestError, Result};
