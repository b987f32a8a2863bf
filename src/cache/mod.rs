// Cache module for in-memory request caching.
// Stores backend responses and throttles outbound calls per endpoint.

pub mod entry;
pub mod key;
pub mod request_cache;
pub mod window;

pub use entry::{CacheEntry, DEFAULT_CACHE_DURATION};
pub use key::cache_key;
pub use request_cache::{CacheStats, RequestCache};
pub use window::{DEFAULT_MAX_REQUESTS, DEFAULT_RATE_WINDOW, RateWindow};
