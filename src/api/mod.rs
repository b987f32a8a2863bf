// Overseas.ai API module.
// Provides the HTTP client, response types, and cached endpoint accessors.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{ApiClient, RateLimit};
pub use endpoints::CachedApi;
pub use types::*;
