// Cached response entries.
// Holds a type-erased response value with its freshness deadline.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Default freshness window for cached responses: 10 minutes.
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(10 * 60);

/// Freshness used when `stored_at + ttl` does not fit in an `Instant`: 100 years.
const MAX_FRESHNESS: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A cached response with the time it was stored and when it goes stale.
#[derive(Clone)]
pub struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    /// When the response was stored.
    pub stored_at: Instant,
    /// Last instant at which the entry counts as fresh.
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Create an entry stored at `now` that stays fresh for `ttl`.
    ///
    /// A `ttl` too large to add to `now` is clamped to a far-future deadline.
    pub fn new<T>(value: T, now: Instant, ttl: Duration) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            value: Arc::new(value),
            stored_at: now,
            expires_at: now
                .checked_add(ttl)
                .or_else(|| now.checked_add(MAX_FRESHNESS))
                .unwrap_or(now),
        }
    }

    /// Fresh entries may be served without touching the network.
    pub fn is_valid(&self, now: Instant) -> bool {
        now <= self.expires_at
    }

    /// Time since the response was stored.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    /// Clone the stored value out as `T`.
    ///
    /// Returns `None` when the entry was stored under a different type.
    pub fn value<T>(&self) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.value.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("stored_at", &self.stored_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
