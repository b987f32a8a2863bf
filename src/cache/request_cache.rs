// Request cache with per-endpoint throttling.
// Serves fresh responses from memory and falls back to stale ones when throttled.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::{RateLimitSignal, RequestError};

use super::entry::CacheEntry;
use super::key::cache_key;
use super::window::RateWindow;

#[derive(Debug, Default)]
struct CacheState {
    /// Stored responses by full cache key.
    entries: HashMap<String, CacheEntry>,
    /// Request windows by endpoint name.
    windows: HashMap<String, RateWindow>,
}

/// Outcome of the synchronous cache and window checks.
enum Admission<T> {
    Fresh(T),
    Fetch,
    Stale(T, Duration),
    Throttled,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Stored responses, fresh or stale.
    pub entries: usize,
    /// Stored responses still inside their freshness window.
    pub fresh_entries: usize,
    /// Endpoints with a request window on record.
    pub tracked_endpoints: usize,
}

/// In-memory response cache and request throttle.
///
/// Share one instance (behind an `Arc`) between all callers so request
/// windows apply process-wide per endpoint name.
///
/// ```rust
/// use overseas_api::cache::RequestCache;
/// use overseas_api::error::{ApiError, RequestError};
///
/// # async fn demo() -> Result<(), RequestError<ApiError>> {
/// let cache = RequestCache::default();
/// let countries: Vec<String> = cache
///     .request("countries", || async { Ok::<_, ApiError>(vec!["UAE".to_string()]) })
///     .await?;
/// assert_eq!(countries, vec!["UAE".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RequestCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl RequestCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Run `fetch` for `endpoint` unless a fresh response is cached.
    pub async fn request<T, E, F, Fut>(
        &self,
        endpoint: &str,
        fetch: F,
    ) -> Result<T, RequestError<E>>
    where
        T: Clone + Send + Sync + 'static,
        E: RateLimitSignal,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = endpoint.to_string();
        self.request_keyed(endpoint, key, fetch).await
    }

    /// Like `request`, with `params` folded into the cache key.
    ///
    /// Throttling still counts per endpoint, not per parameter set.
    pub async fn request_with_params<T, E, F, Fut, P>(
        &self,
        endpoint: &str,
        params: &P,
        fetch: F,
    ) -> Result<T, RequestError<E>>
    where
        T: Clone + Send + Sync + 'static,
        E: RateLimitSignal,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Serialize + ?Sized,
    {
        let key = cache_key(endpoint, Some(params)).map_err(RequestError::InvalidParams)?;
        self.request_keyed(endpoint, key, fetch).await
    }

    async fn request_keyed<T, E, F, Fut>(
        &self,
        endpoint: &str,
        key: String,
        fetch: F,
    ) -> Result<T, RequestError<E>>
    where
        T: Clone + Send + Sync + 'static,
        E: RateLimitSignal,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.admit::<T>(endpoint, &key, Instant::now()) {
            Admission::Fresh(value) => {
                debug!(%key, "Cache hit");
                return Ok(value);
            }
            Admission::Stale(value, age) => {
                warn!(
                    %endpoint,
                    %key,
                    age_ms = age.as_millis() as u64,
                    "Endpoint throttled, serving stale response"
                );
                return Ok(value);
            }
            Admission::Throttled => {
                warn!(%endpoint, "Endpoint throttled with nothing cached");
                return Err(RequestError::RateLimited {
                    endpoint: endpoint.to_string(),
                });
            }
            Admission::Fetch => debug!(%key, "Cache miss, fetching"),
        }

        match fetch().await {
            Ok(value) => {
                let entry =
                    CacheEntry::new(value.clone(), Instant::now(), self.config.cache_duration);
                self.lock().entries.insert(key, entry);
                Ok(value)
            }
            Err(err) if err.is_rate_limited() => match self.cached::<T>(&key, Instant::now()) {
                Some((value, age)) => {
                    warn!(
                        %endpoint,
                        %key,
                        age_ms = age.as_millis() as u64,
                        "Upstream rate limited, serving stale response"
                    );
                    Ok(value)
                }
                None => Err(RequestError::Upstream(err)),
            },
            Err(err) => Err(RequestError::Upstream(err)),
        }
    }

    /// Check the cache, then the endpoint's window, counting the request if admitted.
    fn admit<T>(&self, endpoint: &str, key: &str, now: Instant) -> Admission<T>
    where
        T: Clone + 'static,
    {
        let mut guard = self.lock();
        let state = &mut *guard;

        if let Some(value) = state
            .entries
            .get(key)
            .filter(|entry| entry.is_valid(now))
            .and_then(CacheEntry::value::<T>)
        {
            return Admission::Fresh(value);
        }

        let admitted = match state.windows.get_mut(endpoint) {
            Some(window) => {
                let was_active = window.is_active(now, self.config.rate_window_duration);
                let admitted = window.try_acquire(
                    now,
                    self.config.rate_window_duration,
                    self.config.max_requests_per_window,
                );
                if !was_active {
                    debug!(%endpoint, "Rate window reset");
                }
                admitted
            }
            None => {
                state
                    .windows
                    .insert(endpoint.to_string(), RateWindow::start(now));
                true
            }
        };

        if admitted {
            return Admission::Fetch;
        }

        match state
            .entries
            .get(key)
            .and_then(|entry| Some((entry.value::<T>()?, entry.age(now))))
        {
            Some((value, age)) => Admission::Stale(value, age),
            None => Admission::Throttled,
        }
    }

    /// Last stored value for `key` and its age, regardless of freshness.
    fn cached<T>(&self, key: &str, now: Instant) -> Option<(T, Duration)>
    where
        T: Clone + 'static,
    {
        let state = self.lock();
        let entry = state.entries.get(key)?;
        Some((entry.value::<T>()?, entry.age(now)))
    }

    /// Drop every stored response.
    pub fn clear_cache(&self) {
        self.lock().entries.clear();
    }

    /// Forget every endpoint's request window.
    pub fn clear_rate_limits(&self) {
        self.lock().windows.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let state = self.lock();
        CacheStats {
            entries: state.entries.len(),
            fresh_entries: state.entries.values().filter(|e| e.is_valid(now)).count(),
            tracked_endpoints: state.windows.len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
