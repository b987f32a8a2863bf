// Fixed-window request counting per endpoint.
// A window opens on the first request and resets once its duration has passed.

use std::time::Duration;

use tokio::time::Instant;

/// Default rate window length: 1 minute.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(60);

/// Default request budget per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Request count for one endpoint within the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// When the current window opened.
    pub window_start: Instant,
    /// Requests attempted since `window_start`.
    pub request_count: u32,
}

impl RateWindow {
    /// Open a new window at `now`, counting the request that opened it.
    pub fn start(now: Instant) -> Self {
        Self {
            window_start: now,
            request_count: 1,
        }
    }

    /// Whether `now` still falls inside this window.
    pub fn is_active(&self, now: Instant, duration: Duration) -> bool {
        now.saturating_duration_since(self.window_start) <= duration
    }

    /// Whether the window is active and its budget is spent.
    pub fn is_throttled(&self, now: Instant, duration: Duration, max_requests: u32) -> bool {
        self.is_active(now, duration) && self.request_count >= max_requests
    }

    /// Count a request against this window.
    ///
    /// Returns false, leaving the window untouched, when the budget is spent.
    pub fn try_acquire(&mut self, now: Instant, duration: Duration, max_requests: u32) -> bool {
        if !self.is_active(now, duration) {
            *self = Self::start(now);
            return true;
        }

        if self.request_count < max_requests {
            self.request_count += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[tokio::test(start_paused = true)]
    async fn test_start_counts_first_request() {
        let now = Instant::now();
        let window = RateWindow::start(now);

        assert_eq!(window.request_count, 1);
        assert!(window.is_active(now + WINDOW, WINDOW));
        assert!(!window.is_active(now + WINDOW + Duration::from_millis(1), WINDOW));
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhausts_within_window() {
        let now = Instant::now();
        let mut window = RateWindow::start(now);

        assert!(window.try_acquire(now, WINDOW, 3));
        assert!(window.try_acquire(now, WINDOW, 3));
        assert_eq!(window.request_count, 3);
        assert!(window.is_throttled(now, WINDOW, 3));

        assert!(!window.try_acquire(now, WINDOW, 3));
        assert_eq!(window.request_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resets_after_window_elapses() {
        let start = Instant::now();
        let mut window = RateWindow::start(start);
        assert!(window.try_acquire(start, WINDOW, 2));
        assert!(!window.try_acquire(start, WINDOW, 2));

        for cycle in 1..=3u32 {
            let later = start + (WINDOW + Duration::from_millis(1)) * cycle;
            assert!(!window.is_throttled(later, WINDOW, 2));
            assert!(window.try_acquire(later, WINDOW, 2));
            assert_eq!(window.window_start, later);
            assert_eq!(window.request_count, 1);
        }
    }
}
