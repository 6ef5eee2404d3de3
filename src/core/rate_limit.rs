use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed-window counter keyed by client identifier. Best-effort: counters
/// live in process memory and reset on restart, which is acceptable for
/// throttling the auth endpoints.
pub(crate) struct RateLimiter {
    limit: u64,
    window: Duration,
    counters: Mutex<HashMap<String, Window>>,
}

struct Window {
    started_at: Instant,
    count: u64,
}

impl RateLimiter {
    pub(crate) fn new(limit: u64, window: Duration) -> Self {
        Self { limit, window, counters: Mutex::new(HashMap::new()) }
    }

    /// Records one attempt for `key` and reports whether it is still within
    /// the window's budget.
    pub(crate) fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut counters = match self.counters.lock() {
            Ok(guard) => guard,
            // A poisoned lock means another thread panicked mid-update;
            // failing open keeps auth available.
            Err(poisoned) => poisoned.into_inner(),
        };

        let window = counters
            .entry(key.to_string())
            .or_insert_with(|| Window { started_at: now, count: 0 });

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.limit
    }
}
