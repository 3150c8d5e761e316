//! Sign-in throttling. Only rejected credentials count; transport failures
//! and upstream outages never lock anyone out.

use std::time::{Duration, Instant};

use dashmap::DashMap;

pub const DEFAULT_MAX_FAILURES: u32 = 5;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy)]
struct Attempts {
    failures: u32,
    first_failure: Instant,
}

/// A rejected attempt: how long until the identifier may try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttled {
    pub retry_after: Duration,
}

impl Throttled {
    /// Whole minutes, rounded up, never zero.
    pub fn minutes(&self) -> u64 {
        self.retry_after.as_secs().div_ceil(60).max(1)
    }
}

pub struct LoginRateLimiter {
    max_failures: u32,
    window: Duration,
    /// normalized identifier -> failures in the current window
    attempts: DashMap<String, Attempts>,
}

impl LoginRateLimiter {
    pub fn new(max_failures: u32, window: Duration) -> Self {
        Self {
            max_failures: max_failures.max(1),
            window,
            attempts: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether `identifier` may try again now. Does not count as an attempt.
    pub fn check(&self, identifier: &str) -> Result<(), Throttled> {
        let Some(attempts) = self.attempts.get(&normalize(identifier)) else {
            return Ok(());
        };

        let elapsed = attempts.first_failure.elapsed();
        if elapsed >= self.window || attempts.failures < self.max_failures {
            return Ok(());
        }

        Err(Throttled {
            retry_after: self.window - elapsed,
        })
    }

    pub fn record_failure(&self, identifier: &str) {
        let now = Instant::now();
        self.attempts
            .entry(normalize(identifier))
            .and_modify(|a| {
                if now.duration_since(a.first_failure) >= self.window {
                    *a = Attempts {
                        failures: 1,
                        first_failure: now,
                    };
                } else {
                    a.failures += 1;
                }
            })
            .or_insert(Attempts {
                failures: 1,
                first_failure: now,
            });
    }

    /// A successful sign-in clears the identifier's history.
    pub fn record_success(&self, identifier: &str) {
        self.attempts.remove(&normalize(identifier));
    }

    /// Drop windows that have run out. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.attempts.len();
        self.attempts
            .retain(|_, a| a.first_failure.elapsed() < self.window);
        before - self.attempts.len()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILURES, DEFAULT_WINDOW)
    }
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
