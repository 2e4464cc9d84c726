//! # Fixed-Window Rate Limiter
//!
//! Counts requests per client key in a window that starts at the client's
//! first request and resets once it elapses. Windows live in a `DashMap`;
//! expired entries are removed by [`RateLimiter::sweep`], which
//! [`RateLimiter::spawn_sweeper`] runs periodically. The map holds at most
//! `max_tracked` windows (give or take concurrent inserts); a new client
//! arriving at a full map is limited until a window frees up.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    max_requests: u32,
    window: Duration,
    max_tracked: usize,
    enabled: bool,
}

const DEFAULT_MAX_TRACKED: usize = 10_000;

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            max_requests,
            window,
            max_tracked: DEFAULT_MAX_TRACKED,
            enabled: true,
        }
    }

    pub fn with_max_tracked(mut self, max_tracked: usize) -> Self {
        self.max_tracked = max_tracked.max(1);
        self
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            ..Self::new(config.max_requests, config.window())
                .with_max_tracked(config.max_tracked_clients)
        }
    }

    /// A limiter that admits everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(u32::MAX, Duration::from_secs(1))
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a request for `key` and decide whether it may proceed
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        if !self.enabled {
            return RateLimitDecision::Allowed {
                remaining: self.max_requests,
            };
        }

        if !self.windows.contains_key(key) && self.windows.len() >= self.max_tracked {
            self.sweep_at(now);
            if self.windows.len() >= self.max_tracked {
                debug!(tracked = self.windows.len(), "Rate limit table full");
                return RateLimitDecision::Limited {
                    retry_after: self.soonest_reset(now),
                };
            }
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateLimitDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Remove windows that have elapsed; returns how many were dropped
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.started) < self.window);
        before.saturating_sub(self.windows.len())
    }

    fn soonest_reset(&self, now: Instant) -> Duration {
        self.windows
            .iter()
            .map(|window| {
                self.window
                    .saturating_sub(now.saturating_duration_since(window.started))
            })
            .min()
            .unwrap_or(self.window)
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Run [`sweep`](Self::sweep) every `interval` until the task is aborted
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.sweep();
                if removed > 0 {
                    debug!(
                        removed = removed,
                        remaining = limiter.tracked_clients(),
                        "Swept expired rate limit windows"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_after_max_requests() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();
        assert_eq!(
            limiter.check_at("10.0.0.1", now),
            RateLimitDecision::Allowed { remaining: 2 }
        );
        assert!(limiter.check_at("10.0.0.1", now).is_allowed());
        assert!(limiter.check_at("10.0.0.1", now).is_allowed());
        assert!(!limiter.check_at("10.0.0.1", now).is_allowed());
        assert!(limiter.check_at("10.0.0.2", now).is_allowed());
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        assert!(limiter.check_at("a", start).is_allowed());
        match limiter.check_at("a", start + Duration::from_secs(4)) {
            RateLimitDecision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(6))
            }
            other => panic!("expected limit, got {other:?}"),
        }
        assert!(limiter.check_at("a", start + Duration::from_secs(10)).is_allowed());
    }

    #[test]
    fn test_sweep_drops_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(10));
        let start = Instant::now();
        limiter.check_at("old", start);
        limiter.check_at("new", start + Duration::from_secs(8));
        assert_eq!(limiter.sweep_at(start + Duration::from_secs(12)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_table_is_bounded() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10)).with_max_tracked(100);
        let start = Instant::now();

        let admitted = (0..10_000)
            .filter(|i| limiter.check_at(&format!("198.51.100.{i}"), start).is_allowed())
            .count();
        assert_eq!(admitted, 100);
        assert_eq!(limiter.tracked_clients(), 100);

        match limiter.check_at("203.0.113.9", start + Duration::from_secs(3)) {
            RateLimitDecision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(7))
            }
            other => panic!("expected limit, got {other:?}"),
        }

        // Known clients keep their own window while the table is full
        assert!(limiter.check_at("198.51.100.0", start).is_allowed());

        // Elapsed windows are reclaimed for newcomers
        assert!(limiter
            .check_at("203.0.113.9", start + Duration::from_secs(10))
            .is_allowed());
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_disabled_limiter_admits_everything() {
        let limiter = RateLimiter::disabled();
        for _ in 0..1000 {
            assert!(limiter.check("client").is_allowed());
        }
        assert_eq!(limiter.tracked_clients(), 0);
    }
}
