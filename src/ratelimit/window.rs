//! Fixed-window request counter.

use super::RateLimitPolicy;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// The policy's request budget.
    pub limit: u32,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// When the current window ends.
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Returns how long a rejected caller should wait before retrying,
    /// suitable for a `Retry-After` header.
    #[must_use]
    pub fn retry_after(&self, now: DateTime<Utc>) -> Duration {
        (self.reset_at - now).to_std().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowSlot {
    started_at: DateTime<Utc>,
    count: u32,
}

/// In-memory fixed-window rate limiter keyed by caller identifier.
///
/// The first request from an identifier anchors its window; once the
/// window elapses the next request anchors a fresh one. State lives in
/// process memory only, matching the single-instance deployment the
/// board targets.
pub struct FixedWindowLimiter<C>
where
    C: Clock + Send + Sync,
{
    policy: RateLimitPolicy,
    clock: Arc<C>,
    slots: Mutex<HashMap<String, WindowSlot>>,
}

impl<C> FixedWindowLimiter<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a limiter enforcing the given policy.
    #[must_use]
    pub fn new(policy: RateLimitPolicy, clock: Arc<C>) -> Self {
        Self {
            policy,
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the enforced policy.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Returns how many identifiers currently hold a live window slot.
    #[must_use]
    pub fn tracked_identifiers(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Counts a request from `identifier` against the current window.
    ///
    /// An allowed decision has already consumed one unit of the budget;
    /// a rejected one consumes nothing. Slots whose window has elapsed
    /// are evicted on every check, so the map holds at most one slot per
    /// identifier seen within the last window.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        let now = self.clock.utc();
        let window = TimeDelta::from_std(self.policy.window).unwrap_or(TimeDelta::MAX);

        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, slot| now - slot.started_at < window);
        let slot = slots.entry(identifier.to_owned()).or_insert_with(|| WindowSlot {
            started_at: now,
            count: 0,
        });
        let reset_at = slot.started_at + window;

        if slot.count < self.policy.limit {
            slot.count += 1;
            RateLimitDecision {
                allowed: true,
                limit: self.policy.limit,
                remaining: self.policy.limit - slot.count,
                reset_at,
            }
        } else {
            RateLimitDecision {
                allowed: false,
                limit: self.policy.limit,
                remaining: 0,
                reset_at,
            }
        }
    }
}
