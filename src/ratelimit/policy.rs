//! Rate limit policies per route class.

use std::time::Duration;

/// Maximum request count allowed within a fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Requests allowed per window.
    pub limit: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Login attempts: 5 per 15 minutes.
    pub const LOGIN: Self = Self::new(5, Duration::from_secs(15 * 60));

    /// One-time-code sends: 3 per 5 minutes.
    pub const OTP_SEND: Self = Self::new(3, Duration::from_secs(5 * 60));

    /// General API traffic: 100 per minute.
    pub const GENERAL_API: Self = Self::new(100, Duration::from_secs(60));

    /// File uploads: 10 per minute.
    pub const UPLOAD: Self = Self::new(10, Duration::from_secs(60));

    /// Creates a policy.
    #[must_use]
    pub const fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }
}
