//! Fixed-window request rate limiting.
//!
//! The limiter is the crate-side core of the HTTP layer's throttling:
//! the (external) middleware asks [`FixedWindowLimiter::check`] per
//! request and turns a rejected decision into a 429 with the
//! `Retry-After` value from [`RateLimitDecision::retry_after`].

mod policy;
mod window;

pub use policy::RateLimitPolicy;
pub use window::{FixedWindowLimiter, RateLimitDecision};
