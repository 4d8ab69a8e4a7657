use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Direct (unkeyed) limiter for one provider client
///
/// Returns `None` when `requests_per_second` is 0, which disables
/// throttling. Callers await `until_ready()`; nothing is ever rejected.
pub fn provider_limiter(requests_per_second: u32) -> Option<DefaultDirectRateLimiter> {
    NonZeroU32::new(requests_per_second).map(|rps| RateLimiter::direct(Quota::per_second(rps)))
}
