//! Rate limiting middleware.
//!
//! One governor bucket per caller, keyed by tenant and user so a noisy
//! tenant cannot drain another tenant's budget.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

type CallerKey = (Uuid, Uuid);
type KeyedLimiter = RateLimiter<CallerKey, DefaultKeyedStateStore<CallerKey>, DefaultClock>;

/// Per-caller request budget shared by all requests.
pub struct RateLimiterState {
    limiter: KeyedLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    pub fn new(rate_limit_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        }
    }

    /// Returns `Err(retry_after_secs)` when the caller is over budget.
    pub fn check(&self, tenant_id: Uuid, user_id: Uuid) -> Result<(), u64> {
        self.limiter
            .check_key(&(tenant_id, user_id))
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()).as_secs().max(1))
    }

    pub fn tracked_callers(&self) -> usize {
        self.limiter.len()
    }

    /// Drops callers whose bucket has fully refilled. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        before.saturating_sub(self.limiter.len())
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_callers", &self.tracked_callers())
            .finish()
    }
}

/// Applies the caller's budget.
///
/// Must run after [`super::require_auth`] so the caller is known.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (Some(rate_limiter), Some(auth)) = (
        state.rate_limiter.as_ref(),
        req.extensions().get::<AuthContext>(),
    ) else {
        return next.run(req).await;
    };

    if let Err(retry_after) = rate_limiter.check(auth.tenant_id, auth.user_id) {
        tracing::warn!(
            tenant_id = %auth.tenant_id,
            user_id = %auth.user_id,
            retry_after,
            "Rate limit exceeded"
        );
        return rate_limited_response(retry_after);
    }

    next.run(req).await
}

fn rate_limited_response(retry_after: u64) -> Response {
    let mut response = ApiError::RateLimited.into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_allows_requests_within_quota() {
        let state = RateLimiterState::new(5);
        let (tenant, user) = (Uuid::new_v4(), Uuid::new_v4());

        for i in 0..5 {
            assert!(state.check(tenant, user).is_ok(), "Request {} should be allowed", i);
        }
        assert!(state.check(tenant, user).unwrap_err() >= 1);
    }

    #[test]
    fn test_callers_have_independent_buckets() {
        let state = RateLimiterState::new(1);
        let tenant = Uuid::new_v4();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(state.check(tenant, alice).is_ok());
        assert!(state.check(tenant, alice).is_err());
        assert!(state.check(tenant, bob).is_ok());
        assert!(state.check(Uuid::new_v4(), alice).is_ok());
        assert_eq!(state.tracked_callers(), 3);
    }

    #[test]
    fn test_prune_keeps_callers_with_used_budget() {
        let state = RateLimiterState::new(1);
        let (tenant, user) = (Uuid::new_v4(), Uuid::new_v4());
        state.check(tenant, user).unwrap();

        // The bucket refills over a minute, so the caller is still tracked.
        assert_eq!(state.prune(), 0);
        assert_eq!(state.tracked_callers(), 1);
        assert!(state.check(tenant, user).is_err());
    }

    #[test]
    fn test_debug_output() {
        let state = RateLimiterState::new(100);
        state.check(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("rate_limit_per_minute: 100"));
        assert!(debug.contains("tracked_callers: 1"));
    }

    #[test]
    fn test_rate_limited_response_format() {
        let response = rate_limited_response(60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }
}
