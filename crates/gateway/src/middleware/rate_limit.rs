//! Rate limiting middleware using token bucket algorithm

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::QuantaClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use litgraph_common::{config::RateLimitConfig, AppError};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter using governor crate
pub type GlobalRateLimiter = RateLimiter<NotKeyed, InMemoryState, QuantaClock>;

/// Limiter plus the configured rate, for error reporting
#[derive(Clone)]
pub struct InboundLimit {
    limiter: Arc<GlobalRateLimiter>,
    per_second: u32,
}

/// Create the inbound limiter, or `None` when disabled or the quota is zero.
/// A zero burst falls back to the per-second rate.
pub fn create_rate_limiter(config: &RateLimitConfig) -> Option<InboundLimit> {
    if !config.enabled {
        return None;
    }

    let per_second = NonZeroU32::new(config.requests_per_second)?;
    let burst = NonZeroU32::new(config.burst).unwrap_or(per_second);
    let quota = Quota::per_second(per_second).allow_burst(burst);

    Some(InboundLimit {
        limiter: Arc::new(RateLimiter::direct(quota)),
        per_second: per_second.get(),
    })
}

/// Rate limiting middleware
pub async fn rate_limit(State(limit): State<InboundLimit>, request: Request, next: Next) -> Response {
    match limit.limiter.check() {
        Ok(_) => next.run(request).await,
        Err(_) => {
            tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
            AppError::RateLimited {
                limit: limit.per_second,
            }
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::router_with;
    use axum::{body::Body, http::{Request, StatusCode}};
    use litgraph_common::{AppConfig, GraphSnapshot};
    use tower::ServiceExt;

    fn config(enabled: bool, per_second: u32, burst: u32) -> RateLimitConfig {
        RateLimitConfig {
            requests_per_second: per_second,
            burst,
            enabled,
        }
    }

    #[test]
    fn test_rate_limiter_creation() {
        let limit = create_rate_limiter(&config(true, 100, 200)).unwrap();
        assert!(limit.limiter.check().is_ok());
    }

    #[test]
    fn test_disabled_or_zero_quota() {
        assert!(create_rate_limiter(&config(false, 100, 200)).is_none());
        assert!(create_rate_limiter(&config(true, 0, 200)).is_none());
        assert!(create_rate_limiter(&config(true, 5, 0)).is_some());
    }

    #[tokio::test]
    async fn test_burst_exhaustion_returns_429() {
        let mut app_config = AppConfig::default();
        app_config.rate_limit = config(true, 1, 1);
        let (app, _) = router_with(GraphSnapshot::default(), app_config);

        let first = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
