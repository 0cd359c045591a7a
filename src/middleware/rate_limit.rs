//! Per-client request rate limiting.
//!
//! Clients are keyed by the first `x-forwarded-for` entry, falling back to the
//! peer address. Requests over the quota get `429 RATE_LIMITED`.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use aula_config::RateLimitConfig;
use aula_core::AppError;

pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

/// Builds the limiter, or `None` when rate limiting is disabled.
pub fn build_rate_limiter(config: &RateLimitConfig) -> Option<Arc<ClientRateLimiter>> {
    if !config.enabled {
        return None;
    }

    let per_second = NonZeroU32::new(config.per_second)?;
    let burst = NonZeroU32::new(config.burst_size)?;
    let quota = Quota::per_second(per_second).allow_burst(burst);

    Some(Arc::new(RateLimiter::keyed(quota)))
}

/// Periodically drops state for clients that are back under their quota.
pub fn spawn_cleanup(limiter: Arc<ClientRateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    });
}

pub fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req);

    if limiter.check_key(&key).is_err() {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return Err(AppError::rate_limited());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_disabled_config_builds_nothing() {
        assert!(build_rate_limiter(&RateLimitConfig::disabled()).is_none());
    }

    #[test]
    fn test_burst_is_enforced_per_client() {
        let config = RateLimitConfig {
            enabled: true,
            per_second: 1,
            burst_size: 2,
        };
        let limiter = build_rate_limiter(&config).unwrap();
        let a = "10.0.0.1".to_string();
        let b = "10.0.0.2".to_string();

        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_err());
        assert!(limiter.check_key(&b).is_ok());
    }

    #[test]
    fn test_client_key_prefers_forwarded_for() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn test_client_key_uses_peer_address() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 4000))));
        assert_eq!(client_key(&req), "192.168.1.20");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&bare), "unknown");
    }
}
