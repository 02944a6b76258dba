//! Fixed-window rate limiting.
//!
//! One window per client key. The first request in a window starts it; once
//! the counter passes the limit every further request in that window is
//! rejected with a 429 envelope. The window resets, rather than slides, on
//! expiry.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::response::ApiResponse;

/// Windows are pruned once the map grows past this many client keys.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Per-client fixed-window counters.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    /// Creates a limiter from configuration.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_millis(config.window_ms),
            max_requests: config.max_requests,
            windows: DashMap::new(),
        }
    }

    /// Records one request for `key`; returns `false` when the key is over
    /// its limit for the current window.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }
        entry.count += 1;
        let allowed = entry.count <= self.max_requests;
        drop(entry);

        if self.windows.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        allowed
    }

    fn prune(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.duration_since(w.started_at) < self.window);
    }
}

/// Middleware applying the limiter to every request.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&req);
    if !limiter.check(&key) {
        tracing::warn!(client = %key, path = %req.uri().path(), "rate limit exceeded");
        return ApiResponse::too_many_requests("too many requests, please retry later")
            .into_response();
    }
    next.run(req).await
}

/// The client key: the first `x-forwarded-for` hop when present, otherwise
/// the peer address.
fn client_key(req: &Request<Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').next()
    {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_ms: u64, max_requests: u32) -> FixedWindowLimiter {
        FixedWindowLimiter::new(&RateLimitConfig {
            window_ms,
            max_requests,
        })
    }

    #[test]
    fn test_requests_within_limit_pass() {
        let limiter = limiter(60_000, 3);
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_request_over_limit_is_rejected() {
        let limiter = limiter(60_000, 2);
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(60_000, 1);
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(limiter.check("5.6.7.8"));
    }

    #[test]
    fn test_window_resets_after_elapse() {
        let limiter = limiter(50, 1);
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.check("1.2.3.4"));
    }
}
