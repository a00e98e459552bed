//! Per-IP rate limiting for the login route.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use crate::web::error::ApiError;

/// Rate limiter keyed by client IP.
pub type KeyedIpLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// How often idle per-IP buckets are dropped.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// State for login rate limiting.
#[derive(Clone)]
pub struct RateLimitState {
    login: Arc<KeyedIpLimiter>,
}

impl RateLimitState {
    /// `login_rate_limit` is requests per minute per IP; zero is treated as one.
    pub fn new(login_rate_limit: u32) -> Self {
        let per_minute = NonZeroU32::new(login_rate_limit).unwrap_or(NonZeroU32::MIN);
        Self {
            login: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
        }
    }

    /// Check (and consume) one login attempt for `ip`.
    pub fn check_login(&self, ip: &str) -> bool {
        self.login.check_key(&ip.to_string()).is_ok()
    }

    /// Drop buckets that have fully refilled.
    pub fn cleanup(&self) {
        self.login.retain_recent();
        self.login.shrink_to_fit();
    }

    /// Spawn the periodic cleanup task.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                self.cleanup();
            }
        });
    }
}

/// Client IP: first `X-Forwarded-For` hop, then `X-Real-IP`, then the socket.
fn get_client_ip(req: &Request<Body>) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    if let Some(forwarded) = header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }
    if let Some(real_ip) = header("X-Real-IP") {
        return real_ip.trim().to_string();
    }
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    "unknown".to_string()
}

/// Rate limiting middleware for the login endpoint.
pub async fn login_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req);

    if !state.check_login(&ip) {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return ApiError::too_many_requests("Too many login attempts. Please try again later.")
            .into_response();
    }

    next.run(req).await
}
