//! Fixed-window request limiting keyed by client IP

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use super::{AppState, error::ApiError};
use crate::config::RateLimitSettings;

// Expired windows are swept once the table grows past this many clients
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_proxy: bool,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            max_requests: settings.max_requests,
            window: settings.window,
            trust_proxy: settings.trust_proxy,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// The address a request is counted against
    pub fn client_of(&self, request: &Request) -> IpAddr {
        client_ip(request, self.trust_proxy)
    }

    /// Record a request from `client`; false once it has used up its window
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.count = 0;
            entry.started = now;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            true
        } else {
            false
        }
    }
}

/// Client address. The socket peer by default; with `trust_proxy` the first
/// `X-Forwarded-For` hop, then `X-Real-IP`, are preferred. Falls back to
/// localhost when no peer address is attached.
pub fn client_ip(request: &Request, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request) {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn forwarded_ip(request: &Request) -> Option<IpAddr> {
    let headers = request.headers();

    let forwarded: Option<IpAddr> = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

pub async fn limit_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = state.limiter.client_of(&request);
    if !state.limiter.check(client) {
        tracing::warn!("Rate limit exceeded for {}", client);
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(request).await)
}
