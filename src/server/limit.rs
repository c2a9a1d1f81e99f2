use anyhow::{Result, anyhow};
use axum::body::Body;
use axum::extract::{ConnectInfo, Request};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use governor::middleware::NoOpMiddleware;
use metrics::counter;
use std::net::SocketAddr;
use tower_governor::{
    GovernorLayer, errors::GovernorError, governor::GovernorConfigBuilder,
    key_extractor::KeyExtractor,
};
use tracing::{debug, warn};

/// Headers which may carry the originating client address, in order of preference
const CLIENT_IP_HEADERS: [&str; 7] = [
    "X-Forwarded-For",
    "X-Real-IP",        // Nginx
    "X-Client-IP",      // Proxies
    "CF-Connecting-IP", // Cloudflare
    "True-Client-IP",   // Akamai
    "X-Originating-IP",
    "X-Remote-Addr",
];

/// Key extractor that tries to get the client IP from proxy headers and falls back to the peer
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;

    fn extract<B>(&self, req: &Request<B>) -> Result<Self::Key, GovernorError> {
        // Try to extract IP from the forwarding headers
        let ip = CLIENT_IP_HEADERS.iter().find_map(|name| {
            req.headers()
                .get(*name)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
        });
        if let Some(ip) = ip {
            debug!(ip = ip, "Extracted IP address from headers");
            return Ok(ip.to_string());
        }
        // Otherwise, try to retrieve the connection info
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            debug!(ip = ?addr.ip(), "Extracted IP address from socket");
            return Ok(addr.ip().to_string());
        }
        // Unix socket clients share a single bucket
        warn!("Could not extract IP address from request, using default key");
        Ok("unknown".to_string())
    }
}

/// Nanoseconds between replenished requests for a steady rate
fn replenish_period_ns(rps: u32) -> u64 {
    (1_000_000_000 / rps.max(1) as u64).max(1)
}

/// Create a rate limiting layer with metrics and logging
pub fn create_rate_limit_layer(
    rps: u32,
    burst: u32,
) -> Result<GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware, Body>> {
    if rps == 0 {
        return Err(anyhow!("Rate limit must allow at least one request per second"));
    }
    // Output debugging information
    debug!(rps, burst, "Configuring the HTTP rate limiter");
    // Create the rate limit configuration
    let config = GovernorConfigBuilder::default()
        .per_nanosecond(replenish_period_ns(rps))
        .burst_size(burst)
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit configuration: rps={rps}, burst={burst}"))?;
    // Return the rate limit layer
    Ok(GovernorLayer::new(config).error_handler(|e| {
        // Output debugging information
        warn!("Rate limit exceeded: {e}");
        // Increment rate limit error metrics
        counter!("reception.total_errors").increment(1);
        counter!("reception.total_rate_limit_errors").increment(1);
        // Return the error response
        (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response()
    }))
}
