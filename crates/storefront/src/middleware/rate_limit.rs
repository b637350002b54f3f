//! Rate limiting via `governor` / `tower_governor`.
//!
//! Two tiers: a strict limiter for the auth endpoints (brute-force
//! protection) and a relaxed one for the shopping surface (cart, wishlist,
//! checkout). Keys are the client IP as reported by the proxy in front of
//! us; requests with no usable proxy header are refused rather than pooled
//! into one shared bucket.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor that walks the usual proxy headers for the client IP.
#[derive(Clone, Copy)]
pub struct ForwardedIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ForwardedIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // X-Forwarded-For carries a chain; the first entry is the client.
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        Err(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ForwardedIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Auth endpoints: roughly 10 requests per minute per IP (replenish one
/// token every 6 seconds, burst of 5).
///
/// # Panics
///
/// Never: the builder accepts any positive `per_second`/`burst_size`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ForwardedIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("positive per_second and burst_size are always valid");
    GovernorLayer::new(Arc::new(config))
}

/// Shopping surface: roughly 100 requests per minute per IP (replenish one
/// token per second, burst of 50).
///
/// # Panics
///
/// Never: the builder accepts any positive `per_second`/`burst_size`.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ForwardedIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("positive per_second and burst_size are always valid");
    GovernorLayer::new(Arc::new(config))
}
