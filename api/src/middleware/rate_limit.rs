use anyhow::{Context, Result};
use axum::http::Request;
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use std::{net::IpAddr, sync::Arc, time::Duration};
use tower_governor::{
    errors::GovernorError,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::KeyExtractor,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IpKeyExtractor;

impl KeyExtractor for IpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // 1. Cloudflare puts the real client in 'cf-connecting-ip'.
        if let Some(ip) = headers
            .get("cf-connecting-ip")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 2. Generic proxies: first entry of X-Forwarded-For is the client.
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 3. No proxy headers (local dev). Everyone shares the loopback bucket.
        Ok(IpAddr::from([127, 0, 0, 1]))
    }
}

pub type AuthLimitConfig = GovernorConfig<IpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// 5 login attempts per 15 minutes per IP. Brute-force protection.
pub fn create_login_config() -> Result<Arc<AuthLimitConfig>> {
    build(Duration::from_secs(180), 5) // 180s * 5 = 15 mins
}

/// 10 sign-ups per hour per IP. Keeps the users file from being flooded.
pub fn create_register_config() -> Result<Arc<AuthLimitConfig>> {
    build(Duration::from_secs(360), 10) // 360s * 10 = 1 hour
}

fn build(period: Duration, burst: u32) -> Result<Arc<AuthLimitConfig>> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(IpKeyExtractor)
        .period(period)
        .burst_size(burst)
        .finish()
        .context("invalid rate limit configuration")?;
    Ok(Arc::new(config))
}
