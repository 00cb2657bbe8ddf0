use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;

#[derive(Deserialize)]
struct Payload {
    exp: i64,
}

/// Reads `exp` out of a JWT without checking the signature.
///
/// Only good for deciding whether it's worth asking the server. The server
/// still has the final say through `/verify-token`.
pub fn expires_at(token: &str) -> Result<i64> {
    let payload = token
        .split('.')
        .nth(1)
        .context("Token is not a JWT")?;

    // Some encoders pad anyway.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .context("Token payload is not base64url")?;

    let payload: Payload =
        serde_json::from_slice(&bytes).context("Token payload has no expiry")?;
    Ok(payload.exp)
}

/// Unreadable tokens count as expired.
pub fn is_expired(token: &str, now: i64) -> bool {
    expires_at(token).map(|exp| exp < now).unwrap_or(true)
}
