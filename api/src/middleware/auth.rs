use crate::errors::{ApiError, TokenError};
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

/// The caller behind a valid bearer token.
///
/// Add `user: AuthenticatedUser` to a handler and Axum will:
/// 1. Pull the token out of `Authorization: Bearer <token>`
/// 2. Check its signature and expiry against the configured secret
/// 3. Reject with 403 (no token) or 401 (expired / bad token) before the handler runs
///
/// It does not check that the user still exists. Handlers that need the record
/// look it up and return 404 themselves.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state.tokens.verify(&token).map_err(|e| {
            tracing::debug!(reason = %e, "rejected bearer token");
            e
        })?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<String, TokenError> {
    let raw = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::Missing)?;

    if let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>() {
        return Ok(bearer.token().to_string());
    }

    // The token is whatever follows the scheme. A value with nothing after the
    // first word ("Bearer", or a bare token with no scheme) carries no token.
    // A second word under any other scheme is a bad credential.
    match raw.to_str().ok().and_then(|v| v.split_whitespace().nth(1)) {
        Some(_) => Err(TokenError::Invalid),
        None => Err(TokenError::Missing),
    }
}
