//! Error types surfaced by the HTTP layer.
//!
//! Every failure a handler can produce is an [`ApiError`]. Axum turns it into a
//! status code plus a `{ "message": ... }` body, so clients never have to parse
//! plain-text rejections.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Why a bearer token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("No token provided")]
    Missing,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

impl TokenError {
    pub fn status(self) -> StatusCode {
        match self {
            // A request that never presented credentials is forbidden, not unauthenticated.
            TokenError::Missing => StatusCode::FORBIDDEN,
            TokenError::Expired | TokenError::Invalid => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a role mismatch at login.
    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    NotFound(String),

    /// Anything the caller can't fix. The detail is logged, never returned.
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        ApiError::Auth(msg.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Auth(_) => StatusCode::BAD_REQUEST,
            ApiError::Token(e) => e.status(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // The client's route guard keys off isValid, so token failures always carry it.
            ApiError::Token(e) => json!({ "isValid": false, "message": e.to_string() }),
            ApiError::Internal(source) => {
                tracing::error!(error = ?source, "request failed");
                json!({ "message": self.to_string() })
            }
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
