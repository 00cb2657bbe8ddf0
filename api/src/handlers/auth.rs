use crate::auth::{hash_password, verify_password};
use crate::db::find_by_email;
use crate::errors::ApiError;
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
use crate::state::AppState;
use crate::utils::validation::{required, validate_password};
use anyhow::anyhow;
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;

/// Creates an account.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. Name, email, password and isAdmin are present and non-empty
/// 2. Email isn't taken (exact, case-sensitive match)
/// 3. Password satisfies the policy
///
/// Then the password is hashed and the whole user list is written back.
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let name = required(&payload.name, "Name")?;
    let email = required(&payload.email, "Email")?;
    let password = required(&payload.password, "Password")?;
    let is_admin = payload
        .is_admin
        .ok_or_else(|| ApiError::validation("isAdmin is required"))?;

    let mut users = state.users.load().await;

    if find_by_email(&users, email).is_some() {
        tracing::debug!(email, "registration rejected, email taken");
        return Err(ApiError::validation("Email already in use."));
    }
    validate_password(password)?;

    // Argon2 is deliberately slow. Keep it off the async workers.
    let plaintext = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(ApiError::internal)?
        .map_err(|e| ApiError::internal(anyhow!("password hashing failed: {}", e)))?;

    let user = User::new(name.to_string(), email.to_string(), password_hash, is_admin);
    let user_id = user.id.clone();

    users.push(user);
    state.users.save(&users).await.map_err(ApiError::internal)?;

    tracing::info!(user_id = %user_id, email, is_admin, "registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success".to_string(),
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

/// Exchanges email + password for a bearer token.
///
/// `isAdmin` is optional. When it is sent, it has to match the account's role,
/// so the admin login form can't be used by regular users and vice versa.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = required(&payload.email, "Email")?;
    let password = required(&payload.password, "Password")?;

    let users = state.users.load().await;
    let user = find_by_email(&users, email).ok_or_else(|| {
        tracing::debug!(email, "login for unknown email");
        ApiError::auth("User does not exist")
    })?;

    let plaintext = password.to_string();
    let stored_hash = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&plaintext, &stored_hash))
        .await
        .map_err(ApiError::internal)?
        .unwrap_or_else(|e| {
            // A hash we can't parse can never match. Treat it like a wrong password.
            tracing::warn!(user_id = %user.id, error = %e, "stored password hash is unreadable");
            false
        });

    if !matches {
        tracing::debug!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::auth("Invalid credentials"));
    }

    if let Some(wants_admin) = payload.is_admin
        && wants_admin != user.is_admin
    {
        return Err(ApiError::auth(if wants_admin {
            "You are not an admin. Login as a normal user."
        } else {
            "You are not authorized to login as a normal user."
        }));
    }

    let token = state.tokens.issue(&user.id).map_err(ApiError::internal)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "Login successful".to_string(),
        token,
        user_id: user.id.clone(),
    }))
}
