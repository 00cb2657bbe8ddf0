use crate::models::boxes::{BoxSelection, DEFAULT_TOTAL_SQUARES};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored account, exactly as it appears in the users file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: String,
    #[serde(default)]
    pub selected_squares: BoxSelection,
    #[serde(default = "default_total_squares")]
    pub total_squares: i64,
}

impl User {
    /// Builds a brand-new account with a random id and an empty grid.
    pub fn new(name: String, email: String, password_hash: String, is_admin: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password: password_hash,
            is_admin,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            selected_squares: BoxSelection::new(),
            total_squares: DEFAULT_TOTAL_SQUARES,
        }
    }

    pub fn reset_boxes(&mut self) {
        self.selected_squares = BoxSelection::new();
        self.total_squares = DEFAULT_TOTAL_SQUARES;
    }

    pub fn profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            created_at: format_created_at(&self.created_at),
        }
    }
}

fn default_total_squares() -> i64 {
    DEFAULT_TOTAL_SQUARES
}

/// Renders `2025-03-04T14:02:11.000Z` as `March 04, 2025, 14:02:11`.
/// Values that aren't RFC 3339 are passed through untouched.
pub fn format_created_at(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%B %d, %Y, %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The on-disk document: `{ "users": [...] }`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UsersDocument {
    #[serde(default)]
    pub users: Vec<User>,
}

/// What `GET /user` returns. No password hash, no box state.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

// Request fields are all optional so a missing one becomes a "X is required"
// message instead of a serde rejection.

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub status: String,
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxInfo {
    pub total_squares: i64,
    pub selected_squares: BoxSelection,
}

impl From<&User> for BoxInfo {
    fn from(user: &User) -> Self {
        Self {
            total_squares: user.total_squares,
            selected_squares: user.selected_squares.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveBoxInfoRequest {
    pub total_squares: Option<i64>,
    pub selected_squares: Option<BoxSelection>,
    #[serde(default)]
    pub is_reset: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
}
