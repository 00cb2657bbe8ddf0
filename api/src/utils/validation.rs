use crate::errors::ApiError;
use regex::Regex;
use std::sync::OnceLock;

pub const PASSWORD_POLICY_MESSAGE: &str =
    "Password must contain at least 1 uppercase letter, 1 digit, and be at least 8 characters long";

/// Pulls a required string field out of a request.
///
/// Absent and empty are the same thing here. `label` is what the user sees,
/// e.g. `"Email is required"`.
pub fn required<'a>(value: &'a Option<String>, label: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{} is required", label))),
    }
}

/// Checks the password policy.
///
/// Rules:
/// 1. At least 8 characters
/// 2. At least one ASCII uppercase letter
/// 3. At least one ASCII digit
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    // The regex crate has no lookahead, so each rule is its own pattern.
    static UPPER: OnceLock<Regex> = OnceLock::new();
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    let upper = UPPER.get_or_init(|| Regex::new(r"[A-Z]").expect("static regex"));
    let digit = DIGIT.get_or_init(|| Regex::new(r"[0-9]").expect("static regex"));

    let long_enough = password.chars().count() >= 8;

    if long_enough && upper.is_match(password) && digit.is_match(password) {
        Ok(())
    } else {
        Err(ApiError::validation(PASSWORD_POLICY_MESSAGE))
    }
}
