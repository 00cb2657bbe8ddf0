use crate::auth::AuthConfig;
use crate::client::ApiClient;
use crate::logger::Logger;
use crate::token;
use anyhow::{Context, Result};
use comfy_table::Table;
use inquire::{Password, Text};

/// The token from the keyring, or a nudge to log in.
pub fn require_token(auth: &AuthConfig) -> Result<&str> {
    auth.token
        .as_deref()
        .context("Not logged in. Run 'boxes login' first.")
}

/// Mirrors the server's policy so obviously bad passwords never leave the machine.
pub fn password_problem(password: &str, confirm: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        return Some("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least 1 uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least 1 digit");
    }
    if password != confirm {
        return Some("Passwords do not match");
    }
    None
}

/// Prompts for name, email and password (twice), then creates the account.
/// Does not log in. Run `boxes login` afterwards, same as the web flow.
pub async fn register(client: &ApiClient, admin: bool) -> Result<()> {
    let name = Text::new("Name:").prompt()?.trim().to_string();
    let email = Text::new("Email:").prompt()?.trim().to_string();
    let password = Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    let confirm = Password::new("Confirm password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    if let Some(problem) = password_problem(&password, &confirm) {
        Logger::error(problem);
        return Ok(());
    }

    Logger::info("Creating account...");
    match client.register(&name, &email, &password, admin).await {
        Ok(_) => {
            Logger::success(format!(
                "Account created for {}. Run {} to sign in.",
                Logger::highlight(&email),
                Logger::highlight("boxes login")
            ));
        }
        Err(e) => Logger::error(e),
    }

    Ok(())
}

pub async fn login(client: &ApiClient, admin: bool) -> Result<()> {
    let email = Text::new("Email:").prompt()?.trim().to_string();
    let password = Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    Logger::info("Authenticating...");

    // Only send isAdmin when asked. Omitting it skips the role check.
    let is_admin = admin.then_some(true);
    let response = match client.login(&email, &password, is_admin).await {
        Ok(r) => r,
        Err(e) => {
            Logger::error(e);
            return Ok(());
        }
    };

    let auth = AuthConfig {
        token: Some(response.token),
        email: Some(email.clone()),
        user_id: Some(response.user_id),
        api_url: Some(client.base_url().to_string()),
    };
    auth.save()?;

    Logger::success(format!("Logged in as {}!", Logger::highlight(&email)));
    Ok(())
}

pub async fn logout() -> Result<()> {
    AuthConfig::logout()?;
    Logger::success("Logged out.");
    Ok(())
}

/// Is the stored token still good?
///
/// Checks the expiry locally first and skips the round trip when it has
/// clearly passed. Any "no" from the server, or failing to reach it at all,
/// clears the stored credentials.
pub async fn status(client: &ApiClient, now: i64) -> Result<()> {
    let auth = AuthConfig::load()?;
    let Some(token) = auth.token.as_deref() else {
        Logger::warn("Not logged in.");
        return Ok(());
    };

    if token::is_expired(token, now) {
        AuthConfig::logout()?;
        Logger::warn("Session expired. Logged out.");
        return Ok(());
    }

    match client.verify(token).await {
        Ok(true) => {
            let email = auth.email.as_deref().unwrap_or("unknown");
            Logger::success(format!("Logged in as {}.", Logger::highlight(email)));
            if let Ok(exp) = token::expires_at(token) {
                Logger::info(Logger::dim(format!("Token expires in {}s", exp - now)));
            }
        }
        Ok(false) => {
            AuthConfig::logout()?;
            Logger::warn("Token was rejected by the server. Logged out.");
        }
        Err(e) => {
            log::debug!("verify failed: {:#}", e);
            AuthConfig::logout()?;
            Logger::error("Could not verify session. Logged out.");
        }
    }

    Ok(())
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    let auth = AuthConfig::load()?;
    let token = require_token(&auth)?;

    let profile = match client.profile(token).await {
        Ok(p) => p,
        Err(e) => {
            AuthConfig::logout()?;
            Logger::error(format!("{}. Logged out.", e));
            return Ok(());
        }
    };

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Id", profile.id.as_str()]);
    table.add_row(vec!["Name", profile.name.as_str()]);
    table.add_row(vec!["Email", profile.email.as_str()]);
    table.add_row(vec!["Role", if profile.is_admin { "admin" } else { "user" }]);
    table.add_row(vec!["Member since", profile.created_at.as_str()]);
    println!("{}", table);

    Ok(())
}
