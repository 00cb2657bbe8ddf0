use anyhow::{Context, Result, anyhow, bail};
use chrono::Duration;
use std::env;
use std::path::PathBuf;

/// Sentinel for `USERS_DB_PATH` that swaps the JSON file for an in-memory store.
pub const MEMORY_STORE: &str = ":memory:";

/// Runtime configuration, read once at startup.
///
/// Everything comes from the environment (and `.env`, which `main` loads before
/// calling [`Config::from_env`]). Only `JWT_SECRET` is mandatory. Handing out
/// tokens signed with a default secret would be worse than refusing to boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub production: bool,
    pub jwt_secret: String,
    pub jwt_expiry: Duration,
    pub users_db_path: PathBuf,
    pub cors_origin: String,
    pub rate_limit: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let jwt_expiry = match env::var("JWT_SECRET_EXPIRY") {
            Ok(raw) => parse_expiry(&raw)?,
            Err(_) => Duration::hours(1),
        };

        // Both spellings are accepted, the dotenv files floating around still say NODE_ENV.
        let production = ["APP_ENV", "NODE_ENV"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .any(|v| v.eq_ignore_ascii_case("production"));

        let rate_limit = env::var("RATE_LIMIT")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "off" | "false" | "0"))
            .unwrap_or(true);

        Ok(Self {
            port,
            production,
            jwt_secret,
            jwt_expiry,
            users_db_path: env::var("USERS_DB_PATH")
                .unwrap_or_else(|_| "users/db.json".to_string())
                .into(),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            rate_limit,
        })
    }

    /// True when the user list should live in memory instead of on disk.
    pub fn in_memory_store(&self) -> bool {
        self.users_db_path.as_os_str() == MEMORY_STORE
    }
}

/// Parses a token lifetime such as `3600`, `45m`, `1h` or `7d`.
///
/// A bare number is seconds. Zero is rejected because every token issued
/// with it would be dead on arrival.
pub fn parse_expiry(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let amount: i64 = digits
        .parse()
        .map_err(|_| anyhow!("invalid JWT_SECRET_EXPIRY '{}'", raw))?;
    if amount == 0 {
        bail!("JWT_SECRET_EXPIRY must be greater than zero");
    }

    let duration = match unit.trim() {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        other => bail!("unknown JWT_SECRET_EXPIRY unit '{}'", other),
    };

    duration.ok_or_else(|| anyhow!("JWT_SECRET_EXPIRY '{}' is out of range", raw))
}
