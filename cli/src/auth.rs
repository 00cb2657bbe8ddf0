use anyhow::{Context, Result};
use directories::ProjectDirs;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const KEYRING_SERVICE: &str = "boxes-cli";

/// Who we are logged in as and where.
///
/// The token itself never touches `auth.toml`. It lives in the OS keyring,
/// keyed by email, and is pulled back in on [`AuthConfig::load`].
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthConfig {
    #[serde(skip)]
    pub token: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub api_url: Option<String>,
}

impl AuthConfig {
    pub fn get_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "boxes", "boxes")
            .context("Could not determine config directory")?;
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(config_dir.join("auth.toml"))
    }

    pub fn load() -> Result<Self> {
        let mut config = Self::read_file(&Self::get_path()?)?;

        if let Some(entry) = config.keyring_entry() {
            if let Ok(token) = entry.get_password() {
                config.token = Some(token);
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.write_file(&Self::get_path()?)?;

        if let Some(entry) = self.keyring_entry() {
            match &self.token {
                Some(token) => entry
                    .set_password(token)
                    .context("Could not store token in the system keyring")?,
                None => {
                    let _ = entry.delete_credential();
                }
            }
        }

        Ok(())
    }

    /// Forgets everything: keyring entry first (we need the email to find it), then the file.
    pub fn logout() -> Result<()> {
        let path = Self::get_path()?;
        if !path.exists() {
            return Ok(());
        }

        if let Ok(config) = Self::read_file(&path) {
            if let Some(entry) = config.keyring_entry() {
                let _ = entry.delete_credential();
            }
        }
        fs::remove_file(path)?;

        Ok(())
    }

    /// A missing file is an empty config, not an error.
    pub fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).with_context(|| format!("Could not parse {}", path.display()))
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn keyring_entry(&self) -> Option<Entry> {
        let email = self.email.as_deref()?.trim();
        Entry::new_with_target(KEYRING_SERVICE, KEYRING_SERVICE, email).ok()
    }
}
