use super::UserRepository;
use crate::models::user::{User, UsersDocument};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Keeps every account in one pretty-printed JSON file.
///
/// Saves are a single `write` of the whole document. No temp file, no rename,
/// so a crash mid-write can leave a truncated file. The next load then comes
/// back empty instead of erroring.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Serialize)]
struct UsersDocumentRef<'a> {
    users: &'a [User],
}

#[async_trait]
impl UserRepository for JsonFileStore {
    async fn load(&self) -> Vec<User> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Error reading users data");
                return Vec::new();
            }
        };

        match serde_json::from_str::<UsersDocument>(&raw) {
            Ok(doc) => doc.users,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Error parsing users data");
                Vec::new()
            }
        }
    }

    async fn save(&self, users: &[User]) -> Result<()> {
        let data = serde_json::to_string_pretty(&UsersDocumentRef { users })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        tokio::fs::write(&self.path, data)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), count = users.len(), "Saved users");
        Ok(())
    }
}
