pub mod json;
pub mod memory;

use crate::config::Config;
use crate::models::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Whole-list persistence for accounts.
///
/// Callers load everything, change what they need and save everything back.
/// There is no locking between the two calls. Two requests that interleave a
/// load/save will lose one of the writes.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Never fails. An unreadable backing store is logged and treated as empty.
    async fn load(&self) -> Vec<User>;

    /// Replaces the stored list with `users`.
    async fn save(&self, users: &[User]) -> Result<()>;
}

pub type DB = Arc<dyn UserRepository>;

/// Picks the backing store from config.
pub fn connect(config: &Config) -> DB {
    if config.in_memory_store() {
        tracing::warn!("USERS_DB_PATH is :memory:, accounts will not survive a restart");
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(JsonFileStore::new(&config.users_db_path))
    }
}

/// Emails are matched exactly as stored, so `Ada@x.com` and `ada@x.com` are two accounts.
pub fn find_by_email<'a>(users: &'a [User], email: &str) -> Option<&'a User> {
    users.iter().find(|u| u.email == email)
}

pub fn find_by_id_mut<'a>(users: &'a mut [User], id: &str) -> Option<&'a mut User> {
    users.iter_mut().find(|u| u.id == id)
}
