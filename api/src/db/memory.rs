use super::UserRepository;
use crate::models::user::User;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store. Same load/save contract as the file store, gone on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn load(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    async fn save(&self, users: &[User]) -> Result<()> {
        *self.users.write().await = users.to_vec();
        Ok(())
    }
}
