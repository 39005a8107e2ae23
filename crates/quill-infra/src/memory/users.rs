use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{NewUser, User};
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

/// In-memory user store.
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.token == token).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.token == user.token) {
            return Err(RepoError::Constraint("token already in use".to_string()));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("username already in use".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User::from_new(id, user, Utc::now());
        users.push(user.clone());

        Ok(user)
    }
}
