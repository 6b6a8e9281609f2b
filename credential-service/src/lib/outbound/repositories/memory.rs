use std::collections::HashMap;

use async_trait::async_trait;
use auth::CredentialStore;
use auth::ResetToken;
use auth::StoreError;
use auth::User;
use auth::UserId;
use tokio::sync::RwLock;

use crate::domain::credentials::models::NewUser;
use crate::domain::credentials::ports::UserRepository;

/// Credential store kept in process memory.
///
/// Used for local development and tests. Reset token writes are last-write-wins
/// per user, like the Postgres store.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    last_id: i64,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn set_reset_token(&self, id: UserId, token: &ResetToken) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        user.reset_token = Some(token.clone());
        Ok(())
    }

    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| {
                u.reset_token
                    .as_ref()
                    .is_some_and(|stored| stored.value() == token)
            })
            .cloned())
    }

    async fn clear_reset_token(&self, id: UserId, token: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        if !user
            .reset_token
            .as_ref()
            .is_some_and(|stored| stored.value() == token)
        {
            return Ok(false);
        }

        user.reset_token = None;
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryCredentialStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::EmailAlreadyExists(user.email));
        }

        state.last_id += 1;
        let created = User {
            id: UserId(state.last_id),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            reset_token: None,
        };
        state.users.insert(created.id, created.clone());

        Ok(created)
    }
}
