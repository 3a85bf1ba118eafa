use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::{
    repo::{RepoError, UserRepository},
    repo_types::{NewUser, User, UserStatus, UserSummary},
};

/// Map-backed repository for handler tests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }

    /// Overrides the registration time of the user with `email`.
    pub async fn backdate(&self, email: &str, at: OffsetDateTime) {
        let mut users = self.users.write().await;
        if let Some(user) = users.values_mut().find(|u| u.email == email) {
            user.register_at = at;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(RepoError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            address: new.address,
            latitude: new.latitude,
            longitude: new.longitude,
            status: UserStatus::Active,
            token: None,
            register_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_token(&self, id: Uuid, token: &str) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.token = Some(token.to_string());
        }
        Ok(())
    }

    async fn toggle_all_statuses(&self) -> Result<u64, RepoError> {
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            user.status = match user.status {
                UserStatus::Active => UserStatus::Inactive,
                UserStatus::Inactive => UserStatus::Active,
            };
        }
        Ok(users.len() as u64)
    }

    async fn list_registered_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<UserSummary>, RepoError> {
        let users = self.users.read().await;
        let mut hits: Vec<&User> = users
            .values()
            .filter(|u| u.register_at >= start && u.register_at < end)
            .collect();
        hits.sort_by_key(|u| u.register_at);
        Ok(hits
            .into_iter()
            .map(|u| UserSummary {
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect())
    }
}
