//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use crate::db::{Store, User};
use crate::domain::UserId;
use crate::domain::events::NotificationEvent;
use crate::services::user_service::{UserError, UserService};

/// SeaORM-based implementation of [`UserService`].
pub struct SeaOrmUserService {
    store: Arc<Store>,
    event_bus: tokio::sync::broadcast::Sender<NotificationEvent>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(
        store: Arc<Store>,
        event_bus: tokio::sync::broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self { store, event_bus }
    }
}

#[async_trait::async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, username: &str) -> Result<User, UserError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserError::InvalidUsername("must not be empty".to_string()));
        }

        let repo = self.store.users();
        if repo
            .get_by_username(username)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?
            .is_some()
        {
            return Err(UserError::AlreadyExists(username.to_string()));
        }

        let user = repo
            .insert(username)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        let _ = self.event_bus.send(NotificationEvent::UserRegistered {
            user_id: user.id,
            username: user.username.clone(),
        });
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        self.store
            .users()
            .get_by_username(username)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    async fn get(&self, id: UserId) -> Result<User, UserError> {
        self.store
            .users()
            .get_by_id(id)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}
