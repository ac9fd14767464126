//! Domain service for user registration and lookup.

use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;

/// Domain errors for user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Registering a username that is already taken is a write-path misuse,
    /// surfaced explicitly rather than as an absent result.
    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for users.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// - Returns [`UserError::AlreadyExists`] for a taken username
    /// - Returns [`UserError::Database`] on connection failures
    async fn register(&self, username: &str) -> Result<User, UserError>;

    /// Looks a user up by name.
    ///
    /// # Errors
    ///
    /// - Returns [`UserError::NotFound`] for unknown names
    /// - Returns [`UserError::Database`] on connection failures
    async fn get_by_username(&self, username: &str) -> Result<User, UserError>;

    /// Looks a user up by id.
    ///
    /// # Errors
    ///
    /// - Returns [`UserError::NotFound`] for unknown ids
    /// - Returns [`UserError::Database`] on connection failures
    async fn get(&self, id: UserId) -> Result<User, UserError>;
}
