//! Domain service for artifact management operations.
//!
//! This module provides a clean domain layer abstraction over data access,
//! keeping handlers and the CLI away from raw queries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ArtifactId, ArtifactKind, RatingSource, UserId, WatchStatus};
use crate::models::{ArtifactNode, NewArtifact, TreeError};

/// Domain errors for artifact operations.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(ArtifactId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid artifact data: {0}")]
    InvalidData(String),

    /// Contract violations surfaced by tree operations (unsupported kind,
    /// mismatched shapes). Never silently defaulted.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl From<sea_orm::DbErr> for ArtifactError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Flat listing row for paged browsing; hydrating the full tree per row
/// would defeat pagination.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub id: ArtifactId,
    pub title: String,
    pub kind: ArtifactKind,
    pub release_date: Option<DateTime<Utc>>,
}

/// Domain service trait for artifact operations.
///
/// # Examples
///
/// ```rust,ignore
/// use kiroku::services::{ArtifactService, ArtifactError};
/// use kiroku::domain::{ArtifactId, UserId};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn ArtifactService>) -> Result<(), ArtifactError> {
///     let tree = service.get_tree(UserId::new(1), ArtifactId::new(1)).await?;
///     let _ = tree.mean_rating();
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait ArtifactService: Send + Sync {
    /// Registers a new artifact, optionally as a child of an existing one.
    ///
    /// # Errors
    ///
    /// - Returns [`ArtifactError::NotFound`] if the parent does not exist
    /// - Returns [`ArtifactError::InvalidData`] if the parent's kind cannot
    ///   own children of the new kind
    /// - Returns [`ArtifactError::Database`] on connection failures
    async fn add_artifact(&self, new: NewArtifact) -> Result<ArtifactId, ArtifactError>;

    /// Paged listing of one kind, optionally filtered by a title substring.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Database`] on connection failures.
    async fn list_artifacts(
        &self,
        kind: ArtifactKind,
        page: u64,
        page_size: u64,
        search: Option<&str>,
    ) -> Result<Vec<ArtifactSummary>, ArtifactError>;

    /// Loads the fully hydrated tree with the user's states attached.
    ///
    /// # Errors
    ///
    /// - Returns [`ArtifactError::NotFound`] if the artifact does not exist
    /// - Returns [`ArtifactError::Database`] on connection failures
    async fn get_tree(&self, user: UserId, id: ArtifactId) -> Result<ArtifactNode, ArtifactError>;

    /// Sets the user status. `finished` cascades to every descendant; any
    /// other status touches the artifact alone. Returns the number of
    /// artifacts touched.
    ///
    /// # Errors
    ///
    /// - Returns [`ArtifactError::NotFound`] if the artifact does not exist
    /// - Returns [`ArtifactError::Database`] on connection failures
    async fn update_status(
        &self,
        user: UserId,
        id: ArtifactId,
        status: WatchStatus,
    ) -> Result<usize, ArtifactError>;

    /// Sets the user score, creating state lazily.
    ///
    /// # Errors
    ///
    /// - Returns [`ArtifactError::NotFound`] if the artifact does not exist
    /// - Returns [`ArtifactError::Database`] on connection failures
    async fn set_score(
        &self,
        user: UserId,
        id: ArtifactId,
        score: f64,
    ) -> Result<(), ArtifactError>;

    /// Sets the start date, creating state lazily.
    async fn set_started_at(
        &self,
        user: UserId,
        id: ArtifactId,
        at: DateTime<Utc>,
    ) -> Result<(), ArtifactError>;

    /// Sets the end date, creating state lazily.
    async fn set_ended_at(
        &self,
        user: UserId,
        id: ArtifactId,
        at: DateTime<Utc>,
    ) -> Result<(), ArtifactError>;

    /// Copies one user's states on an artifact tree onto another user,
    /// matched node by node. The underlying tree copy refuses mismatched
    /// roots, so both sides always describe the same artifact.
    ///
    /// # Errors
    ///
    /// - Returns [`ArtifactError::NotFound`] if the artifact does not exist
    /// - Returns [`ArtifactError::Tree`] with
    ///   [`TreeError::ShapeMismatch`] when the trees diverge
    async fn copy_user_states(
        &self,
        from: UserId,
        to: UserId,
        id: ArtifactId,
    ) -> Result<(), ArtifactError>;

    /// Replaces the artifact's genre set.
    async fn set_genres(&self, id: ArtifactId, genres: Vec<String>) -> Result<(), ArtifactError>;

    /// Attaches a typed rating value.
    async fn add_rating(
        &self,
        id: ArtifactId,
        source: RatingSource,
        value: f64,
    ) -> Result<(), ArtifactError>;

    /// Attaches an external link.
    async fn add_link(
        &self,
        id: ArtifactId,
        url: String,
        label: Option<String>,
    ) -> Result<(), ArtifactError>;

    /// Deletes the artifact and every descendant, along with all rows
    /// referencing any of them. Returns the number of artifacts removed.
    ///
    /// # Errors
    ///
    /// - Returns [`ArtifactError::NotFound`] if the artifact does not exist
    /// - Returns [`ArtifactError::Database`] on connection failures
    async fn delete_artifact(&self, id: ArtifactId) -> Result<usize, ArtifactError>;
}
