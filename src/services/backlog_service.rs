//! Domain service for backlog management and the virtual wishlist views.

use thiserror::Error;

use crate::domain::{ArtifactId, ArtifactKind, BacklogId, RankingStrategy, SortKey, UserId};
use crate::models::{Backlog, BacklogItem};

/// Domain errors for backlog operations.
#[derive(Debug, Error)]
pub enum BacklogError {
    #[error("Backlog not found: {0}")]
    NotFound(BacklogId),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Artifact {artifact} is not in backlog {backlog}")]
    EntryNotFound {
        backlog: BacklogId,
        artifact: ArtifactId,
    },

    #[error("Backlog {backlog} tracks {expected} artifacts, got {found}")]
    KindMismatch {
        backlog: BacklogId,
        expected: ArtifactKind,
        found: ArtifactKind,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid backlog data: {0}")]
    InvalidData(String),
}

impl From<sea_orm::DbErr> for BacklogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for backlogs.
///
/// Stored backlogs are ordered by their own ranking strategy; the two
/// virtual views (wishlist, upcoming) are recomputed from per-user wishlist
/// statuses on every call and are reachable only through their dedicated
/// methods, never by backlog id.
#[async_trait::async_trait]
pub trait BacklogService: Send + Sync {
    /// Creates a stored backlog for one root artifact kind.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::UserNotFound`] if the user does not exist
    /// - Returns [`BacklogError::InvalidData`] for non-root kinds
    /// - Returns [`BacklogError::Database`] on connection failures
    async fn create_backlog(
        &self,
        user: UserId,
        kind: ArtifactKind,
        title: String,
        strategy: RankingStrategy,
    ) -> Result<Backlog, BacklogError>;

    /// Lists the user's stored backlogs.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError::Database`] on connection failures.
    async fn list_backlogs(&self, user: UserId) -> Result<Vec<Backlog>, BacklogError>;

    /// The backlog's entries, ranked by its strategy and ordered by the
    /// requested display key (default: rank ascending, ties by date added).
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::NotFound`] for unknown or virtual ids
    /// - Returns [`BacklogError::Database`] on connection failures
    async fn ordered_entries(
        &self,
        backlog: BacklogId,
        sort: Option<SortKey>,
    ) -> Result<Vec<BacklogItem>, BacklogError>;

    /// Adds an artifact to a backlog.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::NotFound`] / [`BacklogError::ArtifactNotFound`]
    ///   for missing references
    /// - Returns [`BacklogError::KindMismatch`] when the artifact's kind is
    ///   not the backlog's
    /// - Returns [`BacklogError::InvalidData`] for duplicates
    async fn add_entry(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
    ) -> Result<(), BacklogError>;

    /// Removes an artifact from a backlog.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::EntryNotFound`] if the artifact is not in
    ///   the backlog
    async fn remove_entry(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
    ) -> Result<(), BacklogError>;

    /// Sets or clears an entry's manual rank.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::EntryNotFound`] if the artifact is not in
    ///   the backlog
    async fn set_entry_rank(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        rank: Option<i64>,
    ) -> Result<(), BacklogError>;

    /// Replaces an entry's tag set (scoped to the entry, distinct from the
    /// artifact's own tags).
    async fn set_entry_tags(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        tags: Vec<String>,
    ) -> Result<(), BacklogError>;

    /// Records a pairwise comparison between two entries and updates both
    /// Elo ratings. Returns the new `(winner, loser)` ratings.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::EntryNotFound`] for either side
    /// - Returns [`BacklogError::InvalidData`] when both sides are the same
    ///   artifact
    async fn record_duel(
        &self,
        backlog: BacklogId,
        winner: ArtifactId,
        loser: ArtifactId,
    ) -> Result<(f64, f64), BacklogError>;

    /// The virtual wishlist view: released artifacts the user wishlisted,
    /// Elo-ranked with per-user overrides and tagged with the reserved
    /// wishlist backlog id.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::InvalidData`] for non-root kinds
    /// - Returns [`BacklogError::Database`] on connection failures
    async fn wishlist(
        &self,
        user: UserId,
        kind: ArtifactKind,
        sort: Option<SortKey>,
    ) -> Result<Vec<BacklogItem>, BacklogError>;

    /// The virtual future-releases view: wishlisted artifacts not yet
    /// released, in release order, tagged with the reserved upcoming id.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::InvalidData`] for non-root kinds
    /// - Returns [`BacklogError::Database`] on connection failures
    async fn upcoming(
        &self,
        user: UserId,
        kind: ArtifactKind,
    ) -> Result<Vec<BacklogItem>, BacklogError>;

    /// Sets or clears the user's wishlist rank override for an artifact.
    async fn set_wishlist_rank(
        &self,
        user: UserId,
        artifact: ArtifactId,
        rank: Option<i64>,
    ) -> Result<(), BacklogError>;

    /// Records a wishlist duel, updating the per-user Elo overrides both
    /// sides read from. Returns the new `(winner, loser)` ratings.
    ///
    /// # Errors
    ///
    /// - Returns [`BacklogError::InvalidData`] when both sides are the same
    ///   artifact
    async fn record_wishlist_duel(
        &self,
        user: UserId,
        kind: ArtifactKind,
        winner: ArtifactId,
        loser: ArtifactId,
    ) -> Result<(f64, f64), BacklogError>;
}
