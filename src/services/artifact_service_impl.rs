//! `SeaORM` implementation of the `ArtifactService` trait.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::db::repositories::artifact::bare_node;
use crate::domain::events::NotificationEvent;
use crate::domain::{ArtifactId, ArtifactKind, RatingSource, UserId, WatchStatus};
use crate::models::{ArtifactNode, NewArtifact};
use crate::services::artifact_service::{ArtifactError, ArtifactService, ArtifactSummary};

/// SeaORM-based implementation of [`ArtifactService`].
pub struct SeaOrmArtifactService {
    store: Arc<Store>,
    event_bus: tokio::sync::broadcast::Sender<NotificationEvent>,
}

impl SeaOrmArtifactService {
    #[must_use]
    pub const fn new(
        store: Arc<Store>,
        event_bus: tokio::sync::broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self { store, event_bus }
    }

    fn emit(&self, event: NotificationEvent) {
        // Nobody listening is fine; the logger task may be gone at shutdown.
        let _ = self.event_bus.send(event);
    }

    async fn require_row(
        &self,
        id: ArtifactId,
    ) -> Result<crate::entities::artifacts::Model, ArtifactError> {
        self.store
            .artifacts()
            .get(id)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?
            .ok_or(ArtifactError::NotFound(id))
    }

    async fn load_tree_with_states(
        &self,
        user: UserId,
        id: ArtifactId,
    ) -> Result<ArtifactNode, ArtifactError> {
        let mut tree = self
            .store
            .artifacts()
            .load_tree(id)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?
            .ok_or(ArtifactError::NotFound(id))?;

        let ids = tree.collect_ids();
        let states = self
            .store
            .states()
            .map_for(user, &ids)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?;
        tree.attach_user_states(&states);
        Ok(tree)
    }
}

#[async_trait::async_trait]
impl ArtifactService for SeaOrmArtifactService {
    async fn add_artifact(&self, new: NewArtifact) -> Result<ArtifactId, ArtifactError> {
        if let Some(parent_id) = new.parent_id {
            let parent = self.require_row(parent_id).await?;
            let parent_kind: ArtifactKind = parent
                .kind
                .parse()
                .map_err(|_| ArtifactError::InvalidData(format!(
                    "parent {parent_id} has a corrupt kind column"
                )))?;
            if parent_kind.expected_child_kind() != Some(new.kind) {
                return Err(ArtifactError::InvalidData(format!(
                    "a {} cannot own {} children",
                    parent_kind, new.kind
                )));
            }
        }

        let id = self
            .store
            .artifacts()
            .insert(&new)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        self.emit(NotificationEvent::ArtifactAdded {
            artifact_id: id,
            title: new.title,
        });
        Ok(id)
    }

    async fn list_artifacts(
        &self,
        kind: ArtifactKind,
        page: u64,
        page_size: u64,
        search: Option<&str>,
    ) -> Result<Vec<ArtifactSummary>, ArtifactError> {
        let rows = self
            .store
            .artifacts()
            .list(kind, page, page_size, search)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let node = bare_node(row).map_err(|e| ArtifactError::InvalidData(e.to_string()))?;
            summaries.push(ArtifactSummary {
                id: node.id,
                title: node.title,
                kind: node.kind,
                release_date: node.release_date,
            });
        }
        Ok(summaries)
    }

    async fn get_tree(&self, user: UserId, id: ArtifactId) -> Result<ArtifactNode, ArtifactError> {
        self.load_tree_with_states(user, id).await
    }

    async fn update_status(
        &self,
        user: UserId,
        id: ArtifactId,
        status: WatchStatus,
    ) -> Result<usize, ArtifactError> {
        // Only a finished-cascade needs the descendant id set.
        let ids = if status == WatchStatus::Finished {
            let tree = self
                .store
                .artifacts()
                .load_tree(id)
                .await
                .map_err(|e| ArtifactError::Database(e.to_string()))?
                .ok_or(ArtifactError::NotFound(id))?;
            tree.collect_ids()
        } else {
            self.require_row(id).await?;
            vec![id]
        };

        self.store
            .states()
            .set_status_many(user, &ids, status)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        self.emit(NotificationEvent::StatusChanged {
            user_id: user,
            artifact_id: id,
            status,
            cascaded: ids.len(),
        });
        Ok(ids.len())
    }

    async fn set_score(
        &self,
        user: UserId,
        id: ArtifactId,
        score: f64,
    ) -> Result<(), ArtifactError> {
        self.require_row(id).await?;
        self.store
            .states()
            .set_score(user, id, score)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?;
        self.emit(NotificationEvent::ScoreChanged {
            user_id: user,
            artifact_id: id,
            score,
        });
        Ok(())
    }

    async fn set_started_at(
        &self,
        user: UserId,
        id: ArtifactId,
        at: DateTime<Utc>,
    ) -> Result<(), ArtifactError> {
        self.require_row(id).await?;
        self.store
            .states()
            .set_started_at(user, id, at)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    async fn set_ended_at(
        &self,
        user: UserId,
        id: ArtifactId,
        at: DateTime<Utc>,
    ) -> Result<(), ArtifactError> {
        self.require_row(id).await?;
        self.store
            .states()
            .set_ended_at(user, id, at)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    async fn copy_user_states(
        &self,
        from: UserId,
        to: UserId,
        id: ArtifactId,
    ) -> Result<(), ArtifactError> {
        let source_tree = self.load_tree_with_states(from, id).await?;
        let mut target_tree = self.load_tree_with_states(to, id).await?;

        target_tree.copy_user_states_from(&source_tree)?;

        let states = target_tree.collect_user_states();
        self.store
            .states()
            .put_many(to, &states)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    async fn set_genres(&self, id: ArtifactId, genres: Vec<String>) -> Result<(), ArtifactError> {
        self.require_row(id).await?;
        self.store
            .artifacts()
            .set_genres(id, &genres)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    async fn add_rating(
        &self,
        id: ArtifactId,
        source: RatingSource,
        value: f64,
    ) -> Result<(), ArtifactError> {
        self.require_row(id).await?;
        self.store
            .artifacts()
            .add_rating(id, source, Some(value))
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    async fn add_link(
        &self,
        id: ArtifactId,
        url: String,
        label: Option<String>,
    ) -> Result<(), ArtifactError> {
        self.require_row(id).await?;
        self.store
            .artifacts()
            .add_link(id, url, label)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    async fn delete_artifact(&self, id: ArtifactId) -> Result<usize, ArtifactError> {
        let tree = self
            .store
            .artifacts()
            .load_tree(id)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?
            .ok_or(ArtifactError::NotFound(id))?;

        let ids = tree.collect_ids();
        self.store
            .artifacts()
            .delete_cascade(&ids)
            .await
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        self.emit(NotificationEvent::ArtifactDeleted {
            artifact_id: id,
            removed: ids.len(),
        });
        Ok(ids.len())
    }
}
