use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::db::repositories::{parse_epoch_ms, parse_rfc3339};
use crate::domain::{ArtifactId, ArtifactKind, UserId, WatchStatus};
use crate::entities::{artifacts, user_states};
use crate::models::UserState;
use crate::ranking::wishlist::WishlistRow;

/// Per-user progress and rating rows, keyed by (user, artifact).
///
/// State rows are created lazily by the first mutator and only removed by
/// cascading artifact deletion, mirroring the model-side lifecycle.
pub struct UserStateRepository {
    conn: DatabaseConnection,
}

impl UserStateRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, user: UserId, artifact: ArtifactId) -> Result<Option<UserState>> {
        let row = find_row(&self.conn, user, artifact).await?;
        Ok(row.map(|r| state_from_row(&r)))
    }

    /// Bulk fetch keyed by artifact id, for attaching states to a tree.
    pub async fn map_for(
        &self,
        user: UserId,
        ids: &[ArtifactId],
    ) -> Result<HashMap<ArtifactId, UserState>> {
        let raw: Vec<i32> = ids.iter().map(|id| id.value()).collect();
        let rows = user_states::Entity::find()
            .filter(user_states::Column::UserId.eq(user.value()))
            .filter(user_states::Column::ArtifactId.is_in(raw))
            .all(&self.conn)
            .await
            .context("Failed to query user states")?;

        Ok(rows
            .into_iter()
            .map(|row| (ArtifactId::new(row.artifact_id), state_from_row(&row)))
            .collect())
    }

    /// Sets the status on every given artifact, creating rows lazily, inside
    /// one transaction. Used for both single updates and finished-cascades.
    pub async fn set_status_many(
        &self,
        user: UserId,
        ids: &[ArtifactId],
        status: WatchStatus,
    ) -> Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open status transaction")?;
        for &artifact in ids {
            match find_row(&txn, user, artifact).await? {
                Some(row) => {
                    let mut active: user_states::ActiveModel = row.into();
                    active.status = Set(Some(status.as_str().to_string()));
                    active
                        .update(&txn)
                        .await
                        .context("Failed to update status")?;
                }
                None => {
                    fresh_row(user, artifact, |active| {
                        active.status = Set(Some(status.as_str().to_string()));
                    })
                    .insert(&txn)
                    .await
                    .context("Failed to insert status")?;
                }
            }
        }
        txn.commit()
            .await
            .context("Failed to commit status transaction")?;
        Ok(())
    }

    pub async fn set_score(&self, user: UserId, artifact: ArtifactId, score: f64) -> Result<()> {
        self.upsert_field(user, artifact, |active| active.score = Set(Some(score)))
            .await
    }

    pub async fn set_started_at(
        &self,
        user: UserId,
        artifact: ArtifactId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.upsert_field(user, artifact, |active| {
            active.started_at = Set(Some(at.to_rfc3339()));
        })
        .await
    }

    pub async fn set_ended_at(
        &self,
        user: UserId,
        artifact: ArtifactId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.upsert_field(user, artifact, |active| {
            active.ended_at = Set(Some(at.to_rfc3339()));
        })
        .await
    }

    /// Full replacement of state rows for the given artifacts: `None` clears
    /// the row, `Some` overwrites every field. Used by tree state copies.
    pub async fn put_many(
        &self,
        user: UserId,
        states: &[(ArtifactId, Option<UserState>)],
    ) -> Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open state transaction")?;
        for (artifact, state) in states {
            if let Some(row) = find_row(&txn, user, *artifact).await? {
                user_states::Entity::delete_by_id(row.id)
                    .exec(&txn)
                    .await
                    .context("Failed to clear user state")?;
            }
            if let Some(state) = state {
                fresh_row(user, *artifact, |active| {
                    active.status = Set(state.status.map(|s| s.as_str().to_string()));
                    active.score = Set(state.score);
                    active.started_at = Set(state.started_at.map(|at| at.to_rfc3339()));
                    active.ended_at = Set(state.ended_at.map(|at| at.to_rfc3339()));
                })
                .insert(&txn)
                .await
                .context("Failed to insert user state")?;
            }
        }
        txn.commit()
            .await
            .context("Failed to commit state transaction")?;
        Ok(())
    }

    /// Everything the user wishlisted in one kind, joined to the artifact
    /// columns the virtual views need.
    pub async fn wishlist_rows(&self, user: UserId, kind: ArtifactKind) -> Result<Vec<WishlistRow>> {
        let state_rows = user_states::Entity::find()
            .filter(user_states::Column::UserId.eq(user.value()))
            .filter(user_states::Column::Status.eq(WatchStatus::Wishlist.as_str()))
            .all(&self.conn)
            .await
            .context("Failed to query wishlist states")?;
        if state_rows.is_empty() {
            return Ok(Vec::new());
        }

        let artifact_ids: Vec<i32> = state_rows.iter().map(|r| r.artifact_id).collect();
        let artifact_rows = artifacts::Entity::find()
            .filter(artifacts::Column::Id.is_in(artifact_ids))
            .filter(artifacts::Column::Kind.eq(kind.as_str()))
            .all(&self.conn)
            .await
            .context("Failed to query wishlist artifacts")?;
        let by_id: HashMap<i32, &artifacts::Model> =
            artifact_rows.iter().map(|row| (row.id, row)).collect();

        let mut rows: Vec<WishlistRow> = state_rows
            .iter()
            .filter_map(|state| {
                by_id.get(&state.artifact_id).map(|artifact| WishlistRow {
                    artifact_id: ArtifactId::new(artifact.id),
                    title: artifact.title.clone(),
                    release_date: artifact.release_date.as_deref().and_then(parse_epoch_ms),
                    started_at: state.started_at.as_deref().and_then(parse_rfc3339),
                })
            })
            .collect();
        rows.sort_by_key(|row| row.artifact_id);
        Ok(rows)
    }

    async fn upsert_field<F>(&self, user: UserId, artifact: ArtifactId, set: F) -> Result<()>
    where
        F: FnOnce(&mut user_states::ActiveModel),
    {
        match find_row(&self.conn, user, artifact).await? {
            Some(row) => {
                let mut active: user_states::ActiveModel = row.into();
                set(&mut active);
                active
                    .update(&self.conn)
                    .await
                    .context("Failed to update user state")?;
            }
            None => {
                let mut active = fresh_row(user, artifact, |_| {});
                set(&mut active);
                active
                    .insert(&self.conn)
                    .await
                    .context("Failed to insert user state")?;
            }
        }
        Ok(())
    }
}

async fn find_row<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    artifact: ArtifactId,
) -> Result<Option<user_states::Model>> {
    user_states::Entity::find()
        .filter(user_states::Column::UserId.eq(user.value()))
        .filter(user_states::Column::ArtifactId.eq(artifact.value()))
        .one(conn)
        .await
        .context("Failed to query user state")
}

fn fresh_row<F>(user: UserId, artifact: ArtifactId, set: F) -> user_states::ActiveModel
where
    F: FnOnce(&mut user_states::ActiveModel),
{
    let mut active = user_states::ActiveModel {
        user_id: Set(user.value()),
        artifact_id: Set(artifact.value()),
        status: Set(None),
        score: Set(None),
        started_at: Set(None),
        ended_at: Set(None),
        ..Default::default()
    };
    set(&mut active);
    active
}

fn state_from_row(row: &user_states::Model) -> UserState {
    UserState {
        status: row.status.as_deref().and_then(|s| s.parse().ok()),
        score: row.score,
        started_at: row.started_at.as_deref().and_then(parse_rfc3339),
        ended_at: row.ended_at.as_deref().and_then(parse_rfc3339),
    }
}
