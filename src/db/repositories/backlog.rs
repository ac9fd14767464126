use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::warn;

use crate::constants::ranking::DEFAULT_ELO;
use crate::db::repositories::{decode_tags, encode_tags, parse_epoch_ms, parse_rfc3339};
use crate::domain::{ArtifactId, ArtifactKind, BacklogId, RankingStrategy, UserId};
use crate::entities::{artifacts, backlog_entries, backlogs, wishlist_overrides};
use crate::models::{Backlog, BacklogItem};

/// Stored backlogs, their entries, and the per-user override rows feeding
/// the virtual wishlist views.
pub struct BacklogRepository {
    conn: DatabaseConnection,
}

impl BacklogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        user: UserId,
        kind: ArtifactKind,
        title: String,
        strategy: RankingStrategy,
    ) -> Result<Backlog> {
        let row = backlogs::ActiveModel {
            user_id: Set(user.value()),
            kind: Set(kind.as_str().to_string()),
            title: Set(title),
            strategy: Set(strategy.as_str().to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert backlog")?;
        backlog_from_row(&row)
    }

    pub async fn get(&self, id: BacklogId) -> Result<Option<Backlog>> {
        let row = backlogs::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query backlog")?;
        row.as_ref().map(backlog_from_row).transpose()
    }

    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<Backlog>> {
        let rows = backlogs::Entity::find()
            .filter(backlogs::Column::UserId.eq(user.value()))
            .order_by_asc(backlogs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list backlogs")?;
        rows.iter().map(backlog_from_row).collect()
    }

    /// Entry rows joined to the artifact columns the ranking and sort keys
    /// need. Ranks come back zeroed; the ranking engine assigns them.
    pub async fn entries(&self, backlog: BacklogId) -> Result<Vec<BacklogItem>> {
        let entry_rows = backlog_entries::Entity::find()
            .filter(backlog_entries::Column::BacklogId.eq(backlog.value()))
            .order_by_asc(backlog_entries::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query backlog entries")?;
        if entry_rows.is_empty() {
            return Ok(Vec::new());
        }

        let artifact_ids: Vec<i32> = entry_rows.iter().map(|e| e.artifact_id).collect();
        let artifact_rows = artifacts::Entity::find()
            .filter(artifacts::Column::Id.is_in(artifact_ids))
            .all(&self.conn)
            .await
            .context("Failed to query entry artifacts")?;
        let by_id: HashMap<i32, &artifacts::Model> =
            artifact_rows.iter().map(|row| (row.id, row)).collect();

        Ok(entry_rows
            .iter()
            .filter_map(|entry| {
                let Some(artifact) = by_id.get(&entry.artifact_id) else {
                    warn!(
                        "Backlog entry {} references missing artifact {}",
                        entry.id, entry.artifact_id
                    );
                    return None;
                };
                Some(BacklogItem {
                    artifact_id: ArtifactId::new(entry.artifact_id),
                    backlog_id: BacklogId::new(entry.backlog_id),
                    title: artifact.title.clone(),
                    elo: entry.elo,
                    manual_rank: entry.manual_rank,
                    release_date: artifact.release_date.as_deref().and_then(parse_epoch_ms),
                    added_at: parse_rfc3339(&entry.added_at).unwrap_or(DateTime::UNIX_EPOCH),
                    tags: decode_tags(entry.tags.as_deref()),
                    rank: 0,
                })
            })
            .collect())
    }

    pub async fn find_entry(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
    ) -> Result<Option<backlog_entries::Model>> {
        backlog_entries::Entity::find()
            .filter(backlog_entries::Column::BacklogId.eq(backlog.value()))
            .filter(backlog_entries::Column::ArtifactId.eq(artifact.value()))
            .one(&self.conn)
            .await
            .context("Failed to query backlog entry")
    }

    pub async fn add_entry(&self, backlog: BacklogId, artifact: ArtifactId) -> Result<()> {
        backlog_entries::ActiveModel {
            backlog_id: Set(backlog.value()),
            artifact_id: Set(artifact.value()),
            manual_rank: Set(None),
            elo: Set(DEFAULT_ELO),
            added_at: Set(Utc::now().to_rfc3339()),
            tags: Set(None),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert backlog entry")?;
        Ok(())
    }

    pub async fn remove_entry(&self, backlog: BacklogId, artifact: ArtifactId) -> Result<bool> {
        let result = backlog_entries::Entity::delete_many()
            .filter(backlog_entries::Column::BacklogId.eq(backlog.value()))
            .filter(backlog_entries::Column::ArtifactId.eq(artifact.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete backlog entry")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn set_manual_rank(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        rank: Option<i64>,
    ) -> Result<bool> {
        self.update_entry(backlog, artifact, |active| active.manual_rank = Set(rank))
            .await
    }

    pub async fn set_elo(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        elo: f64,
    ) -> Result<bool> {
        self.update_entry(backlog, artifact, |active| active.elo = Set(elo))
            .await
    }

    pub async fn set_entry_tags(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        tags: &[String],
    ) -> Result<bool> {
        let encoded = encode_tags(tags);
        self.update_entry(backlog, artifact, |active| active.tags = Set(encoded))
            .await
    }

    /// Per-artifact Elo overrides for one user's wishlisted artifacts of a
    /// kind. Absent rows (and rows with a null Elo) mean the default.
    pub async fn elo_overrides(
        &self,
        user: UserId,
        kind: ArtifactKind,
    ) -> Result<HashMap<ArtifactId, f64>> {
        let rows = self.override_rows_for_kind(user, kind).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.elo.map(|elo| (ArtifactId::new(row.artifact_id), elo)))
            .collect())
    }

    /// Per-artifact manual-rank overrides, same shape as [`elo_overrides`].
    pub async fn rank_overrides(
        &self,
        user: UserId,
        kind: ArtifactKind,
    ) -> Result<HashMap<ArtifactId, i64>> {
        let rows = self.override_rows_for_kind(user, kind).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.rank.map(|rank| (ArtifactId::new(row.artifact_id), rank)))
            .collect())
    }

    pub async fn set_override_elo(
        &self,
        user: UserId,
        artifact: ArtifactId,
        elo: f64,
    ) -> Result<()> {
        self.upsert_override(user, artifact, |active| active.elo = Set(Some(elo)))
            .await
    }

    pub async fn set_override_rank(
        &self,
        user: UserId,
        artifact: ArtifactId,
        rank: Option<i64>,
    ) -> Result<()> {
        self.upsert_override(user, artifact, |active| active.rank = Set(rank))
            .await
    }

    async fn update_entry<F>(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        set: F,
    ) -> Result<bool>
    where
        F: FnOnce(&mut backlog_entries::ActiveModel),
    {
        match self.find_entry(backlog, artifact).await? {
            Some(row) => {
                let mut active: backlog_entries::ActiveModel = row.into();
                set(&mut active);
                active
                    .update(&self.conn)
                    .await
                    .context("Failed to update backlog entry")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn override_rows_for_kind(
        &self,
        user: UserId,
        kind: ArtifactKind,
    ) -> Result<Vec<wishlist_overrides::Model>> {
        let rows = wishlist_overrides::Entity::find()
            .filter(wishlist_overrides::Column::UserId.eq(user.value()))
            .all(&self.conn)
            .await
            .context("Failed to query wishlist overrides")?;
        if rows.is_empty() {
            return Ok(rows);
        }

        let artifact_ids: Vec<i32> = rows.iter().map(|r| r.artifact_id).collect();
        let matching: std::collections::HashSet<i32> = artifacts::Entity::find()
            .filter(artifacts::Column::Id.is_in(artifact_ids))
            .filter(artifacts::Column::Kind.eq(kind.as_str()))
            .all(&self.conn)
            .await
            .context("Failed to query override artifacts")?
            .into_iter()
            .map(|row| row.id)
            .collect();

        Ok(rows
            .into_iter()
            .filter(|row| matching.contains(&row.artifact_id))
            .collect())
    }

    async fn upsert_override<F>(&self, user: UserId, artifact: ArtifactId, set: F) -> Result<()>
    where
        F: FnOnce(&mut wishlist_overrides::ActiveModel),
    {
        let existing = wishlist_overrides::Entity::find()
            .filter(wishlist_overrides::Column::UserId.eq(user.value()))
            .filter(wishlist_overrides::Column::ArtifactId.eq(artifact.value()))
            .one(&self.conn)
            .await
            .context("Failed to query wishlist override")?;

        match existing {
            Some(row) => {
                let mut active: wishlist_overrides::ActiveModel = row.into();
                set(&mut active);
                active
                    .update(&self.conn)
                    .await
                    .context("Failed to update wishlist override")?;
            }
            None => {
                let mut active = wishlist_overrides::ActiveModel {
                    user_id: Set(user.value()),
                    artifact_id: Set(artifact.value()),
                    elo: Set(None),
                    rank: Set(None),
                    ..Default::default()
                };
                set(&mut active);
                active
                    .insert(&self.conn)
                    .await
                    .context("Failed to insert wishlist override")?;
            }
        }
        Ok(())
    }
}

fn backlog_from_row(row: &backlogs::Model) -> Result<Backlog> {
    Ok(Backlog {
        id: BacklogId::new(row.id),
        user_id: UserId::new(row.user_id),
        kind: row
            .kind
            .parse()
            .with_context(|| format!("Backlog {} has a corrupt kind column", row.id))?,
        title: row.title.clone(),
        strategy: row
            .strategy
            .parse()
            .with_context(|| format!("Backlog {} has a corrupt strategy column", row.id))?,
    })
}
