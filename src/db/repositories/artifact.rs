use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::try_join_all;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::warn;

use crate::constants::limits::MAX_PAGE_SIZE;
use crate::db::repositories::{decode_tags, encode_tags, format_epoch_ms, parse_epoch_ms};
use crate::domain::{ArtifactId, ArtifactKind, RatingSource};
use crate::entities::{
    artifacts, backlog_entries, genre_map, genres, links, ratings, user_states, wishlist_overrides,
};
use crate::models::{ArtifactNode, ExternalLink, NewArtifact, RatingEntry};

/// Row-level access to artifacts and their hydration lookups (genres,
/// ratings, links). Tree assembly lives here too, since it is nothing but
/// recursive row fetching.
pub struct ArtifactRepository {
    conn: DatabaseConnection,
}

impl ArtifactRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, new: &NewArtifact) -> Result<ArtifactId> {
        let model = artifacts::ActiveModel {
            title: Set(new.title.clone()),
            kind: Set(new.kind.as_str().to_string()),
            parent_id: Set(new.parent_id.map(|id| id.value())),
            child_index: Set(new.child_index),
            duration_secs: Set(new.duration_secs),
            release_date: Set(new.release_date.map(format_epoch_ms)),
            description: Set(new.description.clone()),
            tags: Set(encode_tags(&new.tags)),
            added_at: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert artifact")?;

        Ok(ArtifactId::new(model.id))
    }

    pub async fn get(&self, id: ArtifactId) -> Result<Option<artifacts::Model>> {
        artifacts::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query artifact by id")
    }

    /// Direct children in stored order (child index, then id).
    pub async fn children_of(&self, id: ArtifactId) -> Result<Vec<artifacts::Model>> {
        artifacts::Entity::find()
            .filter(artifacts::Column::ParentId.eq(id.value()))
            .order_by_asc(artifacts::Column::ChildIndex)
            .order_by_asc(artifacts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query artifact children")
    }

    /// Paged listing of one kind, optionally filtered by a title substring.
    /// `page` is zero-based.
    pub async fn list(
        &self,
        kind: ArtifactKind,
        page: u64,
        page_size: u64,
        search: Option<&str>,
    ) -> Result<Vec<artifacts::Model>> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let mut query =
            artifacts::Entity::find().filter(artifacts::Column::Kind.eq(kind.as_str()));
        if let Some(needle) = search {
            query = query.filter(artifacts::Column::Title.contains(needle));
        }
        query
            .order_by_asc(artifacts::Column::Title)
            .order_by_asc(artifacts::Column::Id)
            .offset(page * page_size)
            .limit(page_size)
            .all(&self.conn)
            .await
            .context("Failed to list artifacts")
    }

    pub async fn genres_for(&self, id: ArtifactId) -> Result<Vec<String>> {
        let mapped = genre_map::Entity::find()
            .filter(genre_map::Column::ArtifactId.eq(id.value()))
            .all(&self.conn)
            .await
            .context("Failed to query genre map")?;
        if mapped.is_empty() {
            return Ok(Vec::new());
        }
        let genre_ids: Vec<i32> = mapped.iter().map(|m| m.genre_id).collect();
        let mut names: Vec<String> = genres::Entity::find()
            .filter(genres::Column::Id.is_in(genre_ids))
            .all(&self.conn)
            .await
            .context("Failed to query genres")?
            .into_iter()
            .map(|g| g.name)
            .collect();
        names.sort();
        Ok(names)
    }

    pub async fn ratings_for(&self, id: ArtifactId) -> Result<Vec<RatingEntry>> {
        let rows = ratings::Entity::find()
            .filter(ratings::Column::ArtifactId.eq(id.value()))
            .order_by_asc(ratings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query ratings")?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match row.source.parse::<RatingSource>() {
                Ok(source) => entries.push(RatingEntry {
                    source,
                    value: row.value,
                }),
                Err(_) => warn!(
                    "Skipping rating {} with unknown source '{}'",
                    row.id, row.source
                ),
            }
        }
        Ok(entries)
    }

    pub async fn links_for(&self, id: ArtifactId) -> Result<Vec<ExternalLink>> {
        let rows = links::Entity::find()
            .filter(links::Column::ArtifactId.eq(id.value()))
            .order_by_asc(links::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query links")?;
        Ok(rows
            .into_iter()
            .map(|row| ExternalLink {
                url: row.url,
                label: row.label,
            })
            .collect())
    }

    /// Replaces the artifact's genre set, interning unseen genre names.
    pub async fn set_genres(&self, id: ArtifactId, names: &[String]) -> Result<()> {
        genre_map::Entity::delete_many()
            .filter(genre_map::Column::ArtifactId.eq(id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to clear genre map")?;

        for name in names {
            let genre_id = match genres::Entity::find()
                .filter(genres::Column::Name.eq(name.as_str()))
                .one(&self.conn)
                .await
                .context("Failed to query genre by name")?
            {
                Some(existing) => existing.id,
                None => {
                    genres::ActiveModel {
                        name: Set(name.clone()),
                        ..Default::default()
                    }
                    .insert(&self.conn)
                    .await
                    .context("Failed to insert genre")?
                    .id
                }
            };
            genre_map::ActiveModel {
                artifact_id: Set(id.value()),
                genre_id: Set(genre_id),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert genre mapping")?;
        }
        Ok(())
    }

    pub async fn add_rating(
        &self,
        id: ArtifactId,
        source: RatingSource,
        value: Option<f64>,
    ) -> Result<()> {
        ratings::ActiveModel {
            artifact_id: Set(id.value()),
            source: Set(source.as_str().to_string()),
            value: Set(value),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert rating")?;
        Ok(())
    }

    pub async fn add_link(
        &self,
        id: ArtifactId,
        url: String,
        label: Option<String>,
    ) -> Result<()> {
        links::ActiveModel {
            artifact_id: Set(id.value()),
            url: Set(url),
            label: Set(label),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert link")?;
        Ok(())
    }

    /// Loads the full subtree rooted at `id`, hydrated with genres, ratings,
    /// and links. User state is attached separately by the caller.
    pub async fn load_tree(&self, id: ArtifactId) -> Result<Option<ArtifactNode>> {
        match self.get(id).await? {
            Some(row) => Ok(Some(self.build_node(row).await?)),
            None => Ok(None),
        }
    }

    fn build_node(
        &self,
        row: artifacts::Model,
    ) -> Pin<Box<dyn Future<Output = Result<ArtifactNode>> + Send + '_>> {
        Box::pin(async move {
            let id = ArtifactId::new(row.id);
            let mut node = bare_node(&row)?;

            let (genres, ratings, links) = tokio::try_join!(
                self.genres_for(id),
                self.ratings_for(id),
                self.links_for(id)
            )?;
            node.genres = genres;
            node.ratings = ratings;
            node.links = links;

            let child_rows = self.children_of(id).await?;
            node.children =
                try_join_all(child_rows.into_iter().map(|child| self.build_node(child))).await?;
            Ok(node)
        })
    }

    /// Removes the given artifacts and every row referencing them, as one
    /// transaction. The id list is expected to come from the tree's
    /// recursive id collector so descendants go with their parents.
    pub async fn delete_cascade(&self, ids: &[ArtifactId]) -> Result<u64> {
        let raw: Vec<i32> = ids.iter().map(|id| id.value()).collect();
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open delete transaction")?;

        backlog_entries::Entity::delete_many()
            .filter(backlog_entries::Column::ArtifactId.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete backlog entries")?;
        wishlist_overrides::Entity::delete_many()
            .filter(wishlist_overrides::Column::ArtifactId.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete wishlist overrides")?;
        user_states::Entity::delete_many()
            .filter(user_states::Column::ArtifactId.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete user states")?;
        ratings::Entity::delete_many()
            .filter(ratings::Column::ArtifactId.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete ratings")?;
        links::Entity::delete_many()
            .filter(links::Column::ArtifactId.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete links")?;
        genre_map::Entity::delete_many()
            .filter(genre_map::Column::ArtifactId.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete genre mappings")?;
        let deleted = artifacts::Entity::delete_many()
            .filter(artifacts::Column::Id.is_in(raw.iter().copied()))
            .exec(&txn)
            .await
            .context("Failed to delete artifacts")?;

        txn.commit()
            .await
            .context("Failed to commit delete transaction")?;
        Ok(deleted.rows_affected)
    }
}

/// Builds an unhydrated node from an artifact row.
pub fn bare_node(row: &artifacts::Model) -> Result<ArtifactNode> {
    let kind: ArtifactKind = row
        .kind
        .parse()
        .with_context(|| format!("Artifact {} has a corrupt kind column", row.id))?;
    let mut node = ArtifactNode::new(ArtifactId::new(row.id), row.title.clone(), kind);
    node.release_date = row.release_date.as_deref().and_then(parse_epoch_ms);
    node.duration_secs = row.duration_secs;
    node.child_index = row.child_index;
    node.description = row.description.clone();
    node.tags = decode_tags(row.tags.as_deref());
    Ok(node)
}
