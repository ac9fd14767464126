//! `SeaORM` implementation of the `BacklogService` trait.

use std::sync::Arc;

use chrono::Utc;

use crate::config::RankingConfig;
use crate::constants::ranking::DEFAULT_ELO;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::domain::{ArtifactId, ArtifactKind, BacklogId, RankingStrategy, SortKey, UserId};
use crate::models::{Backlog, BacklogItem};
use crate::ranking::wishlist::{upcoming_view, wishlist_view};
use crate::ranking::{assign_ranks, duel, sort_items};
use crate::services::backlog_service::{BacklogError, BacklogService};

/// SeaORM-based implementation of [`BacklogService`].
///
/// All ordering happens in memory over rows fetched up front; each call is
/// a snapshot read, so concurrent mutations from other requests are never
/// observed mid-computation.
pub struct SeaOrmBacklogService {
    store: Arc<Store>,
    ranking: RankingConfig,
    event_bus: tokio::sync::broadcast::Sender<NotificationEvent>,
}

impl SeaOrmBacklogService {
    #[must_use]
    pub const fn new(
        store: Arc<Store>,
        ranking: RankingConfig,
        event_bus: tokio::sync::broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            ranking,
            event_bus,
        }
    }

    fn emit(&self, event: NotificationEvent) {
        let _ = self.event_bus.send(event);
    }

    async fn require_backlog(&self, id: BacklogId) -> Result<Backlog, BacklogError> {
        if id.is_virtual() {
            // The virtual views are not stored backlogs and are reachable
            // only through wishlist()/upcoming().
            return Err(BacklogError::NotFound(id));
        }
        self.store
            .backlogs()
            .get(id)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?
            .ok_or(BacklogError::NotFound(id))
    }

    async fn require_artifact_kind(
        &self,
        artifact: ArtifactId,
    ) -> Result<ArtifactKind, BacklogError> {
        let row = self
            .store
            .artifacts()
            .get(artifact)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?
            .ok_or(BacklogError::ArtifactNotFound(artifact))?;
        row.kind
            .parse()
            .map_err(|_| BacklogError::InvalidData(format!(
                "artifact {artifact} has a corrupt kind column"
            )))
    }

    fn require_root_kind(kind: ArtifactKind) -> Result<(), BacklogError> {
        if kind.is_root_kind() {
            Ok(())
        } else {
            Err(BacklogError::InvalidData(format!(
                "{kind} artifacts cannot be tracked directly, only their parents"
            )))
        }
    }
}

#[async_trait::async_trait]
impl BacklogService for SeaOrmBacklogService {
    async fn create_backlog(
        &self,
        user: UserId,
        kind: ArtifactKind,
        title: String,
        strategy: RankingStrategy,
    ) -> Result<Backlog, BacklogError> {
        Self::require_root_kind(kind)?;
        self.store
            .users()
            .get_by_id(user)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?
            .ok_or(BacklogError::UserNotFound(user))?;

        let backlog = self
            .store
            .backlogs()
            .create(user, kind, title, strategy)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;

        self.emit(NotificationEvent::BacklogCreated {
            backlog_id: backlog.id,
            title: backlog.title.clone(),
        });
        Ok(backlog)
    }

    async fn list_backlogs(&self, user: UserId) -> Result<Vec<Backlog>, BacklogError> {
        self.store
            .backlogs()
            .list_for_user(user)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))
    }

    async fn ordered_entries(
        &self,
        backlog: BacklogId,
        sort: Option<SortKey>,
    ) -> Result<Vec<BacklogItem>, BacklogError> {
        let header = self.require_backlog(backlog).await?;
        let mut items = self
            .store
            .backlogs()
            .entries(backlog)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;

        assign_ranks(&mut items, header.strategy);
        sort_items(&mut items, sort.unwrap_or_default());
        Ok(items)
    }

    async fn add_entry(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
    ) -> Result<(), BacklogError> {
        let header = self.require_backlog(backlog).await?;
        let kind = self.require_artifact_kind(artifact).await?;
        if kind != header.kind {
            return Err(BacklogError::KindMismatch {
                backlog,
                expected: header.kind,
                found: kind,
            });
        }

        let existing = self
            .store
            .backlogs()
            .find_entry(backlog, artifact)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(BacklogError::InvalidData(format!(
                "artifact {artifact} is already in backlog {backlog}"
            )));
        }

        self.store
            .backlogs()
            .add_entry(backlog, artifact)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;

        self.emit(NotificationEvent::EntryAdded {
            backlog_id: backlog,
            artifact_id: artifact,
        });
        Ok(())
    }

    async fn remove_entry(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
    ) -> Result<(), BacklogError> {
        self.require_backlog(backlog).await?;
        let removed = self
            .store
            .backlogs()
            .remove_entry(backlog, artifact)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        if !removed {
            return Err(BacklogError::EntryNotFound { backlog, artifact });
        }

        self.emit(NotificationEvent::EntryRemoved {
            backlog_id: backlog,
            artifact_id: artifact,
        });
        Ok(())
    }

    async fn set_entry_rank(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        rank: Option<i64>,
    ) -> Result<(), BacklogError> {
        self.require_backlog(backlog).await?;
        let updated = self
            .store
            .backlogs()
            .set_manual_rank(backlog, artifact, rank)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        if updated {
            Ok(())
        } else {
            Err(BacklogError::EntryNotFound { backlog, artifact })
        }
    }

    async fn set_entry_tags(
        &self,
        backlog: BacklogId,
        artifact: ArtifactId,
        tags: Vec<String>,
    ) -> Result<(), BacklogError> {
        self.require_backlog(backlog).await?;
        let updated = self
            .store
            .backlogs()
            .set_entry_tags(backlog, artifact, &tags)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        if updated {
            Ok(())
        } else {
            Err(BacklogError::EntryNotFound { backlog, artifact })
        }
    }

    async fn record_duel(
        &self,
        backlog: BacklogId,
        winner: ArtifactId,
        loser: ArtifactId,
    ) -> Result<(f64, f64), BacklogError> {
        if winner == loser {
            return Err(BacklogError::InvalidData(
                "an artifact cannot duel itself".to_string(),
            ));
        }
        self.require_backlog(backlog).await?;

        let repo = self.store.backlogs();
        let winner_entry = repo
            .find_entry(backlog, winner)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?
            .ok_or(BacklogError::EntryNotFound {
                backlog,
                artifact: winner,
            })?;
        let loser_entry = repo
            .find_entry(backlog, loser)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?
            .ok_or(BacklogError::EntryNotFound {
                backlog,
                artifact: loser,
            })?;

        let (new_winner, new_loser) =
            duel(winner_entry.elo, loser_entry.elo, self.ranking.k_factor);
        repo.set_elo(backlog, winner, new_winner)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        repo.set_elo(backlog, loser, new_loser)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;

        self.emit(NotificationEvent::DuelRecorded {
            backlog_id: backlog,
            winner,
            loser,
        });
        Ok((new_winner, new_loser))
    }

    async fn wishlist(
        &self,
        user: UserId,
        kind: ArtifactKind,
        sort: Option<SortKey>,
    ) -> Result<Vec<BacklogItem>, BacklogError> {
        Self::require_root_kind(kind)?;

        let states = self.store.states();
        let backlogs = self.store.backlogs();
        let (rows, elo_overrides, rank_overrides) = tokio::try_join!(
            states.wishlist_rows(user, kind),
            backlogs.elo_overrides(user, kind),
            backlogs.rank_overrides(user, kind),
        )
        .map_err(|e| BacklogError::Database(e.to_string()))?;

        Ok(wishlist_view(
            &rows,
            &elo_overrides,
            &rank_overrides,
            Utc::now(),
            sort.unwrap_or(SortKey::Elo),
        ))
    }

    async fn upcoming(
        &self,
        user: UserId,
        kind: ArtifactKind,
    ) -> Result<Vec<BacklogItem>, BacklogError> {
        Self::require_root_kind(kind)?;
        let rows = self
            .store
            .states()
            .wishlist_rows(user, kind)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        Ok(upcoming_view(&rows, Utc::now()))
    }

    async fn set_wishlist_rank(
        &self,
        user: UserId,
        artifact: ArtifactId,
        rank: Option<i64>,
    ) -> Result<(), BacklogError> {
        self.require_artifact_kind(artifact).await?;
        self.store
            .backlogs()
            .set_override_rank(user, artifact, rank)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))
    }

    async fn record_wishlist_duel(
        &self,
        user: UserId,
        kind: ArtifactKind,
        winner: ArtifactId,
        loser: ArtifactId,
    ) -> Result<(f64, f64), BacklogError> {
        if winner == loser {
            return Err(BacklogError::InvalidData(
                "an artifact cannot duel itself".to_string(),
            ));
        }
        Self::require_root_kind(kind)?;
        self.require_artifact_kind(winner).await?;
        self.require_artifact_kind(loser).await?;

        let repo = self.store.backlogs();
        let overrides = repo
            .elo_overrides(user, kind)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        let winner_elo = overrides.get(&winner).copied().unwrap_or(DEFAULT_ELO);
        let loser_elo = overrides.get(&loser).copied().unwrap_or(DEFAULT_ELO);

        let (new_winner, new_loser) = duel(winner_elo, loser_elo, self.ranking.k_factor);
        repo.set_override_elo(user, winner, new_winner)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;
        repo.set_override_elo(user, loser, new_loser)
            .await
            .map_err(|e| BacklogError::Database(e.to_string()))?;

        self.emit(NotificationEvent::DuelRecorded {
            backlog_id: BacklogId::WISHLIST,
            winner,
            loser,
        });
        Ok((new_winner, new_loser))
    }
}
