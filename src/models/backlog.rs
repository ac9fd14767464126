//! Backlog records: the stored collection header and the flat entry record
//! the ranking engine operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ranking::UNRANKED_RANK;
use crate::domain::{ArtifactId, ArtifactKind, BacklogId, RankingStrategy, UserId};

/// A user-owned, explicitly ordered collection of artifact references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlog {
    pub id: BacklogId,
    pub user_id: UserId,
    pub kind: ArtifactKind,
    pub title: String,
    pub strategy: RankingStrategy,
}

/// One ranked row of a backlog view.
///
/// A relation, not an artifact: it references an artifact id and carries the
/// per-entry ranking state (manual rank, Elo, date added, entry-scoped tags)
/// plus the artifact columns the sort keys need. `rank` is computed by the
/// ranking engine, 1-based, with [`UNRANKED_RANK`] as the unranked sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogItem {
    pub artifact_id: ArtifactId,
    pub backlog_id: BacklogId,
    pub title: String,
    pub elo: f64,
    pub manual_rank: Option<i64>,
    pub release_date: Option<DateTime<Utc>>,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rank: i64,
}

impl BacklogItem {
    /// The manual rank, or the sentinel that orders unranked entries after
    /// every ranked one.
    #[must_use]
    pub fn effective_rank(&self) -> i64 {
        self.manual_rank.unwrap_or(UNRANKED_RANK)
    }
}
