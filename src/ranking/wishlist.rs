//! Virtual backlog resolution.
//!
//! The wishlist and future-releases views are never stored as entry lists:
//! they are rebuilt on every request from per-user wishlist statuses and the
//! per-user Elo/rank override tables. Both builders are pure over rows
//! already fetched from the store, with `now` passed in so each invocation
//! is a snapshot read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::constants::ranking::DEFAULT_ELO;
use crate::domain::{ArtifactId, BacklogId, RankingStrategy, SortKey};
use crate::models::BacklogItem;
use crate::ranking::{assign_ranks, sort_items};

/// One artifact a user marked `wishlist`, joined to the artifact columns the
/// views need. `started_at` is the wishlist entry's start date and doubles
/// as "date added" for the virtual views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistRow {
    pub artifact_id: ArtifactId,
    pub title: String,
    pub release_date: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Builds the wishlist view: every wishlist-status artifact already released
/// at `now`, Elo taken from the per-user override map (default 1200), ranked
/// with the Elo strategy and then ordered by the requested display key.
///
/// Manual-rank ordering uses the per-user rank override map; entries with
/// equal ranks (including the shared unranked sentinel) fall back to Elo
/// descending. Every entry is tagged with the reserved
/// [`BacklogId::WISHLIST`]. Rows with no release date are not "already
/// released" and are excluded.
#[must_use]
pub fn wishlist_view(
    rows: &[WishlistRow],
    elo_overrides: &HashMap<ArtifactId, f64>,
    rank_overrides: &HashMap<ArtifactId, i64>,
    now: DateTime<Utc>,
    sort: SortKey,
) -> Vec<BacklogItem> {
    let mut items: Vec<BacklogItem> = rows
        .iter()
        .filter(|row| row.release_date.is_some_and(|date| date <= now))
        .map(|row| BacklogItem {
            artifact_id: row.artifact_id,
            backlog_id: BacklogId::WISHLIST,
            title: row.title.clone(),
            elo: elo_overrides
                .get(&row.artifact_id)
                .copied()
                .unwrap_or(DEFAULT_ELO),
            manual_rank: rank_overrides.get(&row.artifact_id).copied(),
            release_date: row.release_date,
            added_at: row.started_at.unwrap_or(DateTime::UNIX_EPOCH),
            tags: Vec::new(),
            rank: 0,
        })
        .collect();

    assign_ranks(&mut items, RankingStrategy::Elo);

    match sort {
        // Already in Elo order from rank assignment.
        SortKey::Elo => {}
        SortKey::Rank => {
            items.sort_by(|a, b| {
                a.effective_rank()
                    .cmp(&b.effective_rank())
                    .then_with(|| b.elo.total_cmp(&a.elo))
                    .then_with(|| a.artifact_id.cmp(&b.artifact_id))
            });
        }
        SortKey::DateAdded | SortKey::DateRelease => sort_items(&mut items, sort),
    }

    items
}

/// Builds the future-releases view: every wishlist-status artifact whose
/// release date is strictly after `now`, ordered by release date alone with
/// sequential (not competition) ranks. No real ranking applies to unreleased
/// items, so Elo is fixed at the default and entries are tagged with the
/// reserved [`BacklogId::UPCOMING`].
#[must_use]
pub fn upcoming_view(rows: &[WishlistRow], now: DateTime<Utc>) -> Vec<BacklogItem> {
    let mut upcoming: Vec<&WishlistRow> = rows
        .iter()
        .filter(|row| row.release_date.is_some_and(|date| date > now))
        .collect();
    upcoming.sort_by(|a, b| {
        a.release_date
            .cmp(&b.release_date)
            .then_with(|| a.artifact_id.cmp(&b.artifact_id))
    });

    upcoming
        .into_iter()
        .enumerate()
        .map(|(index, row)| BacklogItem {
            artifact_id: row.artifact_id,
            backlog_id: BacklogId::UPCOMING,
            title: row.title.clone(),
            elo: DEFAULT_ELO,
            manual_rank: None,
            release_date: row.release_date,
            added_at: row.started_at.unwrap_or(DateTime::UNIX_EPOCH),
            tags: Vec::new(),
            #[allow(clippy::cast_possible_wrap)]
            rank: index as i64 + 1,
        })
        .collect()
}
