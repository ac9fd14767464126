//! The ranking engine.
//!
//! Operates on flat [`BacklogItem`] records, independent of the artifact
//! tree: a strategy seeds the 1-based `rank` field, and already-ranked
//! records can then be re-sorted by any display key without recomputing
//! ranks. Every ordering here is total: ties fall through to date added and
//! finally to artifact id, so repeated calls over the same records yield the
//! same sequence.

pub mod wishlist;

use std::cmp::Ordering;

use crate::domain::{RankingStrategy, SortKey};
use crate::models::BacklogItem;

/// Assigns 1-based ranks under the chosen strategy and leaves the slice
/// sorted in that strategy's natural order.
///
/// - `Rank`: rank is the stored manual rank; unranked entries take the
///   sentinel and order after all ranked items, by date added among
///   themselves.
/// - `Elo`: standard competition ranking over Elo descending (ties share a
///   rank, the next distinct value skips accordingly).
/// - `Wishlist`: competition ranking over release date ascending; missing
///   release dates sort last.
pub fn assign_ranks(items: &mut [BacklogItem], strategy: RankingStrategy) {
    match strategy {
        RankingStrategy::Rank => {
            items.sort_by(|a, b| {
                a.effective_rank()
                    .cmp(&b.effective_rank())
                    .then_with(|| a.added_at.cmp(&b.added_at))
                    .then_with(|| a.artifact_id.cmp(&b.artifact_id))
            });
            for item in items {
                item.rank = item.effective_rank();
            }
        }
        RankingStrategy::Elo => {
            items.sort_by(|a, b| {
                b.elo
                    .total_cmp(&a.elo)
                    .then_with(|| a.added_at.cmp(&b.added_at))
                    .then_with(|| a.artifact_id.cmp(&b.artifact_id))
            });
            competition_ranks(items, |item| item.elo.to_bits());
        }
        RankingStrategy::Wishlist => {
            items.sort_by(|a, b| {
                cmp_option_asc(a.release_date, b.release_date)
                    .then_with(|| a.added_at.cmp(&b.added_at))
                    .then_with(|| a.artifact_id.cmp(&b.artifact_id))
            });
            competition_ranks(items, |item| item.release_date);
        }
    }
}

/// Re-sorts already-ranked records by a display key. Ranks are not
/// recomputed; callers that need fresh ranks go through [`assign_ranks`].
///
/// The default key is `Rank`: rank ascending, ties by date added ascending.
pub fn sort_items(items: &mut [BacklogItem], key: SortKey) {
    match key {
        SortKey::Rank => items.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then_with(|| a.added_at.cmp(&b.added_at))
                .then_with(|| a.artifact_id.cmp(&b.artifact_id))
        }),
        SortKey::Elo => items.sort_by(|a, b| {
            b.elo
                .total_cmp(&a.elo)
                .then_with(|| a.added_at.cmp(&b.added_at))
                .then_with(|| a.artifact_id.cmp(&b.artifact_id))
        }),
        SortKey::DateAdded => items.sort_by(|a, b| {
            a.added_at
                .cmp(&b.added_at)
                .then_with(|| a.artifact_id.cmp(&b.artifact_id))
        }),
        SortKey::DateRelease => items.sort_by(|a, b| {
            cmp_option_asc(a.release_date, b.release_date)
                .then_with(|| a.added_at.cmp(&b.added_at))
                .then_with(|| a.artifact_id.cmp(&b.artifact_id))
        }),
    }
}

/// Standard competition ranking over an already-sorted slice: tied key
/// values share a rank and the next distinct value skips the tied count.
fn competition_ranks<K, F>(items: &mut [BacklogItem], key: F)
where
    K: PartialEq,
    F: Fn(&BacklogItem) -> K,
{
    let mut prev_key: Option<K> = None;
    let mut prev_rank = 0_i64;
    for index in 0..items.len() {
        let current = key(&items[index]);
        #[allow(clippy::cast_possible_wrap)]
        let rank = match &prev_key {
            Some(prev) if *prev == current => prev_rank,
            _ => index as i64 + 1,
        };
        items[index].rank = rank;
        prev_rank = rank;
        prev_key = Some(current);
    }
}

/// Ascending compare with `None` ordered last.
fn cmp_option_asc<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Elo duel update with the standard logistic expected score.
///
/// Returns the updated `(winner, loser)` ratings. The transfer is symmetric,
/// so the rating pool is conserved.
#[must_use]
pub fn duel(winner: f64, loser: f64, k: f64) -> (f64, f64) {
    let expected = 1.0 / (1.0 + 10_f64.powf((loser - winner) / 400.0));
    let delta = k * (1.0 - expected);
    (winner + delta, loser - delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ranking::{DEFAULT_ELO, ELO_K_FACTOR, UNRANKED_RANK};
    use crate::domain::{ArtifactId, BacklogId};
    use chrono::{TimeZone, Utc};

    fn item(id: i32, elo: f64, manual_rank: Option<i64>, added_day: u32) -> BacklogItem {
        BacklogItem {
            artifact_id: ArtifactId::new(id),
            backlog_id: BacklogId::new(1),
            title: format!("item {id}"),
            elo,
            manual_rank,
            release_date: None,
            added_at: Utc.with_ymd_and_hms(2025, 6, added_day, 0, 0, 0).unwrap(),
            tags: Vec::new(),
            rank: 0,
        }
    }

    #[test]
    fn elo_strategy_uses_competition_ranking() {
        let mut items = vec![
            item(1, 1400.0, None, 1),
            item(2, 1600.0, None, 2),
            item(3, 1400.0, None, 3),
            item(4, 1200.0, None, 4),
        ];
        assign_ranks(&mut items, RankingStrategy::Elo);

        let ranks: Vec<i64> = items.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4]);
        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![2, 1, 3, 4]);
    }

    #[test]
    fn rank_strategy_sorts_unranked_last_by_date_added() {
        let mut items = vec![
            item(1, DEFAULT_ELO, None, 20),
            item(2, DEFAULT_ELO, Some(2), 1),
            item(3, DEFAULT_ELO, None, 5),
            item(4, DEFAULT_ELO, Some(1), 9),
        ];
        assign_ranks(&mut items, RankingStrategy::Rank);

        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
        assert_eq!(items[0].rank, 1);
        assert_eq!(items[1].rank, 2);
        assert_eq!(items[2].rank, UNRANKED_RANK);
        assert_eq!(items[3].rank, UNRANKED_RANK);
    }

    #[test]
    fn wishlist_strategy_ranks_by_release_ascending() {
        let release = |day| Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap());
        let mut items = vec![
            item(1, DEFAULT_ELO, None, 1),
            item(2, DEFAULT_ELO, None, 1),
            item(3, DEFAULT_ELO, None, 1),
        ];
        items[0].release_date = release(9);
        items[1].release_date = release(3);
        items[2].release_date = release(3);
        assign_ranks(&mut items, RankingStrategy::Wishlist);

        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![2, 3, 1]);
        let ranks: Vec<i64> = items.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn sort_keys_reorder_without_touching_ranks() {
        let mut items = vec![
            item(1, 1500.0, Some(2), 3),
            item(2, 1300.0, Some(1), 1),
        ];
        assign_ranks(&mut items, RankingStrategy::Rank);
        let ranks_before: Vec<i64> = items.iter().map(|i| i.rank).collect();

        sort_items(&mut items, SortKey::Elo);
        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![1, 2]);
        let mut ranks_after: Vec<i64> = items.iter().map(|i| i.rank).collect();
        ranks_after.sort_unstable();
        assert_eq!(ranks_before, ranks_after);

        sort_items(&mut items, SortKey::DateAdded);
        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![2, 1]);

        sort_items(&mut items, SortKey::Rank);
        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn release_sort_orders_missing_dates_last() {
        let mut items = vec![item(1, DEFAULT_ELO, None, 1), item(2, DEFAULT_ELO, None, 2)];
        items[1].release_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        sort_items(&mut items, SortKey::DateRelease);
        let order: Vec<i32> = items.iter().map(|i| i.artifact_id.value()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn duel_transfers_rating_symmetrically() {
        let (winner, loser) = duel(DEFAULT_ELO, DEFAULT_ELO, ELO_K_FACTOR);
        assert!((winner - 1216.0).abs() < 1e-9);
        assert!((loser - 1184.0).abs() < 1e-9);
        assert!(((winner + loser) - 2.0 * DEFAULT_ELO).abs() < 1e-9);

        // An upset moves more points than a favorite win.
        let (underdog, favorite) = duel(1200.0, 1400.0, ELO_K_FACTOR);
        assert!(underdog - 1200.0 > 16.0);
        assert!((underdog + favorite - 2600.0).abs() < 1e-9);
    }
}
