//! The composite artifact tree.
//!
//! An [`ArtifactNode`] exclusively owns its ordered children, so the
//! structure is a tree, never a graph: the parent relation is passed in as
//! context where numbering needs it instead of being stored as a
//! back-pointer. All computed properties (mean rating, progress) are plain
//! idempotent functions over the current state, with no hidden caches.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ArtifactId, ArtifactKind, WatchStatus};
use crate::models::progress;
use crate::models::rating::{self, RatingEntry};

/// Contract violations in tree operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A child-sequence operation was invoked on a kind without one.
    #[error("operation not supported for artifact kind: {kind}")]
    UnsupportedOperation { kind: ArtifactKind },

    /// User-state copy between trees whose root ids differ.
    #[error("tree shape mismatch: expected root {expected}, found {found}")]
    ShapeMismatch {
        expected: ArtifactId,
        found: ArtifactId,
    },
}

/// Per-user progress and rating state attached to a node.
///
/// Created lazily the first time any mutator touches a node with no existing
/// state; never deleted except by cascading artifact deletion. The score
/// range is unbounded here, validation is an external concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub status: Option<WatchStatus>,
    pub score: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// An external URL attached to an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub url: String,
    pub label: Option<String>,
}

/// The last finished and next unfinished child of a sequence container.
#[derive(Debug, Clone, Copy)]
pub struct OngoingProgress<'a> {
    pub last: Option<&'a ArtifactNode>,
    pub next: Option<&'a ArtifactNode>,
}

/// Input record for registering a new artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtifact {
    pub title: String,
    pub kind: ArtifactKind,
    pub parent_id: Option<ArtifactId>,
    pub child_index: Option<i32>,
    pub release_date: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One node of the artifact tree.
///
/// The kind determines the legal child shape (seasons under shows, episodes
/// under seasons and anime, nothing under movies, games, and episodes);
/// violating that shape is a caller error, not a runtime-checked constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactNode {
    pub id: ArtifactId,
    pub title: String,
    pub kind: ArtifactKind,
    pub release_date: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
    /// 1-based position among siblings; `None` means unnumbered.
    pub child_index: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<ArtifactNode>,
    #[serde(default)]
    pub links: Vec<ExternalLink>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub ratings: Vec<RatingEntry>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub user_state: Option<UserState>,
}

impl ArtifactNode {
    /// Creates a bare node with no children or per-user state.
    #[must_use]
    pub fn new(id: ArtifactId, title: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            release_date: None,
            duration_secs: None,
            child_index: None,
            description: None,
            children: Vec::new(),
            links: Vec::new(),
            genres: Vec::new(),
            ratings: Vec::new(),
            tags: Vec::new(),
            user_state: None,
        }
    }

    /// The user's status on this node, if any state exists.
    #[must_use]
    pub fn status(&self) -> Option<WatchStatus> {
        self.user_state.as_ref().and_then(|s| s.status)
    }

    /// Mean rating under this kind's aggregation policy, `None` when the
    /// kind does not aggregate or no rating value exists.
    #[must_use]
    pub fn mean_rating(&self) -> Option<f64> {
        rating::mean_rating(self.kind, &self.ratings)
    }

    /// Last finished and next unfinished child of this node's sequence.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnsupportedOperation`] for kinds without a child
    /// sequence (movies, games, episodes). Never silently defaults.
    pub fn progress(&self) -> Result<OngoingProgress<'_>, TreeError> {
        if !self.kind.is_sequence_container() {
            return Err(TreeError::UnsupportedOperation { kind: self.kind });
        }
        let scan = progress::scan(self.children.iter().map(ArtifactNode::status));
        Ok(OngoingProgress {
            last: scan.last.map(|i| &self.children[i]),
            next: scan.next.map(|i| &self.children[i]),
        })
    }

    /// Collects this node's id and every descendant id, depth-first.
    #[must_use]
    pub fn collect_ids(&self) -> Vec<ArtifactId> {
        let mut ids = Vec::new();
        self.collect_ids_into(&mut ids);
        ids
    }

    fn collect_ids_into(&self, ids: &mut Vec<ArtifactId>) {
        ids.push(self.id);
        for child in &self.children {
            child.collect_ids_into(ids);
        }
    }

    /// Depth-first lookup returning the first node with the given id.
    #[must_use]
    pub fn find(&self, id: ArtifactId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, id: ArtifactId) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Replaces every node's user state from a lookup table keyed by id.
    ///
    /// Nodes absent from the table have their state cleared; this is a full
    /// replacement, not a merge.
    pub fn attach_user_states(&mut self, states: &HashMap<ArtifactId, UserState>) {
        self.user_state = states.get(&self.id).cloned();
        for child in &mut self.children {
            child.attach_user_states(states);
        }
    }

    /// Copies user state from a same-shaped source tree, matched by id.
    ///
    /// Nodes with no counterpart in the source are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ShapeMismatch`] when the root ids differ.
    pub fn copy_user_states_from(&mut self, source: &Self) -> Result<(), TreeError> {
        if self.id != source.id {
            return Err(TreeError::ShapeMismatch {
                expected: self.id,
                found: source.id,
            });
        }
        let mut by_id = HashMap::new();
        source.index_states_into(&mut by_id);
        self.overwrite_states_from(&by_id);
        Ok(())
    }

    fn index_states_into<'a>(&'a self, by_id: &mut HashMap<ArtifactId, &'a Option<UserState>>) {
        by_id.insert(self.id, &self.user_state);
        for child in &self.children {
            child.index_states_into(by_id);
        }
    }

    fn overwrite_states_from(&mut self, by_id: &HashMap<ArtifactId, &Option<UserState>>) {
        if let Some(state) = by_id.get(&self.id) {
            self.user_state = (*state).clone();
        }
        for child in &mut self.children {
            child.overwrite_states_from(by_id);
        }
    }

    /// Snapshot of every node's user state, depth-first, for persisting a
    /// whole tree's states in one pass.
    #[must_use]
    pub fn collect_user_states(&self) -> Vec<(ArtifactId, Option<UserState>)> {
        let mut states = Vec::new();
        self.collect_user_states_into(&mut states);
        states
    }

    fn collect_user_states_into(&self, states: &mut Vec<(ArtifactId, Option<UserState>)>) {
        states.push((self.id, self.user_state.clone()));
        for child in &self.children {
            child.collect_user_states_into(states);
        }
    }

    /// Updates the user status, cascading to every descendant **only** when
    /// the new status is `finished`. Any other status touches this node
    /// alone. Returns the number of nodes touched.
    pub fn set_status(&mut self, status: WatchStatus) -> usize {
        self.state_mut().status = Some(status);
        let mut touched = 1;
        if status == WatchStatus::Finished {
            for child in &mut self.children {
                touched += child.set_status(WatchStatus::Finished);
            }
        }
        touched
    }

    /// Sets the user score, creating state with the other fields null when
    /// none exists yet.
    pub fn set_score(&mut self, score: f64) {
        self.state_mut().score = Some(score);
    }

    /// Sets the start date, creating state lazily.
    pub fn set_started_at(&mut self, at: DateTime<Utc>) {
        self.state_mut().started_at = Some(at);
    }

    /// Sets the end date, creating state lazily.
    pub fn set_ended_at(&mut self, at: DateTime<Utc>) {
        self.state_mut().ended_at = Some(at);
    }

    fn state_mut(&mut self) -> &mut UserState {
        self.user_state.get_or_insert_with(UserState::default)
    }

    /// Display numbering derived from tree position.
    ///
    /// Episodes render as `E<2-digit index>`, prefixed by the parent
    /// season's `S<2-digit index>` when the parent is a numbered season;
    /// seasons render as `S<2-digit index>`. A `None` index means no
    /// numbering, as do kinds without sequence positions.
    #[must_use]
    pub fn sequence_label(&self, parent: Option<&Self>) -> Option<String> {
        match self.kind {
            ArtifactKind::TvshowEpisode | ArtifactKind::AnimeEpisode => {
                let episode = self.child_index?;
                let season = parent
                    .filter(|p| p.kind == ArtifactKind::TvshowSeason)
                    .and_then(|p| p.child_index);
                Some(match season {
                    Some(season) => format!("S{season:02}E{episode:02}"),
                    None => format!("E{episode:02}"),
                })
            }
            ArtifactKind::TvshowSeason => self.child_index.map(|s| format!("S{s:02}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatingSource;

    fn episode(id: i32, index: i32) -> ArtifactNode {
        let mut node = ArtifactNode::new(
            ArtifactId::new(id),
            format!("Episode {index}"),
            ArtifactKind::TvshowEpisode,
        );
        node.child_index = Some(index);
        node
    }

    fn season(id: i32, index: i32, episodes: Vec<ArtifactNode>) -> ArtifactNode {
        let mut node = ArtifactNode::new(
            ArtifactId::new(id),
            format!("Season {index}"),
            ArtifactKind::TvshowSeason,
        );
        node.child_index = Some(index);
        node.children = episodes;
        node
    }

    fn show() -> ArtifactNode {
        let mut node = ArtifactNode::new(ArtifactId::new(1), "Show", ArtifactKind::Tvshow);
        node.children = vec![
            season(2, 1, vec![episode(4, 1), episode(5, 2)]),
            season(3, 2, vec![episode(6, 1), episode(7, 2)]),
        ];
        node
    }

    #[test]
    fn collect_ids_is_depth_first() {
        let ids: Vec<i32> = show().collect_ids().iter().map(|i| i.value()).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 3, 6, 7]);
    }

    #[test]
    fn find_returns_first_match() {
        let tree = show();
        assert_eq!(tree.find(ArtifactId::new(6)).unwrap().title, "Episode 1");
        assert!(tree.find(ArtifactId::new(99)).is_none());
    }

    #[test]
    fn finished_cascades_to_all_descendants() {
        let mut tree = show();
        let touched = tree.set_status(WatchStatus::Finished);
        assert_eq!(touched, 7);
        for id in tree.collect_ids() {
            assert_eq!(tree.find(id).unwrap().status(), Some(WatchStatus::Finished));
        }
    }

    #[test]
    fn other_statuses_touch_only_the_node() {
        let mut tree = show();
        let touched = tree.set_status(WatchStatus::Ongoing);
        assert_eq!(touched, 1);
        assert_eq!(tree.status(), Some(WatchStatus::Ongoing));
        assert!(tree.children.iter().all(|c| c.user_state.is_none()));
    }

    #[test]
    fn score_setter_creates_state_lazily() {
        let mut node = ArtifactNode::new(ArtifactId::new(9), "Film", ArtifactKind::Movie);
        assert!(node.user_state.is_none());
        node.set_score(8.5);
        let state = node.user_state.as_ref().unwrap();
        assert_eq!(state.score, Some(8.5));
        assert_eq!(state.status, None);
        assert_eq!(state.started_at, None);
        assert_eq!(state.ended_at, None);
    }

    #[test]
    fn progress_unsupported_on_leaves_and_movies() {
        let movie = ArtifactNode::new(ArtifactId::new(9), "Film", ArtifactKind::Movie);
        assert_eq!(
            movie.progress().unwrap_err(),
            TreeError::UnsupportedOperation {
                kind: ArtifactKind::Movie
            }
        );
        let game = ArtifactNode::new(ArtifactId::new(10), "Game", ArtifactKind::Game);
        assert!(game.progress().is_err());
        let ep = episode(11, 1);
        assert!(ep.progress().is_err());
    }

    #[test]
    fn progress_blocks_at_the_gap() {
        let mut anime = ArtifactNode::new(ArtifactId::new(20), "Anime", ArtifactKind::Anime);
        anime.children = (1..=3)
            .map(|i| {
                let mut ep = ArtifactNode::new(
                    ArtifactId::new(20 + i),
                    format!("Ep {i}"),
                    ArtifactKind::AnimeEpisode,
                );
                ep.child_index = Some(i);
                ep
            })
            .collect();
        anime.children[0].set_status(WatchStatus::Finished);
        anime.children[2].set_status(WatchStatus::Finished);

        let progress = anime.progress().unwrap();
        assert_eq!(progress.last.unwrap().id, ArtifactId::new(21));
        assert_eq!(progress.next.unwrap().id, ArtifactId::new(22));
    }

    #[test]
    fn copy_user_states_requires_matching_roots() {
        let mut target = show();
        let other = ArtifactNode::new(ArtifactId::new(42), "Other", ArtifactKind::Tvshow);
        assert_eq!(
            target.copy_user_states_from(&other).unwrap_err(),
            TreeError::ShapeMismatch {
                expected: ArtifactId::new(1),
                found: ArtifactId::new(42),
            }
        );
    }

    #[test]
    fn copy_user_states_matches_by_id() {
        let mut source = show();
        source.set_status(WatchStatus::Finished);
        source
            .find_mut(ArtifactId::new(5))
            .unwrap()
            .set_score(7.0);

        let mut target = show();
        target.copy_user_states_from(&source).unwrap();
        assert_eq!(target.status(), Some(WatchStatus::Finished));
        let copied = target.find(ArtifactId::new(5)).unwrap();
        assert_eq!(copied.user_state.as_ref().unwrap().score, Some(7.0));
    }

    #[test]
    fn attach_user_states_is_full_replacement() {
        let mut tree = show();
        tree.set_status(WatchStatus::Ongoing);

        let mut states = HashMap::new();
        states.insert(
            ArtifactId::new(4),
            UserState {
                status: Some(WatchStatus::Finished),
                ..UserState::default()
            },
        );
        tree.attach_user_states(&states);

        // Root state was not in the table, so it is cleared.
        assert!(tree.user_state.is_none());
        assert_eq!(
            tree.find(ArtifactId::new(4)).unwrap().status(),
            Some(WatchStatus::Finished)
        );
    }

    #[test]
    fn episode_labels_prefix_season_number() {
        let tree = show();
        let second_season = &tree.children[1];
        let ep = &second_season.children[0];
        assert_eq!(
            ep.sequence_label(Some(second_season)).unwrap(),
            "S02E01"
        );
        assert_eq!(second_season.sequence_label(Some(&tree)).unwrap(), "S02");

        // Anime episodes have no season parent.
        let mut anime_ep =
            ArtifactNode::new(ArtifactId::new(50), "Ep", ArtifactKind::AnimeEpisode);
        anime_ep.child_index = Some(7);
        assert_eq!(anime_ep.sequence_label(None).unwrap(), "E07");

        // No index, no numbering.
        let unnumbered = ArtifactNode::new(ArtifactId::new(51), "Sp", ArtifactKind::AnimeEpisode);
        assert_eq!(unnumbered.sequence_label(None), None);
        let movie = ArtifactNode::new(ArtifactId::new(52), "Film", ArtifactKind::Movie);
        assert_eq!(movie.sequence_label(None), None);
    }

    #[test]
    fn serde_round_trip_preserves_tree_and_rating() {
        let mut tree = show();
        tree.ratings = vec![
            RatingEntry::new(RatingSource::Imdb, 8.0),
            RatingEntry::new(RatingSource::Metacritic, 76.0),
        ];
        tree.set_status(WatchStatus::Finished);

        let json = serde_json::to_string(&tree).unwrap();
        let back: ArtifactNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.mean_rating(), tree.mean_rating());
        let order: Vec<ArtifactId> = back.collect_ids();
        assert_eq!(order, tree.collect_ids());
    }
}
