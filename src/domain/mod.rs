//! Domain types for media tracking with strong typing.
//!
//! This module provides type-safe wrappers and closed enums for the tracking
//! subsystem. It follows the Newtype pattern to prevent ID mixing.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a stored string does not name a known enum variant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {what}: {value}")]
pub struct UnknownVariant {
    pub what: &'static str,
    pub value: String,
}

/// Unique identifier for an artifact (movie, show, season, episode, anime, game).
///
/// This newtype wrapper prevents mixing artifact IDs with other entity IDs
/// (e.g., `UserId`). It provides full trait coverage per C-COMMON-TRAITS and
/// C-NEWTYPE.
///
/// # Examples
///
/// ```rust
/// use kiroku::domain::ArtifactId;
///
/// let id = ArtifactId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArtifactId(i32);

impl ArtifactId {
    /// Creates a new `ArtifactId` from a raw i32 value.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `id` is negative. Production code should
    /// validate before construction.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "ArtifactId should be non-negative");
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ArtifactId> for i32 {
    fn from(id: ArtifactId) -> Self {
        id.0
    }
}

impl From<i32> for ArtifactId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for ArtifactId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for ArtifactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Unique identifier for a registered user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "UserId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Unique identifier for a backlog.
///
/// Negative values are reserved for the virtual views: `WISHLIST` (-1) marks
/// entries of the computed wishlist and `UPCOMING` (-2) entries of the
/// computed future-releases view. Neither exists as a stored backlog row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BacklogId(i64);

impl BacklogId {
    /// Reserved id tagging entries of the virtual wishlist view.
    pub const WISHLIST: Self = Self(-1);

    /// Reserved id tagging entries of the virtual future-releases view.
    pub const UPCOMING: Self = Self(-2);

    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Returns true for the two reserved virtual-view ids.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for BacklogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BacklogId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

/// The closed set of trackable artifact kinds.
///
/// A node's kind determines the legal shape of its children: a show owns
/// seasons, a season owns episodes, an anime owns episodes, and movies,
/// games, and episodes are leaves. That shape is a caller contract, not a
/// runtime-checked constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Movie,
    Tvshow,
    TvshowSeason,
    TvshowEpisode,
    Anime,
    AnimeEpisode,
    Game,
}

impl ArtifactKind {
    /// Stable storage string for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tvshow => "tvshow",
            Self::TvshowSeason => "tvshow_season",
            Self::TvshowEpisode => "tvshow_episode",
            Self::Anime => "anime",
            Self::AnimeEpisode => "anime_episode",
            Self::Game => "game",
        }
    }

    /// True for kinds whose children form a linear watch sequence
    /// (show over seasons, season and anime over episodes).
    #[must_use]
    pub const fn is_sequence_container(&self) -> bool {
        matches!(self, Self::Tvshow | Self::TvshowSeason | Self::Anime)
    }

    /// The child kind a container of this kind owns, if any.
    #[must_use]
    pub const fn expected_child_kind(&self) -> Option<Self> {
        match self {
            Self::Tvshow => Some(Self::TvshowSeason),
            Self::TvshowSeason => Some(Self::TvshowEpisode),
            Self::Anime => Some(Self::AnimeEpisode),
            Self::Movie | Self::TvshowEpisode | Self::AnimeEpisode | Self::Game => None,
        }
    }

    /// True for the top-level kinds users add and rank directly.
    #[must_use]
    pub const fn is_root_kind(&self) -> bool {
        matches!(self, Self::Movie | Self::Tvshow | Self::Anime | Self::Game)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tvshow" => Ok(Self::Tvshow),
            "tvshow_season" => Ok(Self::TvshowSeason),
            "tvshow_episode" => Ok(Self::TvshowEpisode),
            "anime" => Ok(Self::Anime),
            "anime_episode" => Ok(Self::AnimeEpisode),
            "game" => Ok(Self::Game),
            other => Err(UnknownVariant {
                what: "artifact kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-user consumption status of one artifact.
///
/// Stored nullable: the absence of a status means the artifact was never
/// touched by that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Dropped,
    Finished,
    Ongoing,
    Onhold,
    Wishlist,
}

impl WatchStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dropped => "dropped",
            Self::Finished => "finished",
            Self::Ongoing => "ongoing",
            Self::Onhold => "onhold",
            Self::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dropped" => Ok(Self::Dropped),
            "finished" => Ok(Self::Finished),
            "ongoing" => Ok(Self::Ongoing),
            "onhold" => Ok(Self::Onhold),
            "wishlist" => Ok(Self::Wishlist),
            other => Err(UnknownVariant {
                what: "watch status",
                value: other.to_string(),
            }),
        }
    }
}

/// Provenance of one critic/audience rating value.
///
/// Sources are kind-specific: the critic aggregates apply to movies, shows,
/// and games, `Anilist` is the single audience score tracked for anime, and
/// `Steam`/`Gog` form the audience group of the game blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSource {
    Imdb,
    Metacritic,
    RottenTomatoes,
    Anilist,
    Opencritic,
    Steam,
    Gog,
}

impl RatingSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Imdb => "imdb",
            Self::Metacritic => "metacritic",
            Self::RottenTomatoes => "rotten_tomatoes",
            Self::Anilist => "anilist",
            Self::Opencritic => "opencritic",
            Self::Steam => "steam",
            Self::Gog => "gog",
        }
    }
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imdb" => Ok(Self::Imdb),
            "metacritic" => Ok(Self::Metacritic),
            "rotten_tomatoes" => Ok(Self::RottenTomatoes),
            "anilist" => Ok(Self::Anilist),
            "opencritic" => Ok(Self::Opencritic),
            "steam" => Ok(Self::Steam),
            "gog" => Ok(Self::Gog),
            other => Err(UnknownVariant {
                what: "rating source",
                value: other.to_string(),
            }),
        }
    }
}

/// How a backlog seeds the `rank` field of its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
    /// Rank is the stored manual rank; unranked entries sort last.
    Rank,
    /// Competition rank over Elo descending.
    #[default]
    Elo,
    /// Competition rank over release date ascending.
    Wishlist,
}

impl RankingStrategy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Elo => "elo",
            Self::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for RankingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingStrategy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rank" => Ok(Self::Rank),
            "elo" => Ok(Self::Elo),
            "wishlist" => Ok(Self::Wishlist),
            other => Err(UnknownVariant {
                what: "ranking strategy",
                value: other.to_string(),
            }),
        }
    }
}

/// Display-order key for an already-ranked entry list.
///
/// Independent of the strategy that computed `rank`; re-sorting by any key
/// never recomputes ranks. Per C-CUSTOM-TYPE: an enum instead of a stringly
/// typed sort parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Rank,
    Elo,
    DateAdded,
    DateRelease,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Elo => "elo",
            Self::DateAdded => "date_added",
            Self::DateRelease => "date_release",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rank" => Ok(Self::Rank),
            "elo" => Ok(Self::Elo),
            "date_added" | "added" => Ok(Self::DateAdded),
            "date_release" | "release" => Ok(Self::DateRelease),
            other => Err(UnknownVariant {
                what: "sort key",
                value: other.to_string(),
            }),
        }
    }
}
