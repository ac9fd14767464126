//! Per-kind reduction of critic/audience ratings to a single mean value.
//!
//! All functions here are pure and never fail on empty input: `None` means
//! "no rating", which is distinct from a rating of zero.

use serde::{Deserialize, Serialize};

use crate::constants::ranking::AUDIENCE_SECONDARY_WEIGHT;
use crate::domain::{ArtifactKind, RatingSource};

/// One typed rating value attached to an artifact.
///
/// Multiple entries of different sources may coexist on a node. The value is
/// nullable because upstream scrapers record sources they found but could not
/// score; aggregation ignores those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub source: RatingSource,
    pub value: Option<f64>,
}

impl RatingEntry {
    #[must_use]
    pub const fn new(source: RatingSource, value: f64) -> Self {
        Self {
            source,
            value: Some(value),
        }
    }
}

/// Reduces a rating list to the kind's mean rating.
///
/// Policy per kind:
/// - movie / tv show / anime: arithmetic mean of all non-null values,
///   source ignored;
/// - game: weighted two-group blend, see [`game_mean`];
/// - seasons and episodes: always `None`, aggregation does not apply below
///   the show level.
#[must_use]
pub fn mean_rating(kind: ArtifactKind, ratings: &[RatingEntry]) -> Option<f64> {
    match kind {
        ArtifactKind::Movie | ArtifactKind::Tvshow | ArtifactKind::Anime => {
            arithmetic_mean(ratings)
        }
        ArtifactKind::Game => game_mean(ratings),
        ArtifactKind::TvshowSeason | ArtifactKind::TvshowEpisode | ArtifactKind::AnimeEpisode => {
            None
        }
    }
}

/// Plain mean over every non-null value, regardless of source.
#[must_use]
pub fn arithmetic_mean(ratings: &[RatingEntry]) -> Option<f64> {
    let values: Vec<f64> = ratings.iter().filter_map(|r| r.value).collect();
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}

/// Weighted blend for games.
///
/// The critic group (Metacritic, OpenCritic) is averaged and enters the
/// blend with weight 1. The audience primary (Steam) enters with weight 1,
/// the audience secondary (GOG) with weight 0.2. The result is the weighted
/// mean of whichever components are present, so a lone component reproduces
/// its own value and critic + secondary resolves to
/// `(critic + 0.2 * secondary) / 1.2`. Any source outside these four is
/// ignored.
#[must_use]
pub fn game_mean(ratings: &[RatingEntry]) -> Option<f64> {
    let critic: Vec<f64> = ratings
        .iter()
        .filter(|r| {
            matches!(
                r.source,
                RatingSource::Metacritic | RatingSource::Opencritic
            )
        })
        .filter_map(|r| r.value)
        .collect();
    let steam = ratings
        .iter()
        .filter(|r| r.source == RatingSource::Steam)
        .find_map(|r| r.value);
    let gog = ratings
        .iter()
        .filter(|r| r.source == RatingSource::Gog)
        .find_map(|r| r.value);

    let mut weighted_sum = 0.0;
    let mut weight = 0.0;

    if !critic.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let count = critic.len() as f64;
        weighted_sum += critic.iter().sum::<f64>() / count;
        weight += 1.0;
    }
    if let Some(primary) = steam {
        weighted_sum += primary;
        weight += 1.0;
    }
    if let Some(secondary) = gog {
        weighted_sum += AUDIENCE_SECONDARY_WEIGHT * secondary;
        weight += AUDIENCE_SECONDARY_WEIGHT;
    }

    if weight > 0.0 {
        Some(weighted_sum / weight)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn entry(source: RatingSource, value: f64) -> RatingEntry {
        RatingEntry::new(source, value)
    }

    #[test]
    fn movie_mean_ignores_source() {
        let ratings = vec![
            entry(RatingSource::Imdb, 7.0),
            entry(RatingSource::Metacritic, 80.0),
            entry(RatingSource::RottenTomatoes, 90.0),
        ];
        let mean = mean_rating(ArtifactKind::Movie, &ratings).unwrap();
        assert!((mean - 59.0).abs() < TOLERANCE);
    }

    #[test]
    fn movie_mean_skips_null_values() {
        let ratings = vec![
            entry(RatingSource::Imdb, 8.0),
            RatingEntry {
                source: RatingSource::Metacritic,
                value: None,
            },
        ];
        let mean = mean_rating(ArtifactKind::Movie, &ratings).unwrap();
        assert!((mean - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn empty_or_all_null_yields_none() {
        assert_eq!(mean_rating(ArtifactKind::Movie, &[]), None);
        let all_null = vec![RatingEntry {
            source: RatingSource::Imdb,
            value: None,
        }];
        assert_eq!(mean_rating(ArtifactKind::Tvshow, &all_null), None);
        assert_eq!(mean_rating(ArtifactKind::Anime, &[]), None);
    }

    #[test]
    fn anime_mean_mirrors_movie_policy() {
        let ratings = vec![entry(RatingSource::Anilist, 84.0)];
        let mean = mean_rating(ArtifactKind::Anime, &ratings).unwrap();
        assert!((mean - 84.0).abs() < TOLERANCE);
    }

    #[test]
    fn leaf_kinds_never_aggregate() {
        let ratings = vec![entry(RatingSource::Imdb, 9.0)];
        assert_eq!(mean_rating(ArtifactKind::TvshowSeason, &ratings), None);
        assert_eq!(mean_rating(ArtifactKind::TvshowEpisode, &ratings), None);
        assert_eq!(mean_rating(ArtifactKind::AnimeEpisode, &ratings), None);
    }

    #[test]
    fn game_critic_and_weighted_secondary() {
        let ratings = vec![
            entry(RatingSource::Metacritic, 80.0),
            entry(RatingSource::Gog, 95.0),
        ];
        let mean = mean_rating(ArtifactKind::Game, &ratings).unwrap();
        let expected = (80.0 + 0.2 * 95.0) / 1.2;
        assert!((mean - expected).abs() < TOLERANCE);
        assert!((mean - 82.5).abs() < TOLERANCE);
    }

    #[test]
    fn game_both_critic_sources_average() {
        let ratings = vec![
            entry(RatingSource::Metacritic, 70.0),
            entry(RatingSource::Opencritic, 90.0),
        ];
        let mean = mean_rating(ArtifactKind::Game, &ratings).unwrap();
        assert!((mean - 80.0).abs() < TOLERANCE);
    }

    #[test]
    fn game_both_audience_sources_blend() {
        let ratings = vec![
            entry(RatingSource::Steam, 90.0),
            entry(RatingSource::Gog, 60.0),
        ];
        let mean = mean_rating(ArtifactKind::Game, &ratings).unwrap();
        let expected = (90.0 + 0.2 * 60.0) / 1.2;
        assert!((mean - expected).abs() < TOLERANCE);
    }

    #[test]
    fn game_critic_and_primary_audience_average() {
        let ratings = vec![
            entry(RatingSource::Opencritic, 80.0),
            entry(RatingSource::Steam, 90.0),
        ];
        let mean = mean_rating(ArtifactKind::Game, &ratings).unwrap();
        assert!((mean - 85.0).abs() < TOLERANCE);
    }

    #[test]
    fn game_lone_values_pass_through() {
        let lone_gog = vec![entry(RatingSource::Gog, 77.0)];
        let mean = mean_rating(ArtifactKind::Game, &lone_gog).unwrap();
        assert!((mean - 77.0).abs() < TOLERANCE);

        let lone_steam = vec![entry(RatingSource::Steam, 66.0)];
        let mean = mean_rating(ArtifactKind::Game, &lone_steam).unwrap();
        assert!((mean - 66.0).abs() < TOLERANCE);
    }

    #[test]
    fn game_ignores_foreign_sources() {
        let ratings = vec![
            entry(RatingSource::Imdb, 10.0),
            entry(RatingSource::Anilist, 10.0),
        ];
        assert_eq!(mean_rating(ArtifactKind::Game, &ratings), None);
    }
}
