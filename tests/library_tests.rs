//! Integration tests for the artifact library flows: tree hydration, status
//! cascades, state copies, and cascading deletion.

use chrono::{TimeZone, Utc};
use kiroku::config::Config;
use kiroku::domain::{ArtifactId, ArtifactKind, RatingSource, UserId, WatchStatus};
use kiroku::models::NewArtifact;
use kiroku::services::ArtifactError;
use kiroku::state::AppState;

async fn spawn_state() -> AppState {
    let db_path = std::env::temp_dir().join(format!("kiroku-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    AppState::init(&config)
        .await
        .expect("failed to create app state")
}

async fn register(state: &AppState, name: &str) -> UserId {
    state.users.register(name).await.expect("register user").id
}

fn new_artifact(title: &str, kind: ArtifactKind) -> NewArtifact {
    NewArtifact {
        title: title.to_string(),
        kind,
        parent_id: None,
        child_index: None,
        release_date: None,
        duration_secs: None,
        description: None,
        tags: Vec::new(),
    }
}

async fn add(state: &AppState, new: NewArtifact) -> ArtifactId {
    state.artifacts.add_artifact(new).await.expect("add artifact")
}

/// Builds a show with two seasons of two episodes each, returning
/// (show, seasons, episodes).
async fn add_show(state: &AppState, title: &str) -> (ArtifactId, Vec<ArtifactId>, Vec<ArtifactId>) {
    let show = add(state, new_artifact(title, ArtifactKind::Tvshow)).await;

    let mut seasons = Vec::new();
    let mut episodes = Vec::new();
    for season_no in 1..=2 {
        let season = add(
            state,
            NewArtifact {
                parent_id: Some(show),
                child_index: Some(season_no),
                ..new_artifact(
                    &format!("{title} S{season_no}"),
                    ArtifactKind::TvshowSeason,
                )
            },
        )
        .await;
        seasons.push(season);

        for episode_no in 1..=2 {
            let episode = add(
                state,
                NewArtifact {
                    parent_id: Some(season),
                    child_index: Some(episode_no),
                    ..new_artifact(
                        &format!("{title} S{season_no}E{episode_no}"),
                        ArtifactKind::TvshowEpisode,
                    )
                },
            )
            .await;
            episodes.push(episode);
        }
    }
    (show, seasons, episodes)
}

#[tokio::test]
async fn add_and_hydrate_movie() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;

    let movie = add(
        &state,
        NewArtifact {
            release_date: Some(Utc.with_ymd_and_hms(1999, 3, 31, 0, 0, 0).unwrap()),
            duration_secs: Some(8160),
            tags: vec!["rewatch".to_string()],
            ..new_artifact("The Matrix", ArtifactKind::Movie)
        },
    )
    .await;

    state
        .artifacts
        .set_genres(movie, vec!["Action".to_string(), "Sci-Fi".to_string()])
        .await
        .unwrap();
    state
        .artifacts
        .add_rating(movie, RatingSource::Imdb, 8.7)
        .await
        .unwrap();
    state
        .artifacts
        .add_rating(movie, RatingSource::Metacritic, 73.0)
        .await
        .unwrap();

    let tree = state.artifacts.get_tree(user, movie).await.unwrap();
    assert_eq!(tree.title, "The Matrix");
    assert_eq!(tree.kind, ArtifactKind::Movie);
    assert_eq!(tree.genres, vec!["Action", "Sci-Fi"]);
    assert_eq!(tree.tags, vec!["rewatch"]);
    assert_eq!(
        tree.release_date,
        Some(Utc.with_ymd_and_hms(1999, 3, 31, 0, 0, 0).unwrap())
    );
    assert!(tree.user_state.is_none());

    let mean = tree.mean_rating().unwrap();
    assert!((mean - (8.7 + 73.0) / 2.0).abs() < 1e-9);

    // Movies have no child sequence to walk.
    assert!(tree.progress().is_err());
}

#[tokio::test]
async fn child_shape_is_validated_on_add() {
    let state = spawn_state().await;

    let movie = add(&state, new_artifact("Heat", ArtifactKind::Movie)).await;
    let result = state
        .artifacts
        .add_artifact(NewArtifact {
            parent_id: Some(movie),
            ..new_artifact("Bogus season", ArtifactKind::TvshowSeason)
        })
        .await;
    assert!(matches!(result, Err(ArtifactError::InvalidData(_))));

    let missing = state
        .artifacts
        .add_artifact(NewArtifact {
            parent_id: Some(ArtifactId::new(9999)),
            ..new_artifact("Orphan", ArtifactKind::TvshowSeason)
        })
        .await;
    assert!(matches!(missing, Err(ArtifactError::NotFound(_))));
}

#[tokio::test]
async fn finished_status_cascades_through_the_tree() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let (show, _, _) = add_show(&state, "Dark").await;

    let touched = state
        .artifacts
        .update_status(user, show, WatchStatus::Finished)
        .await
        .unwrap();
    assert_eq!(touched, 7);

    let tree = state.artifacts.get_tree(user, show).await.unwrap();
    for id in tree.collect_ids() {
        assert_eq!(
            tree.find(id).unwrap().status(),
            Some(WatchStatus::Finished),
            "artifact {id} should be finished"
        );
    }

    // Every season finished, so the show's scan has no next.
    let progress = tree.progress().unwrap();
    assert_eq!(progress.next, None);
    assert_eq!(progress.last.unwrap().id, tree.children[1].id);
}

#[tokio::test]
async fn non_finished_status_touches_one_artifact() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let (show, seasons, episodes) = add_show(&state, "Severance").await;

    let touched = state
        .artifacts
        .update_status(user, show, WatchStatus::Ongoing)
        .await
        .unwrap();
    assert_eq!(touched, 1);

    let tree = state.artifacts.get_tree(user, show).await.unwrap();
    assert_eq!(tree.status(), Some(WatchStatus::Ongoing));
    assert!(tree.find(seasons[0]).unwrap().user_state.is_none());
    assert!(tree.find(episodes[0]).unwrap().user_state.is_none());
}

#[tokio::test]
async fn season_progress_blocks_at_the_gap() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let (show, seasons, episodes) = add_show(&state, "Lost").await;

    // First and last episode of season one finished, the one between not.
    state
        .artifacts
        .update_status(user, episodes[0], WatchStatus::Finished)
        .await
        .unwrap();

    let tree = state.artifacts.get_tree(user, show).await.unwrap();
    let season = tree.find(seasons[0]).unwrap();
    let progress = season.progress().unwrap();
    assert_eq!(progress.last.unwrap().id, episodes[0]);
    assert_eq!(progress.next.unwrap().id, episodes[1]);

    // The show-level scan sees season one unfinished.
    let show_progress = tree.progress().unwrap();
    assert_eq!(show_progress.last, None);
    assert_eq!(show_progress.next.unwrap().id, seasons[0]);
}

#[tokio::test]
async fn score_and_dates_create_state_lazily() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let movie = add(&state, new_artifact("Whiplash", ArtifactKind::Movie)).await;

    state.artifacts.set_score(user, movie, 9.0).await.unwrap();
    let started = Utc.with_ymd_and_hms(2025, 1, 5, 20, 0, 0).unwrap();
    state
        .artifacts
        .set_started_at(user, movie, started)
        .await
        .unwrap();

    let tree = state.artifacts.get_tree(user, movie).await.unwrap();
    let user_state = tree.user_state.as_ref().unwrap();
    assert_eq!(user_state.score, Some(9.0));
    assert_eq!(user_state.started_at, Some(started));
    assert_eq!(user_state.status, None);
    assert_eq!(user_state.ended_at, None);
}

#[tokio::test]
async fn copy_user_states_between_users() {
    let state = spawn_state().await;
    let alice = register(&state, "alice").await;
    let bob = register(&state, "bob").await;
    let (show, _, episodes) = add_show(&state, "Fargo").await;

    state
        .artifacts
        .update_status(alice, show, WatchStatus::Finished)
        .await
        .unwrap();
    state
        .artifacts
        .set_score(alice, episodes[3], 8.0)
        .await
        .unwrap();

    state
        .artifacts
        .copy_user_states(alice, bob, show)
        .await
        .unwrap();

    let tree = state.artifacts.get_tree(bob, show).await.unwrap();
    assert_eq!(tree.status(), Some(WatchStatus::Finished));
    let episode = tree.find(episodes[3]).unwrap();
    assert_eq!(episode.user_state.as_ref().unwrap().score, Some(8.0));
}

#[tokio::test]
async fn listing_is_paged_and_searchable() {
    let state = spawn_state().await;
    for title in ["Alien", "Aliens", "Blade Runner"] {
        add(&state, new_artifact(title, ArtifactKind::Movie)).await;
    }
    add(&state, new_artifact("Akira", ArtifactKind::Anime)).await;

    let movies = state
        .artifacts
        .list_artifacts(ArtifactKind::Movie, 0, 50, None)
        .await
        .unwrap();
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Aliens", "Blade Runner"]);

    let hits = state
        .artifacts
        .list_artifacts(ArtifactKind::Movie, 0, 50, Some("Alien"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);

    let second_page = state
        .artifacts
        .list_artifacts(ArtifactKind::Movie, 1, 2, None)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].title, "Blade Runner");
}

#[tokio::test]
async fn delete_cascades_to_descendants_and_references() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let (show, seasons, episodes) = add_show(&state, "The Wire").await;

    state
        .artifacts
        .update_status(user, show, WatchStatus::Finished)
        .await
        .unwrap();
    state
        .artifacts
        .add_rating(show, RatingSource::Imdb, 9.3)
        .await
        .unwrap();
    state
        .artifacts
        .set_genres(show, vec!["Crime".to_string()])
        .await
        .unwrap();
    state
        .artifacts
        .add_link(show, "https://example.com/the-wire".to_string(), None)
        .await
        .unwrap();

    let backlog = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::Tvshow,
            "shows".to_string(),
            kiroku::domain::RankingStrategy::Elo,
        )
        .await
        .unwrap();
    state.backlogs.add_entry(backlog.id, show).await.unwrap();

    let removed = state.artifacts.delete_artifact(show).await.unwrap();
    assert_eq!(removed, 7);

    // Show, seasons, and episodes are all gone.
    for id in std::iter::once(show)
        .chain(seasons.iter().copied())
        .chain(episodes.iter().copied())
    {
        assert!(matches!(
            state.artifacts.get_tree(user, id).await,
            Err(ArtifactError::NotFound(_))
        ));
        assert_eq!(state.store.states().get(user, id).await.unwrap(), None);
    }

    // Referencing rows went with them.
    let entries = state
        .backlogs
        .ordered_entries(backlog.id, None)
        .await
        .unwrap();
    assert!(entries.is_empty());
    assert!(state.store.artifacts().ratings_for(show).await.unwrap().is_empty());
    assert!(state.store.artifacts().genres_for(show).await.unwrap().is_empty());
    assert!(state.store.artifacts().links_for(show).await.unwrap().is_empty());
}
