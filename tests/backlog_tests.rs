//! Integration tests for backlog ordering, duels, and the virtual
//! wishlist/upcoming views.

use chrono::{DateTime, TimeZone, Utc};
use kiroku::config::Config;
use kiroku::domain::{
    ArtifactId, ArtifactKind, BacklogId, RankingStrategy, SortKey, UserId, WatchStatus,
};
use kiroku::models::NewArtifact;
use kiroku::services::{BacklogError, UserError};
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

async fn add_game(state: &AppState, title: &str, release: Option<DateTime<Utc>>) -> ArtifactId {
    state
        .artifacts
        .add_artifact(NewArtifact {
            title: title.to_string(),
            kind: ArtifactKind::Game,
            parent_id: None,
            child_index: None,
            release_date: release,
            duration_secs: None,
            description: None,
            tags: Vec::new(),
        })
        .await
        .expect("add game")
}

fn past(year: i32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(year, 1, 10, 0, 0, 0).unwrap())
}

fn future(year: i32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap())
}

#[tokio::test]
async fn registering_a_taken_username_is_rejected() {
    let state = spawn_state().await;
    register(&state, "alice").await;

    let result = state.users.register("alice").await;
    assert!(matches!(result, Err(UserError::AlreadyExists(name)) if name == "alice"));
}

#[tokio::test]
async fn backlogs_track_root_kinds_only() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;

    let result = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::TvshowEpisode,
            "episodes".to_string(),
            RankingStrategy::Elo,
        )
        .await;
    assert!(matches!(result, Err(BacklogError::InvalidData(_))));
}

#[tokio::test]
async fn entries_must_match_the_backlog_kind() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let game = add_game(&state, "Hades", past(2020)).await;

    let movies = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::Movie,
            "movies".to_string(),
            RankingStrategy::Elo,
        )
        .await
        .unwrap();

    let result = state.backlogs.add_entry(movies.id, game).await;
    assert!(matches!(
        result,
        Err(BacklogError::KindMismatch { found, .. }) if found == ArtifactKind::Game
    ));
}

#[tokio::test]
async fn duplicate_entries_are_rejected() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let game = add_game(&state, "Hades", past(2020)).await;

    let backlog = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::Game,
            "games".to_string(),
            RankingStrategy::Elo,
        )
        .await
        .unwrap();
    state.backlogs.add_entry(backlog.id, game).await.unwrap();

    let result = state.backlogs.add_entry(backlog.id, game).await;
    assert!(matches!(result, Err(BacklogError::InvalidData(_))));
}

#[tokio::test]
async fn duels_reorder_an_elo_backlog() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;

    let hades = add_game(&state, "Hades", past(2020)).await;
    let celeste = add_game(&state, "Celeste", past(2018)).await;
    let hollow = add_game(&state, "Hollow Knight", past(2017)).await;

    let backlog = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::Game,
            "games".to_string(),
            RankingStrategy::Elo,
        )
        .await
        .unwrap();
    for game in [hades, celeste, hollow] {
        state.backlogs.add_entry(backlog.id, game).await.unwrap();
    }

    // Everyone starts at the default rating, tied at rank 1.
    let items = state
        .backlogs
        .ordered_entries(backlog.id, None)
        .await
        .unwrap();
    assert!(items.iter().all(|item| item.rank == 1));

    let (winner_elo, loser_elo) = state
        .backlogs
        .record_duel(backlog.id, celeste, hades)
        .await
        .unwrap();
    assert!(winner_elo > 1200.0);
    assert!(loser_elo < 1200.0);

    let items = state
        .backlogs
        .ordered_entries(backlog.id, None)
        .await
        .unwrap();
    let order: Vec<ArtifactId> = items.iter().map(|item| item.artifact_id).collect();
    assert_eq!(order[0], celeste);
    assert_eq!(order[2], hades);
    let ranks: Vec<i64> = items.iter().map(|item| item.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    // Dueling yourself is misuse.
    let result = state.backlogs.record_duel(backlog.id, hades, hades).await;
    assert!(matches!(result, Err(BacklogError::InvalidData(_))));
}

#[tokio::test]
async fn manual_ranks_order_a_rank_backlog() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;

    let first = add_game(&state, "Outer Wilds", past(2019)).await;
    let second = add_game(&state, "Tunic", past(2022)).await;
    let unranked = add_game(&state, "Dredge", past(2023)).await;

    let backlog = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::Game,
            "priority".to_string(),
            RankingStrategy::Rank,
        )
        .await
        .unwrap();
    for game in [unranked, second, first] {
        state.backlogs.add_entry(backlog.id, game).await.unwrap();
    }
    state
        .backlogs
        .set_entry_rank(backlog.id, first, Some(1))
        .await
        .unwrap();
    state
        .backlogs
        .set_entry_rank(backlog.id, second, Some(2))
        .await
        .unwrap();

    let items = state
        .backlogs
        .ordered_entries(backlog.id, None)
        .await
        .unwrap();
    let order: Vec<ArtifactId> = items.iter().map(|item| item.artifact_id).collect();
    assert_eq!(order, vec![first, second, unranked]);
    assert_eq!(items[0].rank, 1);
    assert_eq!(items[1].rank, 2);
    assert_eq!(items[2].manual_rank, None);

    // Re-sort by release date without recomputing ranks.
    let by_release = state
        .backlogs
        .ordered_entries(backlog.id, Some(SortKey::DateRelease))
        .await
        .unwrap();
    let order: Vec<ArtifactId> = by_release.iter().map(|item| item.artifact_id).collect();
    assert_eq!(order, vec![first, second, unranked]);

    // Ranking a non-member is an explicit error.
    let stranger = add_game(&state, "Stranger", past(2000)).await;
    let result = state
        .backlogs
        .set_entry_rank(backlog.id, stranger, Some(3))
        .await;
    assert!(matches!(result, Err(BacklogError::EntryNotFound { .. })));
}

#[tokio::test]
async fn entry_tags_survive_the_round_trip() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;
    let game = add_game(&state, "Hades", past(2020)).await;

    let backlog = state
        .backlogs
        .create_backlog(
            user,
            ArtifactKind::Game,
            "games".to_string(),
            RankingStrategy::Elo,
        )
        .await
        .unwrap();
    state.backlogs.add_entry(backlog.id, game).await.unwrap();
    state
        .backlogs
        .set_entry_tags(
            backlog.id,
            game,
            vec!["roguelike".to_string(), "short".to_string()],
        )
        .await
        .unwrap();

    let items = state
        .backlogs
        .ordered_entries(backlog.id, None)
        .await
        .unwrap();
    assert_eq!(items[0].tags, vec!["roguelike", "short"]);
}

#[tokio::test]
async fn virtual_views_split_wishlist_by_release() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;

    let released_a = add_game(&state, "Hades", past(2020)).await;
    let released_b = add_game(&state, "Celeste", past(2018)).await;
    let upcoming_a = add_game(&state, "Hollow Knight: Silksong 2", future(2107)).await;
    let upcoming_b = add_game(&state, "Half-Life 3", future(2109)).await;
    let not_wishlisted = add_game(&state, "Tunic", past(2022)).await;
    let undated = add_game(&state, "Mystery Project", None).await;

    for id in [released_a, released_b, upcoming_a, upcoming_b, undated] {
        state
            .artifacts
            .update_status(user, id, WatchStatus::Wishlist)
            .await
            .unwrap();
    }
    state
        .artifacts
        .update_status(user, not_wishlisted, WatchStatus::Ongoing)
        .await
        .unwrap();

    let wishlist = state
        .backlogs
        .wishlist(user, ArtifactKind::Game, None)
        .await
        .unwrap();
    let ids: Vec<ArtifactId> = wishlist.iter().map(|item| item.artifact_id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&released_a) && ids.contains(&released_b));
    for item in &wishlist {
        assert_eq!(item.backlog_id, BacklogId::WISHLIST);
        assert!((item.elo - 1200.0).abs() < 1e-9);
    }

    let upcoming = state
        .backlogs
        .upcoming(user, ArtifactKind::Game)
        .await
        .unwrap();
    let ids: Vec<ArtifactId> = upcoming.iter().map(|item| item.artifact_id).collect();
    assert_eq!(ids, vec![upcoming_a, upcoming_b]);
    let ranks: Vec<i64> = upcoming.iter().map(|item| item.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
    for item in &upcoming {
        assert_eq!(item.backlog_id, BacklogId::UPCOMING);
    }
}

#[tokio::test]
async fn wishlist_duels_and_rank_overrides_reorder_the_view() {
    let state = spawn_state().await;
    let user = register(&state, "alice").await;

    let hades = add_game(&state, "Hades", past(2020)).await;
    let celeste = add_game(&state, "Celeste", past(2018)).await;
    let hollow = add_game(&state, "Hollow Knight", past(2017)).await;
    for id in [hades, celeste, hollow] {
        state
            .artifacts
            .update_status(user, id, WatchStatus::Wishlist)
            .await
            .unwrap();
    }

    let (winner_elo, _) = state
        .backlogs
        .record_wishlist_duel(user, ArtifactKind::Game, hollow, hades)
        .await
        .unwrap();
    assert!(winner_elo > 1200.0);

    let by_elo = state
        .backlogs
        .wishlist(user, ArtifactKind::Game, None)
        .await
        .unwrap();
    assert_eq!(by_elo[0].artifact_id, hollow);
    assert_eq!(by_elo[0].rank, 1);
    assert_eq!(by_elo.last().unwrap().artifact_id, hades);

    // A manual override pins Celeste first under rank ordering; the other
    // two share the unranked sentinel and fall back to Elo.
    state
        .backlogs
        .set_wishlist_rank(user, celeste, Some(1))
        .await
        .unwrap();
    let by_rank = state
        .backlogs
        .wishlist(user, ArtifactKind::Game, Some(SortKey::Rank))
        .await
        .unwrap();
    let ids: Vec<ArtifactId> = by_rank.iter().map(|item| item.artifact_id).collect();
    assert_eq!(ids, vec![celeste, hollow, hades]);
}

#[tokio::test]
async fn virtual_ids_are_not_stored_backlogs() {
    let state = spawn_state().await;

    let result = state
        .backlogs
        .ordered_entries(BacklogId::WISHLIST, None)
        .await;
    assert!(matches!(result, Err(BacklogError::NotFound(_))));
    let result = state
        .backlogs
        .ordered_entries(BacklogId::UPCOMING, None)
        .await;
    assert!(matches!(result, Err(BacklogError::NotFound(_))));
}
