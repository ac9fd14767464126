//! Status, score, and rating command handlers

use crate::cli::commands::resolve_user;
use crate::domain::{ArtifactId, RatingSource, WatchStatus};
use crate::services::ArtifactError;
use crate::state::AppState;

pub async fn cmd_set_status(
    state: &AppState,
    username: &str,
    id: i32,
    status: &str,
) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };
    let Ok(status) = status.parse::<WatchStatus>() else {
        println!("Unknown status: {status}");
        println!("Expected one of: dropped, finished, ongoing, onhold, wishlist");
        return Ok(());
    };

    match state
        .artifacts
        .update_status(user.id, ArtifactId::new(id), status)
        .await
    {
        Ok(touched) => {
            if touched > 1 {
                println!("Marked {touched} artifacts as {status}");
            } else {
                println!("Marked artifact {id} as {status}");
            }
        }
        Err(ArtifactError::NotFound(id)) => println!("Artifact with id {id} not found."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_set_score(
    state: &AppState,
    username: &str,
    id: i32,
    score: f64,
) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };

    match state
        .artifacts
        .set_score(user.id, ArtifactId::new(id), score)
        .await
    {
        Ok(()) => println!("Scored artifact {id}: {score:.1}"),
        Err(ArtifactError::NotFound(id)) => println!("Artifact with id {id} not found."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_rate(state: &AppState, id: i32, source: &str, value: f64) -> anyhow::Result<()> {
    let Ok(source) = source.parse::<RatingSource>() else {
        println!("Unknown rating source: {source}");
        println!(
            "Expected one of: imdb, metacritic, rotten_tomatoes, anilist, opencritic, steam, gog"
        );
        return Ok(());
    };

    match state
        .artifacts
        .add_rating(ArtifactId::new(id), source, value)
        .await
    {
        Ok(()) => println!("Recorded {source} rating {value:.1} for artifact {id}"),
        Err(ArtifactError::NotFound(id)) => println!("Artifact with id {id} not found."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
