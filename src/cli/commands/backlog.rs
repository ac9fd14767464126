//! Backlog command handlers

use crate::cli::commands::{format_date, format_rank, parse_kind, parse_sort, resolve_user};
use crate::domain::{ArtifactId, BacklogId, RankingStrategy};
use crate::models::BacklogItem;
use crate::services::BacklogError;
use crate::state::AppState;

pub async fn cmd_backlog_create(
    state: &AppState,
    username: &str,
    kind: &str,
    title: String,
    strategy: &str,
) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };
    let Some(kind) = parse_kind(kind) else {
        return Ok(());
    };
    let Ok(strategy) = strategy.parse::<RankingStrategy>() else {
        println!("Unknown ranking strategy: {strategy}");
        println!("Expected one of: rank, elo, wishlist");
        return Ok(());
    };

    match state
        .backlogs
        .create_backlog(user.id, kind, title, strategy)
        .await
    {
        Ok(backlog) => println!(
            "Created {} backlog '{}' (id {}, {} strategy)",
            backlog.kind, backlog.title, backlog.id, backlog.strategy
        ),
        Err(BacklogError::InvalidData(reason)) => println!("Cannot create backlog: {reason}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_backlog_list(state: &AppState, username: &str) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };

    let backlogs = state.backlogs.list_backlogs(user.id).await?;
    if backlogs.is_empty() {
        println!("No backlogs yet.");
        println!();
        println!("Create one with: kiroku backlog create {username} movie \"My list\"");
        return Ok(());
    }

    println!("Backlogs ({} total)", backlogs.len());
    println!("{:-<70}", "");
    for backlog in backlogs {
        println!(
            "{:>5}  {}  [{}, {} strategy]",
            backlog.id.value(),
            backlog.title,
            backlog.kind,
            backlog.strategy
        );
    }
    Ok(())
}

pub async fn cmd_backlog_show(
    state: &AppState,
    id: i64,
    sort: Option<String>,
) -> anyhow::Result<()> {
    let Ok(sort) = parse_sort(sort.as_deref()) else {
        return Ok(());
    };

    match state
        .backlogs
        .ordered_entries(BacklogId::new(id), sort)
        .await
    {
        Ok(items) => {
            if items.is_empty() {
                println!("Backlog {id} is empty.");
                return Ok(());
            }
            print_items(&items);
        }
        Err(BacklogError::NotFound(id)) => println!("Backlog with id {id} not found."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_backlog_add(state: &AppState, id: i64, artifact: i32) -> anyhow::Result<()> {
    match state
        .backlogs
        .add_entry(BacklogId::new(id), ArtifactId::new(artifact))
        .await
    {
        Ok(()) => println!("Added artifact {artifact} to backlog {id}"),
        Err(
            err @ (BacklogError::NotFound(_)
            | BacklogError::ArtifactNotFound(_)
            | BacklogError::KindMismatch { .. }
            | BacklogError::InvalidData(_)),
        ) => println!("{err}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_backlog_remove(state: &AppState, id: i64, artifact: i32) -> anyhow::Result<()> {
    match state
        .backlogs
        .remove_entry(BacklogId::new(id), ArtifactId::new(artifact))
        .await
    {
        Ok(()) => println!("Removed artifact {artifact} from backlog {id}"),
        Err(err @ (BacklogError::NotFound(_) | BacklogError::EntryNotFound { .. })) => {
            println!("{err}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_backlog_rank(
    state: &AppState,
    id: i64,
    artifact: i32,
    rank: Option<i64>,
) -> anyhow::Result<()> {
    match state
        .backlogs
        .set_entry_rank(BacklogId::new(id), ArtifactId::new(artifact), rank)
        .await
    {
        Ok(()) => match rank {
            Some(rank) => println!("Ranked artifact {artifact} at #{rank} in backlog {id}"),
            None => println!("Cleared the rank of artifact {artifact} in backlog {id}"),
        },
        Err(err @ (BacklogError::NotFound(_) | BacklogError::EntryNotFound { .. })) => {
            println!("{err}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_backlog_tag(
    state: &AppState,
    id: i64,
    artifact: i32,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    let count = tags.len();
    match state
        .backlogs
        .set_entry_tags(BacklogId::new(id), ArtifactId::new(artifact), tags)
        .await
    {
        Ok(()) => {
            if count == 0 {
                println!("Cleared tags of artifact {artifact} in backlog {id}");
            } else {
                println!("Tagged artifact {artifact} in backlog {id} ({count} tags)");
            }
        }
        Err(err @ (BacklogError::NotFound(_) | BacklogError::EntryNotFound { .. })) => {
            println!("{err}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn cmd_backlog_duel(
    state: &AppState,
    id: i64,
    winner: i32,
    loser: i32,
) -> anyhow::Result<()> {
    match state
        .backlogs
        .record_duel(
            BacklogId::new(id),
            ArtifactId::new(winner),
            ArtifactId::new(loser),
        )
        .await
    {
        Ok((winner_elo, loser_elo)) => {
            println!("Duel recorded in backlog {id}");
            println!("  winner {winner}: {winner_elo:.0}");
            println!("  loser  {loser}: {loser_elo:.0}");
        }
        Err(
            err @ (BacklogError::NotFound(_)
            | BacklogError::EntryNotFound { .. }
            | BacklogError::InvalidData(_)),
        ) => println!("{err}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub(crate) fn print_items(items: &[BacklogItem]) {
    println!("{:>5}  {:>5}  {:>6}  {:<10}  {}", "rank", "id", "elo", "release", "title");
    println!("{:-<70}", "");
    for item in items {
        println!(
            "{:>5}  {:>5}  {:>6.0}  {:<10}  {}",
            format_rank(item.rank),
            item.artifact_id.value(),
            item.elo,
            format_date(item.release_date),
            item.title
        );
    }
}
