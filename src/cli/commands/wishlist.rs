//! Virtual view command handlers (wishlist, upcoming)

use crate::cli::commands::backlog::print_items;
use crate::cli::commands::{parse_kind, parse_sort, resolve_user};
use crate::state::AppState;

pub async fn cmd_wishlist(
    state: &AppState,
    username: &str,
    kind: &str,
    sort: Option<String>,
) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };
    let Some(kind) = parse_kind(kind) else {
        return Ok(());
    };
    let Ok(sort) = parse_sort(sort.as_deref()) else {
        return Ok(());
    };

    let items = state.backlogs.wishlist(user.id, kind, sort).await?;
    if items.is_empty() {
        println!("No released {kind} artifacts on the wishlist.");
        println!();
        println!("Wishlist one with: kiroku status {username} <id> wishlist");
        return Ok(());
    }

    println!("Wishlist: {kind} ({} total)", items.len());
    print_items(&items);
    Ok(())
}

pub async fn cmd_upcoming(state: &AppState, username: &str, kind: &str) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };
    let Some(kind) = parse_kind(kind) else {
        return Ok(());
    };

    let items = state.backlogs.upcoming(user.id, kind).await?;
    if items.is_empty() {
        println!("Nothing upcoming on the {kind} wishlist.");
        return Ok(());
    }

    println!("Upcoming releases: {kind} ({} total)", items.len());
    print_items(&items);
    Ok(())
}
