mod add;
mod backlog;
mod info;
mod list;
mod register;
mod remove;
mod status;
mod wishlist;

pub use add::cmd_add_artifact;
pub use backlog::{
    cmd_backlog_add, cmd_backlog_create, cmd_backlog_duel, cmd_backlog_list, cmd_backlog_rank,
    cmd_backlog_remove, cmd_backlog_show, cmd_backlog_tag,
};
pub use info::cmd_artifact_info;
pub use list::cmd_list_artifacts;
pub use register::cmd_register;
pub use remove::cmd_remove_artifact;
pub use status::{cmd_rate, cmd_set_score, cmd_set_status};
pub use wishlist::{cmd_upcoming, cmd_wishlist};

use chrono::{DateTime, NaiveDate, Utc};

use crate::constants::ranking::UNRANKED_RANK;
use crate::db::User;
use crate::domain::{ArtifactKind, SortKey};
use crate::services::UserError;
use crate::state::AppState;

/// Resolves a username, printing a hint when it is unknown.
pub(crate) async fn resolve_user(state: &AppState, username: &str) -> anyhow::Result<Option<User>> {
    match state.users.get_by_username(username).await {
        Ok(user) => Ok(Some(user)),
        Err(UserError::NotFound(_)) => {
            println!("User '{username}' not found.");
            println!("Register with: kiroku register {username}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn parse_kind(raw: &str) -> Option<ArtifactKind> {
    match raw.parse() {
        Ok(kind) => Some(kind),
        Err(_) => {
            println!("Unknown artifact kind: {raw}");
            println!(
                "Expected one of: movie, tvshow, tvshow_season, tvshow_episode, anime, anime_episode, game"
            );
            None
        }
    }
}

pub(crate) fn parse_sort(raw: Option<&str>) -> Result<Option<SortKey>, ()> {
    match raw {
        None => Ok(None),
        Some(raw) => match raw.parse() {
            Ok(key) => Ok(Some(key)),
            Err(_) => {
                println!("Unknown sort key: {raw}");
                println!("Expected one of: rank, elo, date_added, date_release");
                Err(())
            }
        },
    }
}

/// Parses a `YYYY-MM-DD` argument into a UTC midnight instant.
pub(crate) fn parse_release(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "?".to_string(), |at| at.format("%Y-%m-%d").to_string())
}

pub(crate) fn format_rank(rank: i64) -> String {
    if rank == UNRANKED_RANK {
        "-".to_string()
    } else {
        rank.to_string()
    }
}
