//! Add artifact command handler

use crate::cli::commands::{parse_kind, parse_release};
use crate::domain::ArtifactId;
use crate::models::NewArtifact;
use crate::state::AppState;

#[allow(clippy::too_many_arguments)]
pub async fn cmd_add_artifact(
    state: &AppState,
    kind: &str,
    title: String,
    parent: Option<i32>,
    index: Option<i32>,
    release: Option<String>,
    duration: Option<i64>,
    description: Option<String>,
    genres: Vec<String>,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    let Some(kind) = parse_kind(kind) else {
        return Ok(());
    };

    let release_date = match release.as_deref() {
        Some(raw) => match parse_release(raw) {
            Some(at) => Some(at),
            None => {
                println!("Invalid release date '{raw}', expected YYYY-MM-DD");
                return Ok(());
            }
        },
        None => None,
    };

    let new = NewArtifact {
        title: title.clone(),
        kind,
        parent_id: parent.map(ArtifactId::new),
        child_index: index,
        release_date,
        duration_secs: duration,
        description,
        tags,
    };

    let id = state.artifacts.add_artifact(new).await?;
    if !genres.is_empty() {
        state.artifacts.set_genres(id, genres).await?;
    }

    println!("Added {kind} '{title}' with id {id}");
    Ok(())
}
