//! Artifact info command handler

use crate::cli::commands::{format_date, resolve_user};
use crate::domain::ArtifactId;
use crate::models::ArtifactNode;
use crate::services::ArtifactError;
use crate::state::AppState;

pub async fn cmd_artifact_info(state: &AppState, username: &str, id: i32) -> anyhow::Result<()> {
    let Some(user) = resolve_user(state, username).await? else {
        return Ok(());
    };

    let tree = match state.artifacts.get_tree(user.id, ArtifactId::new(id)).await {
        Ok(tree) => tree,
        Err(ArtifactError::NotFound(id)) => {
            println!("Artifact with id {id} not found.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Artifact Info");
    println!("{:-<70}", "");
    println!("Title:    {}", tree.title);
    println!("ID:       {}", tree.id);
    println!("Kind:     {}", tree.kind);
    println!("Released: {}", format_date(tree.release_date));
    if let Some(duration) = tree.duration_secs {
        println!("Duration: {} min", duration / 60);
    }
    if !tree.genres.is_empty() {
        println!("Genres:   {}", tree.genres.join(", "));
    }
    if !tree.tags.is_empty() {
        println!("Tags:     {}", tree.tags.join(", "));
    }
    match tree.mean_rating() {
        Some(mean) => println!("Rating:   {mean:.1}"),
        None => println!("Rating:   -"),
    }
    if let Some(state) = &tree.user_state {
        let status = state
            .status
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let score = state
            .score
            .map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
        println!("Status:   {status} (score {score})");
    }

    if let Ok(progress) = tree.progress() {
        let last = progress
            .last
            .map_or_else(|| "-".to_string(), |node| describe(node, Some(&tree)));
        let next = progress
            .next
            .map_or_else(|| "-".to_string(), |node| describe(node, Some(&tree)));
        println!("Watched:  {last}");
        println!("Next up:  {next}");
    }

    if !tree.children.is_empty() {
        println!();
        println!("Children ({})", tree.children.len());
        println!("{:-<70}", "");
        print_children(&tree, 1);
    }

    println!();
    Ok(())
}

fn describe(node: &ArtifactNode, parent: Option<&ArtifactNode>) -> String {
    node.sequence_label(parent)
        .map_or_else(|| node.title.clone(), |label| format!("{label} {}", node.title))
}

fn print_children(parent: &ArtifactNode, depth: usize) {
    for child in &parent.children {
        let marker = match child.status() {
            Some(crate::domain::WatchStatus::Finished) => "✓",
            Some(crate::domain::WatchStatus::Ongoing) => "▶",
            Some(crate::domain::WatchStatus::Dropped) => "✗",
            _ => "•",
        };
        println!(
            "{:indent$}{} {} (id {})",
            "",
            marker,
            describe(child, Some(parent)),
            child.id,
            indent = depth * 2
        );
        print_children(child, depth + 1);
    }
}
