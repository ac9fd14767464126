//! Remove artifact command handler

use crate::domain::ArtifactId;
use crate::services::ArtifactError;
use crate::state::AppState;

pub async fn cmd_remove_artifact(state: &AppState, id: i32) -> anyhow::Result<()> {
    match state.artifacts.delete_artifact(ArtifactId::new(id)).await {
        Ok(removed) => {
            if removed > 1 {
                println!("Removed artifact {id} and {} descendants", removed - 1);
            } else {
                println!("Removed artifact {id}");
            }
        }
        Err(ArtifactError::NotFound(id)) => println!("Artifact with id {id} not found."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
