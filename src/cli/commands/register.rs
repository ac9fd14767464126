//! User registration command handler

use crate::services::UserError;
use crate::state::AppState;

pub async fn cmd_register(state: &AppState, username: &str) -> anyhow::Result<()> {
    match state.users.register(username).await {
        Ok(user) => {
            println!("Registered user '{}' (id {})", user.username, user.id);
        }
        Err(UserError::AlreadyExists(name)) => {
            println!("User '{name}' already exists.");
        }
        Err(UserError::InvalidUsername(reason)) => {
            println!("Invalid username: {reason}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
