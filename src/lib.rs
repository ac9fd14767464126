pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod ranking;
pub mod services;
pub mod state;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::commands;
use cli::{BacklogCommands, Cli, Commands};
pub use config::Config;
use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("kiroku - personal media consumption tracker");
        println!();
        println!("Run 'kiroku --help' for the full command list.");
        return Ok(());
    };

    let state = AppState::init(&config).await?;

    // Mirror service events into the log output.
    let mut events = state.events.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            debug!(?event, "domain event");
        }
    });

    match command {
        Commands::Register { username } => commands::cmd_register(&state, &username).await,

        Commands::Add {
            kind,
            title,
            parent,
            index,
            release,
            duration,
            description,
            genres,
            tags,
        } => {
            commands::cmd_add_artifact(
                &state,
                &kind,
                title,
                parent,
                index,
                release,
                duration,
                description,
                genres,
                tags,
            )
            .await
        }

        Commands::List { kind, page, search } => {
            commands::cmd_list_artifacts(&state, &kind, page, search).await
        }

        Commands::Info { username, id } => commands::cmd_artifact_info(&state, &username, id).await,

        Commands::Status {
            username,
            id,
            status,
        } => commands::cmd_set_status(&state, &username, id, &status).await,

        Commands::Score {
            username,
            id,
            score,
        } => commands::cmd_set_score(&state, &username, id, score).await,

        Commands::Rate { id, source, value } => {
            commands::cmd_rate(&state, id, &source, value).await
        }

        Commands::Remove { id } => commands::cmd_remove_artifact(&state, id).await,

        Commands::Backlog(backlog) => match backlog {
            BacklogCommands::Create {
                username,
                kind,
                title,
                strategy,
            } => commands::cmd_backlog_create(&state, &username, &kind, title, &strategy).await,
            BacklogCommands::List { username } => {
                commands::cmd_backlog_list(&state, &username).await
            }
            BacklogCommands::Show { id, sort } => {
                commands::cmd_backlog_show(&state, id, sort).await
            }
            BacklogCommands::Add { id, artifact } => {
                commands::cmd_backlog_add(&state, id, artifact).await
            }
            BacklogCommands::Remove { id, artifact } => {
                commands::cmd_backlog_remove(&state, id, artifact).await
            }
            BacklogCommands::Rank { id, artifact, rank } => {
                commands::cmd_backlog_rank(&state, id, artifact, rank).await
            }
            BacklogCommands::Tag { id, artifact, tags } => {
                commands::cmd_backlog_tag(&state, id, artifact, tags).await
            }
            BacklogCommands::Duel { id, winner, loser } => {
                commands::cmd_backlog_duel(&state, id, winner, loser).await
            }
        },

        Commands::Wishlist {
            username,
            kind,
            sort,
        } => commands::cmd_wishlist(&state, &username, &kind, sort).await,

        Commands::Upcoming { username, kind } => {
            commands::cmd_upcoming(&state, &username, &kind).await
        }
    }
}
