//! CLI module - Command-line interface for Kiroku
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// Kiroku - personal media consumption tracker
/// Track movies, shows, anime, and games; rank them into backlogs
#[derive(Parser)]
#[command(name = "kiroku")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new user
    Register {
        username: String,
    },

    /// Add an artifact to the library
    #[command(alias = "a")]
    Add {
        /// movie | tvshow | tvshow_season | tvshow_episode | anime | anime_episode | game
        kind: String,
        title: String,

        /// Parent artifact id (season under a show, episode under a season)
        #[arg(long)]
        parent: Option<i32>,

        /// 1-based position among siblings
        #[arg(long)]
        index: Option<i32>,

        /// Release date as YYYY-MM-DD
        #[arg(long)]
        release: Option<String>,

        /// Duration in seconds
        #[arg(long)]
        duration: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_delimiter = ',')]
        genres: Vec<String>,

        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List artifacts of one kind
    #[command(alias = "ls", alias = "l")]
    List {
        kind: String,

        #[arg(long, default_value_t = 0)]
        page: u64,

        #[arg(long)]
        search: Option<String>,
    },

    /// Show an artifact tree with ratings and progress
    Info {
        username: String,
        id: i32,
    },

    /// Set your watch status (dropped | finished | ongoing | onhold | wishlist)
    Status {
        username: String,
        id: i32,
        status: String,
    },

    /// Set your personal score
    Score {
        username: String,
        id: i32,
        score: f64,
    },

    /// Attach a critic/audience rating to an artifact
    Rate {
        id: i32,
        /// imdb | metacritic | rotten_tomatoes | anilist | opencritic | steam | gog
        source: String,
        value: f64,
    },

    /// Remove an artifact, its descendants, and everything referencing them
    #[command(alias = "rm")]
    Remove {
        id: i32,
    },

    /// Backlog management
    #[command(subcommand)]
    Backlog(BacklogCommands),

    /// Virtual wishlist view (released artifacts you wishlisted)
    Wishlist {
        username: String,
        kind: String,

        /// rank | elo | date_added | date_release
        #[arg(long)]
        sort: Option<String>,
    },

    /// Virtual future-releases view
    Upcoming {
        username: String,
        kind: String,
    },
}

#[derive(Subcommand)]
pub enum BacklogCommands {
    /// Create a backlog
    Create {
        username: String,
        kind: String,
        title: String,

        /// rank | elo | wishlist
        #[arg(long, default_value = "elo")]
        strategy: String,
    },

    /// List your backlogs
    List {
        username: String,
    },

    /// Show a backlog's ranked entries
    Show {
        id: i64,

        /// rank | elo | date_added | date_release
        #[arg(long)]
        sort: Option<String>,
    },

    /// Add an artifact to a backlog
    Add {
        id: i64,
        artifact: i32,
    },

    /// Remove an artifact from a backlog
    Remove {
        id: i64,
        artifact: i32,
    },

    /// Set (or clear, by omitting) an entry's manual rank
    Rank {
        id: i64,
        artifact: i32,
        rank: Option<i64>,
    },

    /// Replace an entry's tags (scoped to the backlog entry)
    Tag {
        id: i64,
        artifact: i32,
        #[arg(value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Record a duel: the winner takes Elo points from the loser
    Duel {
        id: i64,
        winner: i32,
        loser: i32,
    },
}
