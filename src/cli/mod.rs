//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod feed;
pub mod locate;
pub mod output;
pub mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Location-aware feed client for historic points of interest
#[derive(Parser)]
#[command(name = "castle-feed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and display the feed
    Feed(feed::FeedArgs),

    /// Search for a place by name
    Search(search::SearchArgs),

    /// Show the acquired device position
    Locate(locate::LocateArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Feed(args) => feed::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
