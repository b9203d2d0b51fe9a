//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod cache;
pub mod config;
pub mod locate;
pub mod rank;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Proximity ranking for property listings
#[derive(Parser)]
#[command(name = "prop-scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank listings by distance from a position
    Rank(rank::RankArgs),

    /// Resolve a place name or listing to coordinates
    Locate(locate::LocateArgs),

    /// Inspect and manage the geocode cache
    Cache(cache::CacheArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    // Logging to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => rank::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Cache(args) => cache::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}
