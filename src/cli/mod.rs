pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "estuary")]
#[command(about = "Build per-category video listings from search and feed sources", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/estuary/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build artifacts for all or selected categories
    Build {
        /// Only build this category (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,

        /// Override the output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List configured categories and their sources
    Categories,
    /// Show the previous-day window used by time-windowed categories
    Window {
        /// Instant to compute the window from (RFC 3339, default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Rebuild all categories periodically in the foreground
    Daemon {
        /// Build interval (e.g., "1h", "30m", "6h", "1d")
        #[arg(short, long, default_value = "6h")]
        interval: String,

        /// Skip the build on start
        #[arg(long)]
        no_initial_build: bool,

        /// Override the output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
