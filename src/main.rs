use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use estuary::app::AppContext;
use estuary::cli::{commands, Cli, Commands};
use estuary::config::Config;
use estuary::daemon::{Daemon, DaemonConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("estuary=info")))
        .init();

    // A missing .env file is fine; the key may come from the real environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build { categories, output } => {
            let ctx = AppContext::new(config, output)?;
            commands::build(&ctx, &categories).await?;
        }
        Commands::Categories => {
            commands::list_categories(&config)?;
        }
        Commands::Window { at } => {
            commands::show_window(&config, at.as_deref())?;
        }
        Commands::Daemon {
            interval,
            no_initial_build,
            output,
        } => {
            let build_interval_secs =
                DaemonConfig::parse_interval(&interval).map_err(anyhow::Error::msg)?;
            let ctx = Arc::new(AppContext::new(config, output)?);
            let daemon = Daemon::new(
                ctx,
                DaemonConfig {
                    build_interval_secs,
                    build_on_start: !no_initial_build,
                },
            );
            daemon.run().await?;
        }
    }

    Ok(())
}
