mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cardprobe")]
#[command(about = "Resolve numeric product identifiers into product cards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve one identifier through every source in priority order
    Resolve {
        /// Numeric product identifier
        id: String,
    },
    /// Resolve several identifiers sequentially, pausing between them
    Batch {
        /// Numeric product identifiers, resolved in the given order
        ids: Vec<String>,
        /// Override the configured maximum batch size
        #[arg(long)]
        max_batch: Option<usize>,
        /// Skip the pause between identifiers
        #[arg(long)]
        no_pacing: bool,
    },
    /// Print the storage candidate URLs for an identifier without fetching
    Addresses {
        /// Numeric product identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cardprobe_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Resolve { id } => commands::run_resolve(&config, &id).await,
        Commands::Batch {
            ids,
            max_batch,
            no_pacing,
        } => commands::run_batch(&config, &ids, max_batch, no_pacing).await,
        Commands::Addresses { id } => commands::run_addresses(&config, &id),
    }
}

#[cfg(test)]
mod tests;
