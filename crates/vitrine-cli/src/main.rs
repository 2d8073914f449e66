mod crawl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(about = "Retail catalog crawler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl every category in the seeds file and persist product records.
    Crawl {
        /// Seeds file to use instead of the configured one.
        #[arg(long)]
        seeds: Option<PathBuf>,
    },
    /// Refresh category.json from the category sitemap.
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vitrine_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl { seeds } => crawl::run_crawl(&config, seeds.as_deref()).await,
        Commands::Categories => crawl::run_categories(&config).await,
    }
}
