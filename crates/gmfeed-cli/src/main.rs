mod generate;
mod validate;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gmfeed")]
#[command(about = "Google Merchant Center product feed generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the RSS feed from a catalog snapshot
    Generate {
        /// Catalog snapshot (.yaml, .yml or .json); defaults to `GMFEED_CATALOG_PATH`
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Write the feed to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Evaluate discount rules at this shop-local time (YYYY-MM-DD HH:MM:SS)
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDateTime>,
    },
    /// Check that a generated feed parses and has unique item ids
    Validate {
        /// Feed file to check
        #[arg(long)]
        feed: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            catalog,
            output,
            as_of,
        } => {
            let config = gmfeed_core::load_feed_config()?;
            init_tracing(&config.log_level)?;
            generate::run_generate(&config, catalog, output, as_of)
        }
        Commands::Validate { feed } => {
            let level = std::env::var("GMFEED_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            init_tracing(&level)?;
            validate::run_validate(&feed)
        }
    }
}

/// Logs go to stderr so stdout carries nothing but the feed.
fn init_tracing(fallback_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn parse_as_of(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DD HH:MM:SS: {e}"))
}

#[cfg(test)]
mod tests;
