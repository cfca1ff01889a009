mod pdf;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flyer-cli")]
#[command(about = "Flyer archive command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every offer in a region and print the run report as JSON.
    Scrape {
        #[arg(long)]
        country: String,
        #[arg(long)]
        region: String,
    },
    /// Assemble the images in a local offer folder into a PDF.
    Pdf {
        #[arg(long)]
        folder: PathBuf,
        /// Full offer title; shortened the same way as during a scrape.
        #[arg(long)]
        title: String,
        /// Offer id taken from the detail URL.
        #[arg(long)]
        id: String,
        /// Output path; defaults to `<folder>/<pdf name>`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies.
fn log_filter(rust_log: Option<&str>, config_level: &str) -> Result<EnvFilter, ParseError> {
    rust_log
        .map_or_else(|| EnvFilter::try_new(config_level), EnvFilter::try_new)
        .or_else(|_| EnvFilter::try_new(config_level))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = flyer_core::load_app_config()?;
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), &config.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { country, region } => {
            scrape::run_scrape(&config, &country, &region).await
        }
        Commands::Pdf {
            folder,
            title,
            id,
            out,
        } => pdf::run_pdf(folder, &title, &id, out).await,
    }
}
