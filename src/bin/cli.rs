//! Caption contest downloader CLI
//!
//! Downloads cartoons, caption summaries and winner records for a range or
//! list of contests.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use contest_fetch::{
    config::load_config,
    error::Result,
    models::{ContestId, Outcome, Selection},
    pipeline::{self, LogProgress},
    utils::http,
};

/// contest-fetch - Caption Contest Downloader
#[derive(Parser, Debug)]
#[command(
    name = "contest-fetch",
    version,
    about = "Download caption contest cartoons, summaries and winners"
)]
struct Cli {
    /// Starting contest ID. Used with --end to create an inclusive range.
    #[arg(long, default_value_t = 660)]
    start: ContestId,

    /// Ending contest ID. Used with --start to create an inclusive range.
    #[arg(long, default_value_t = 790)]
    end: ContestId,

    /// Discrete list of contests to retrieve. Ignores --start and --end.
    #[arg(short, long, num_args = 1..)]
    list: Option<Vec<ContestId>>,

    /// Re-download contests that already exist locally.
    #[arg(long = "override")]
    override_existing: bool,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory to store contests in (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn selection(&self) -> Selection {
        Selection {
            start: self.start,
            end: self.end,
            list: self.list.clone(),
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(&cli.config)?;
    if let Some(dir) = &cli.data_dir {
        config.output.data_dir = dir.clone();
    }

    let identifiers = cli.selection().resolve_identifiers();
    log::info!("Contests: {:?}", identifiers);

    let client = Arc::new(http::create_client(&config.http)?);
    let summary = pipeline::run_download(
        &config,
        client,
        &identifiers,
        cli.override_existing,
        &LogProgress,
    )
    .await?;

    for (id, message) in &summary.errors {
        log::warn!("Contest {} aborted: {}", id, message);
    }
    let failed: Vec<_> = summary
        .outcomes
        .iter()
        .filter(|(_, outcome)| **outcome == Outcome::Failed)
        .map(|(id, _)| *id)
        .collect();
    if !failed.is_empty() {
        log::info!("Failed contests: {:?}", failed);
    }

    if let Some(path) = &cli.summary {
        summary.save(path)?;
        log::info!("Run summary written to {}", path.display());
    }

    log::info!("Done!");

    Ok(())
}
