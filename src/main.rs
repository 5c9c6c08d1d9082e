use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use price_sentinel::{logging, watchlist, AppConfig, PriceChecker};

/// Checks every product in the watch-list files once and emails the prices.
#[derive(Parser, Debug)]
#[command(name = "price-sentinel", version, about)]
struct Cli {
    /// Application root holding config/.env (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Record product failures and continue instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,

    /// Render emails to the log without contacting the SMTP server
    #[arg(long)]
    dry_run: bool,

    /// Write each fetched page to this file
    #[arg(long, value_name = "FILE")]
    dump_html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let mut config = AppConfig::load(&root).context("Failed to load configuration")?;
    config.run.keep_going |= cli.keep_going;
    config.run.dry_run = cli.dry_run;
    if cli.dump_html.is_some() {
        config.scraper.dump_html = cli.dump_html;
    }

    let _log_guard = logging::init(config.logging.log_dir.as_deref())?;

    info!("Starting price check in {}", root.display());

    let watch_lists = watchlist::load_all(&config.watch_list.dir)?;
    let checker = PriceChecker::from_config(&config)?;
    let report = checker.run(&watch_lists).await?;

    info!(
        "Checked {} products from {} files: {} emails sent, {} failed",
        report.products_checked,
        report.files_processed,
        report.notifications_sent,
        report.notifications_failed
    );
    for failure in &report.failures {
        warn!("Not checked: {} ({})", failure.url, failure.error);
    }

    Ok(())
}
