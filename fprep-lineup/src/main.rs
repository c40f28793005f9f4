//! fprep-lineup - Festival lineup extractor
//!
//! Reads poster text (for example OCR output) from a file or stdin, finds the
//! performers it names in the music catalog, and prints each performer with up
//! to three representative songs as JSON on stdout. Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use fprep_lineup::config::{ConfigOverrides, LineupConfig};
use fprep_lineup::logging;
use fprep_lineup::services::LineFilter;

/// Command-line arguments for fprep-lineup
#[derive(Parser, Debug)]
#[command(name = "fprep-lineup")]
#[command(about = "Extract performers and their top songs from festival poster text")]
#[command(version)]
struct Args {
    /// Input text file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "FPREP_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog storefront (country code)
    #[arg(long)]
    storefront: Option<String>,

    /// Catalog developer token
    #[arg(long, env = "FPREP_DEVELOPER_TOKEN", hide_env_values = true)]
    developer_token: Option<String>,

    /// Concurrent song fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Abort unless catalog access is granted
    #[arg(long)]
    enforce_authorization: bool,

    /// Print the filtered content lines and exit without catalog calls
    #[arg(long)]
    filter_only: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Before config resolution, so its warnings reach stderr
    let log_handle = logging::init();

    let overrides = ConfigOverrides {
        config_path: args.config.clone(),
        developer_token: args.developer_token.clone(),
        storefront: args.storefront.clone(),
        catalog_base_url: None,
        track_fetch_concurrency: args.concurrency,
        enforce_authorization: args.enforce_authorization,
    };
    let config = LineupConfig::resolve(&overrides).context("Failed to resolve configuration")?;

    log_handle
        .apply_level(&config.logging.level)
        .context("Invalid logging level")?;

    info!("Starting fprep-lineup {}", env!("CARGO_PKG_VERSION"));
    info!(storefront = %config.storefront, catalog = %config.catalog_base_url, "Catalog configured");

    let text = read_input(args.input.as_ref())?;

    if args.filter_only {
        let lines = LineFilter::from_config(&config).filter(&text);
        return print_json(&lines, args.pretty);
    }

    let extractor = fprep_lineup::build_http_extractor(&config)
        .context("Failed to initialize catalog client")?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping after in-flight lookups");
                signal_token.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });

    let report = extractor
        .run(&text, &cancel)
        .await
        .context("Extraction run failed")?;

    print_json(&report, args.pretty)
}
