//! Search All Donations - Engage Activity Report
//!
//! Pages through the donation activities modified inside a date range and
//! prints one line per activity:
//!
//! ```text
//! [offset:index] activityId activityFormName activityDate activityType donationId totalReceivedAmount
//! ```
//!
//! The login file is a flat YAML mapping:
//!
//! ```yaml
//! token:          "your-incredibly-long-token"
//! host:           "https://api.salsalabs.org"
//! identifierType: FUNDRAISE
//! modifiedFrom:   "2018-07-01T00:00:00.000Z"
//! modifiedTo:     "2018-07-31T23:59:59.999Z"
//! ```
//!
//! Optional keys: `pageSize` (default 20), `showTransactions`, `legacyModifiedToKey`.
//!
//! Exit codes:
//! - 0: Search finished (a failed request ends the search early, it is logged)
//! - 1: Bad login file or client setup
//! - 2: Bad command line

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use engage_client::activities::print_all_activities;
use engage_client::{cli, EngageClient, SearchConfig};
use log::{info, warn, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "search_all_donations")]
#[command(about = "Print every donation activity modified in a date range")]
struct Args {
    /// YAML login file (token, host, identifierType, modifiedFrom, modifiedTo)
    #[arg(long)]
    login: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_logging("search_all_donations", LevelFilter::Info);

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => cli::report_to_stdout(&e),
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = SearchConfig::load(&args.login)?;
    info!(
        "Searching {} activities modified {} .. {}",
        config.identifier_type, config.modified_from, config.modified_to
    );

    let client = EngageClient::new(&config.host, &config.token)
        .with_context(|| format!("Setting up client for {}", config.host))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = print_all_activities(&client, &config, &mut out)
        .await
        .context("Writing activities")?;
    out.flush()?;

    if summary.interrupted {
        warn!("Search stopped early after {} activities", summary.records);
    }
    Ok(())
}
