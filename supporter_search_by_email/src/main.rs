//! Supporter Search By Email - Engage Supporter Tool
//!
//! Finds the supporter registered under an email address and prints the
//! record as pretty JSON.
//!
//! Login file keys: `token`, `host`, `email`.
//!
//! Exit codes:
//! - 0: Supporter found and printed
//! - 1: Bad login file, supporter not found, or API failure
//! - 2: Bad command line

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use engage_client::supporter::print_supporter_json;
use engage_client::{cli, EngageClient, SupporterConfig};
use log::{debug, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "supporter_search_by_email")]
#[command(about = "Print the supporter record for an email address")]
struct Args {
    /// YAML login file (token, host, email)
    #[arg(long)]
    login: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_logging("supporter_search_by_email", LevelFilter::Warn);

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => cli::report_to_stdout(&e),
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = SupporterConfig::load(&args.login)?;
    let client = EngageClient::new(&config.host, &config.token)
        .with_context(|| format!("Setting up client for {}", config.host))?;

    debug!("Looking up {}", config.email);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_supporter_json(&client, &config.email, &mut out).await?;
    out.flush()?;
    Ok(())
}
