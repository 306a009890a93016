//! Supporter Update Custom Field - Engage Supporter Tool
//!
//! Looks up a supporter by email, sets one custom field to a new value, sends
//! the supporter back and reads it again to show what the server stored.
//!
//! The login file is a flat YAML mapping:
//!
//! ```yaml
//! token:      Your-incredibly-long-Engage-token-here
//! host:       https://api.salsalabs.org
//! email:      someone@whatever.biz
//! fieldName:  custom field name
//! fieldValue: new custom field value
//! ```
//!
//! Exit codes:
//! - 0: Update sent and supporter re-read
//! - 1: Bad login file, supporter not found, or API failure
//! - 2: Bad command line

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use engage_client::supporter::update_custom_field;
use engage_client::{cli, EngageClient, UpdateConfig};
use log::{info, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "supporter_update_custom_field")]
#[command(about = "Set a custom field on the supporter with a given email")]
struct Args {
    /// YAML login file (token, host, email, fieldName, fieldValue)
    #[arg(long)]
    login: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_logging("supporter_update_custom_field", LevelFilter::Info);

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => cli::report_to_stdout(&e),
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = UpdateConfig::load(&args.login)?;
    info!("Setting '{}' for {}", config.field_name, config.email);

    let client = EngageClient::new(&config.host, &config.token)
        .with_context(|| format!("Setting up client for {}", config.host))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    update_custom_field(&client, &config, &mut out).await?;
    out.flush()?;
    Ok(())
}
