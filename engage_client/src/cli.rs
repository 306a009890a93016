//! Start-up and shutdown shared by the command-line tools.

use std::io::{self, Write};
use std::sync::OnceLock;

use log::{error, LevelFilter};

use crate::error::ConfigError;
use crate::supporter::SupporterError;

static LOGGER: OnceLock<()> = OnceLock::new();

/// Logs to stderr. Without `RUST_LOG`, this crate and `binary` log at `level`.
pub fn init_logging(binary: &str, level: LevelFilter) {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if std::env::var("RUST_LOG").is_err() {
            builder
                .filter_module("engage_client", level)
                .filter_module(binary, level);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

/// Prints what the user needs to see about `err` and returns the exit code.
///
/// Login file problems and unknown supporters go to `out`; everything else is
/// an `Error:` line on stderr.
pub fn report<W: Write>(err: &anyhow::Error, out: &mut W) -> i32 {
    if let Some(config_err) = err.downcast_ref::<ConfigError>() {
        if let Err(write_err) = config_err.write_report(out) {
            error!("cannot write report: {}", write_err);
        }
        return config_err.exit_code();
    }

    if let Some(supporter_err @ SupporterError::NotFound { .. }) = err.downcast_ref::<SupporterError>() {
        if let Err(write_err) = writeln!(out, "{}", supporter_err) {
            error!("cannot write report: {}", write_err);
        }
        return supporter_err.exit_code();
    }

    eprintln!("Error: {:#}", err);
    1
}

/// [`report`] to stdout.
pub fn report_to_stdout(err: &anyhow::Error) -> i32 {
    report(err, &mut io::stdout())
}
