//! Engage Client - shared core for the Engage command-line tools
//!
//! Talks to the Salsa Engage integration API:
//! - Loads and validates the YAML login file every tool is started with
//! - Pages through activity (donation) searches until the server runs dry
//! - Looks up a supporter by email, rewrites one custom field and re-reads it
//!
//! Everything runs one request at a time; output goes through `std::io::Write`.

pub mod activities;
pub mod cli;
pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod model;
pub mod printer;
pub mod supporter;

#[cfg(test)]
mod testing;

pub use client::{EngageApi, EngageClient};
pub use config::{Credentials, SearchConfig, SupporterConfig, UpdateConfig};
pub use cursor::{Page, PageSource, PagedCursor};
pub use error::{ApiError, ConfigError};
pub use supporter::SupporterError;
