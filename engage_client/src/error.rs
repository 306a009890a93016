use std::io::{self, Write};

use thiserror::Error;

/// Problems with the `--login` YAML file. All of them are raised before any
/// request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path} must be a mapping of keys to values")]
    NotAMapping { path: String },

    /// Every required key that was absent, in the order they were required.
    #[error("{path} is missing {} required key(s): {}", missing.len(), missing.join(", "))]
    MissingKeys { path: String, missing: Vec<String> },

    #[error("{path}: '{key}' has an invalid value '{value}' ({reason})")]
    InvalidValue {
        path: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Lines to show the user, one per problem.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            Self::MissingKeys { path, missing } => missing
                .iter()
                .map(|key| format!("Error: {} must contain a {}.", path, key))
                .collect(),
            other => vec![format!("Error: {}", other)],
        }
    }

    /// Writes the diagnostics followed by the closing line the tools end on.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.diagnostics() {
            writeln!(out, "{}", line)?;
        }
        if matches!(self, Self::MissingKeys { .. }) {
            writeln!(out, "Too many errors, terminating.")?;
        }
        Ok(())
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Failures talking to the Engage API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
