//! Token references in `config.toml`.
//!
//! `token = "pass::school/lms"` reads the first line of a `pass` entry,
//! `token = "env::LMS_TOKEN"` reads an environment variable, and any other
//! value is the token itself.

use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("could not run `pass`: {0}")]
    PassSpawn(#[source] std::io::Error),

    #[error("`pass show {entry}` exited with {status}: {stderr}")]
    PassFailed {
        entry: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`pass show {0}` printed nothing")]
    PassEmpty(String),

    #[error("environment variable `{0}` is not set")]
    EnvUnset(String),

    #[error("environment variable `{0}` is empty")]
    EnvEmpty(String),
}

/// Where a configured token comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    /// A `pass` store entry.
    Pass(&'a str),
    /// An environment variable.
    Env(&'a str),
    Literal(&'a str),
}

impl<'a> SecretRef<'a> {
    pub fn parse(value: &'a str) -> Self {
        if let Some(entry) = value.strip_prefix("pass::") {
            Self::Pass(entry)
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Literal(value)
        }
    }

    pub fn resolve(self) -> Result<String, SecretError> {
        match self {
            Self::Pass(entry) => read_pass_entry(entry),
            Self::Env(var) => match std::env::var(var) {
                Ok(value) if value.is_empty() => Err(SecretError::EnvEmpty(var.to_string())),
                Ok(value) => Ok(value),
                Err(_) => Err(SecretError::EnvUnset(var.to_string())),
            },
            Self::Literal(value) => Ok(value.to_string()),
        }
    }
}

/// Resolves a token value, following `pass::` and `env::` references.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    SecretRef::parse(value).resolve()
}

fn read_pass_entry(entry: &str) -> Result<String, SecretError> {
    let output = Command::new("pass")
        .args(["show", entry])
        .output()
        .map_err(SecretError::PassSpawn)?;

    if !output.status.success() {
        return Err(SecretError::PassFailed {
            entry: entry.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .next()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SecretError::PassEmpty(entry.to_string()))
}
