//! Shared CLI configuration for the transmission-watch tools.
//!
//! Both binaries take the same daemon connection flags. The flags are
//! declared optional so a missing required flag produces the historical
//! "exit 1 with a message" behavior instead of clap's usage error, and the
//! underscore spellings (`--remind_threshold`, ...) are kept for
//! compatibility with existing cron lines.

use clap::Args;
use thiserror::Error;

/// Default reminder threshold: 5 hours.
pub const DEFAULT_REMIND_THRESHOLD_SECS: i64 = 5 * 60 * 60;

/// Default stopped-too-long threshold: 1 hour.
pub const DEFAULT_STOPPED_THRESHOLD_SECS: i64 = 60 * 60;

/// Errors that can occur while validating CLI configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required flag was not supplied.
    #[error("required flag --{0} is missing")]
    MissingFlag(&'static str),
}

/// Daemon connection flags shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Address of the Transmission daemon (host or host:port).
    #[arg(long)]
    pub address: Option<String>,

    /// Username for daemon authentication.
    #[arg(long)]
    pub username: Option<String>,

    /// Password for daemon authentication.
    #[arg(long)]
    pub password: Option<String>,
}

/// Validated daemon connection parameters.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Daemon address.
    pub address: String,

    /// Optional username; only used together with a password.
    pub username: Option<String>,

    /// Optional password; only used together with a username.
    pub password: Option<String>,
}

impl RemoteArgs {
    /// Validates the connection flags into a [`RemoteConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFlag`] when `--address` was not
    /// supplied.
    pub fn validate(self) -> Result<RemoteConfig, ConfigError> {
        let address = self.address.ok_or(ConfigError::MissingFlag("address"))?;

        Ok(RemoteConfig {
            address,
            username: self.username,
            password: self.password,
        })
    }
}
