//! Error types for transmission-watch.
//!
//! Each module defines its own error enum; this module provides the
//! aggregate [`WatchError`] used at the crate boundary, with `From`
//! conversions so library call sites can use `?` freely.

use thiserror::Error;

use crate::config::ConfigError;
use crate::mailer::MailError;
use crate::parser::ParseError;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Aggregate error for transmission-watch operations.
#[derive(Error, Debug)]
pub enum WatchError {
    /// CLI configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Torrent info block parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// `transmission-remote` invocation error.
    #[error("remote client error: {0}")]
    Remote(#[from] RemoteError),

    /// Notification store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Mail dispatch error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}

/// A specialized `Result` type for transmission-watch operations.
pub type Result<T> = std::result::Result<T, WatchError>;
