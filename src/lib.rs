//! transmission-watch - Transmission torrent monitoring and lifecycle tools.
//!
//! This crate automates monitoring of torrents managed by a remote
//! Transmission daemon, using its `transmission-remote` CLI as the only
//! interface. It polls torrent status, classifies torrents into
//! notification categories, rate-limits notifications through a small
//! persistent store, and emails a formatted report. A second tool pauses
//! torrents that have finished downloading.
//!
//! # Overview
//!
//! Each run is a linear, synchronous sequence: one external listing
//! invocation, local classification and dedup filtering, then at most one
//! stop or mail invocation and a durable store flush. There is no
//! concurrency and no retry; external failures surface as explicit errors.
//!
//! # Modules
//!
//! - [`types`]: the [`TorrentRecord`] poll snapshot
//! - [`parser`]: regex extraction of records from `transmission-remote -i` output
//! - [`remote`]: subprocess wrapper for listing and stopping torrents
//! - [`classifier`]: notification category predicates
//! - [`store`]: persistent name → category → last-notified map
//! - [`dedupe`]: purge / reminder-threshold filtering / save policy
//! - [`format`]: plaintext listing and report rendering
//! - [`mailer`]: report dispatch through the system `mail` command
//! - [`config`]: shared CLI flags and validation
//! - [`error`]: aggregate error type

pub mod classifier;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod format;
pub mod mailer;
pub mod parser;
pub mod remote;
pub mod store;
pub mod types;

pub use classifier::{classify, Categorized, Category};
pub use config::{ConfigError, RemoteArgs, RemoteConfig};
pub use error::{Result, WatchError};
pub use mailer::{MailError, Mailer};
pub use parser::{parse_record, ParseError};
pub use remote::{RemoteError, TransmissionRemote, ALL_TORRENTS};
pub use store::{CategoryTimes, NotificationStore, StoreError};
pub use types::TorrentRecord;
