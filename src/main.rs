//! transmission-watch - torrent notification report tool.
//!
//! Polls the Transmission daemon through `transmission-remote`, classifies
//! torrents into notification categories, filters out recently-notified
//! torrents against the persistent store, and emails (or prints) a
//! formatted report.
//!
//! # Flags
//!
//! - `--dump_db`: print the persisted notification state and exit
//! - `--address`, `--username`, `--password`: daemon connection
//! - `--email`: report recipient; when absent the report goes to stdout
//! - `--db`: path to the notification store (required unless dumping)
//! - `--remind_threshold`: seconds before re-notifying (default 18000)
//! - `--stopped_threshold`: stopped-inactivity cutoff in seconds (default 3600)
//!
//! Exits 1 when required flags are missing or any external step fails.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, TimeDelta};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transmission_watch::config::{
    ConfigError, RemoteArgs, DEFAULT_REMIND_THRESHOLD_SECS, DEFAULT_STOPPED_THRESHOLD_SECS,
};
use transmission_watch::{
    classify, dedupe, format, Mailer, NotificationStore, TransmissionRemote, ALL_TORRENTS,
};

/// Subject line for notification emails.
const MAIL_SUBJECT: &str = "Torrents need your attention";

/// Transmission torrent watcher - notification report tool.
///
/// Designed to run from cron: at most one instance at a time per store
/// file, one listing per run, at most one email per run.
#[derive(Parser, Debug)]
#[command(name = "transmission-watch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the persisted notification state and exit.
    #[arg(long = "dump_db", default_value_t = false)]
    dump_db: bool,

    #[command(flatten)]
    remote: RemoteArgs,

    /// Report recipient; when absent the report is printed to stdout.
    #[arg(long)]
    email: Option<String>,

    /// Path to the persistent notification store.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Seconds before re-notifying for a condition that persists.
    #[arg(long = "remind_threshold", default_value_t = DEFAULT_REMIND_THRESHOLD_SECS)]
    remind_threshold: i64,

    /// Seconds of inactivity before a stopped, incomplete torrent is flagged.
    #[arg(long = "stopped_threshold", default_value_t = DEFAULT_STOPPED_THRESHOLD_SECS)]
    stopped_threshold: i64,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Executes one notification run: list, purge, classify, filter, report,
/// record.
fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.dump_db {
        // Without a store path there is nothing recorded to print.
        if let Some(path) = &cli.db {
            let store = NotificationStore::open(path)
                .with_context(|| format!("failed to open store at {}", path.display()))?;
            for (name, times) in store.iter() {
                println!("{name} {}", serde_json::to_string(times)?);
            }
        }
        return Ok(());
    }

    let db_path = cli.db.ok_or(ConfigError::MissingFlag("db"))?;
    let mut store = NotificationStore::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;

    let remote_config = cli.remote.validate()?;

    let now = Local::now().naive_local();
    let remind_threshold = TimeDelta::seconds(cli.remind_threshold);
    let stopped_threshold = TimeDelta::seconds(cli.stopped_threshold);

    let remote = TransmissionRemote::new(
        remote_config.address,
        remote_config.username,
        remote_config.password,
    );
    let torrents = remote
        .list(ALL_TORRENTS)
        .context("failed to list torrents")?;
    info!(count = torrents.len(), "listed torrents");

    println!("{}", format::format_torrents(&torrents, now));

    // Entries for vanished or resumed torrents lose their reminder
    // suppression before this run's categories are computed.
    dedupe::purge_stale(&mut store, &torrents);
    store
        .flush()
        .context("failed to flush notification store")?;

    let categories = classify(&torrents, now, stopped_threshold);
    let due = dedupe::filter_due(now, remind_threshold, &categories, &store);
    info!(
        categorized = categories.len(),
        due = due.len(),
        "classified torrents"
    );

    if !due.is_empty() {
        let report = format::format_report(&due, now);
        match &cli.email {
            Some(recipient) => Mailer::new()
                .send(MAIL_SUBJECT, recipient, &report)
                .context("failed to send report email")?,
            None => print!("{report}"),
        }
    }

    dedupe::record_notified(&mut store, now, &due)
        .context("failed to record notification times")?;

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
