//! transmission-pause - pause torrents that have finished downloading.
//!
//! Independent of the notification tool: lists all torrents, filters those
//! that are complete but still running, prints the targets, and issues a
//! single stop command. Exits 1 when `--address` is missing or the daemon
//! does not confirm the stop.

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transmission_watch::config::RemoteArgs;
use transmission_watch::{TorrentRecord, TransmissionRemote, ALL_TORRENTS};

/// Pause Transmission torrents that have completed their download.
#[derive(Parser, Debug)]
#[command(name = "transmission-pause")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    remote: RemoteArgs,
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

fn run(cli: Cli) -> anyhow::Result<()> {
    let remote_config = cli.remote.validate()?;
    let remote = TransmissionRemote::new(
        remote_config.address,
        remote_config.username,
        remote_config.password,
    );

    let torrents = remote
        .list(ALL_TORRENTS)
        .context("failed to list torrents")?;

    let finished: Vec<TorrentRecord> = torrents
        .into_iter()
        .filter(|t| t.is_finished() && !t.is_stopped())
        .collect();

    if finished.is_empty() {
        info!("no finished torrents to pause");
        return Ok(());
    }

    println!("Stopping the following torrents");
    for torrent in &finished {
        println!(
            "  {} {}",
            torrent.display_name(),
            torrent.state.as_deref().unwrap_or("-")
        );
    }

    let confirmed = remote
        .stop(&finished)
        .context("failed to stop torrents")?;
    if !confirmed {
        bail!("transmission-remote did not confirm the stop request");
    }

    info!(count = finished.len(), "stopped finished torrents");
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
