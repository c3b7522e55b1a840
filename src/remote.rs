//! Subprocess wrapper around the `transmission-remote` control binary.
//!
//! This is the only interface to the download client: no RPC, no protocol.
//! The wrapper owns process invocation and output capture; everything it
//! returns to the rest of the crate is a structured [`TorrentRecord`], so the
//! text format stays isolated behind [`crate::parser`].
//!
//! Invocations are synchronous with no timeout: a hang in the external tool
//! hangs the run. No operation retries.

use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::parser;
use crate::types::TorrentRecord;

/// Default control binary, resolved through `PATH`.
const DEFAULT_PROGRAM: &str = "transmission-remote";

/// Marker line that starts each torrent's info block in `-i` output.
const SECTION_MARKER: &str = "NAME";

/// Selector that addresses every torrent.
pub const ALL_TORRENTS: &str = "all";

/// Confirmation line printed by the daemon for a successful command, e.g.
/// `localhost:9091/transmission/rpc/ responded: "success"`.
static RESPONSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^.* responded: "(?P<value>.*)"$"#).expect("valid regex"));

/// Errors that can occur while invoking the control binary.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The binary could not be spawned (not installed, not executable).
    #[error("failed to invoke '{program}': {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The binary exited with a non-zero status.
    #[error("'{program}' exited with {status}: {stderr}")]
    ExitStatus {
        /// Program that was invoked.
        program: String,
        /// The reported exit status.
        status: std::process::ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

/// Handle to a Transmission daemon reachable through `transmission-remote`.
///
/// Credentials are passed as `-n user:pass` only when both username and
/// password are present, matching the historical behavior.
#[derive(Debug, Clone)]
pub struct TransmissionRemote {
    program: PathBuf,
    address: String,
    auth: Option<String>,
}

impl TransmissionRemote {
    /// Creates a handle for the daemon at `address`.
    #[must_use]
    pub fn new(address: String, username: Option<String>, password: Option<String>) -> Self {
        let auth = match (username, password) {
            (Some(user), Some(pass)) => Some(format!("{user}:{pass}")),
            _ => None,
        };

        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            address,
            auth,
        }
    }

    /// Overrides the control binary path. Used by tests to substitute a
    /// fake executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Runs the control binary with the connection arguments plus `args`,
    /// returning captured stdout.
    ///
    /// Stdout is decoded lossily: the tool emits human text and an odd byte
    /// must not abort the run.
    fn run(&self, args: &[&str]) -> Result<String, RemoteError> {
        let program = self.program.to_string_lossy().into_owned();

        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.address);
        if let Some(auth) = &self.auth {
            cmd.args(["-n", auth]);
        }
        cmd.args(args);

        let output = cmd.output().map_err(|source| RemoteError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(RemoteError::ExitStatus {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Lists torrents matching `selector` (torrent id list or
    /// [`ALL_TORRENTS`]) via `-t <selector> -i`.
    ///
    /// The combined output is split into per-torrent sections on the `NAME`
    /// marker. A section that fails to parse is logged and skipped; the rest
    /// of the listing survives. A section with no recognizable fields still
    /// produces an all-`None` record (lenient, matching the historical
    /// behavior).
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the binary cannot be spawned or exits
    /// non-zero.
    pub fn list(&self, selector: &str) -> Result<Vec<TorrentRecord>, RemoteError> {
        let output = self.run(&["-t", selector, "-i"])?;

        let mut records = Vec::new();
        // The first chunk precedes any marker and never holds a torrent.
        for section in output.split(SECTION_MARKER).skip(1) {
            match parser::parse_record(section) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, "skipping unparseable torrent section");
                }
            }
        }

        Ok(records)
    }

    /// Issues a stop command for `torrents` via `-t <id,id,...> -S`.
    ///
    /// Success is determined by the daemon's confirmation line matching
    /// `responded: "success"`; any other output means the command was not
    /// confirmed. Single attempt, no retry. When no record carries an id
    /// there is nothing to address: the binary is not invoked and the
    /// command is reported unconfirmed.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the binary cannot be spawned or exits
    /// non-zero.
    pub fn stop(&self, torrents: &[TorrentRecord]) -> Result<bool, RemoteError> {
        let ids: Vec<String> = torrents
            .iter()
            .filter_map(|t| t.id)
            .map(|id| id.to_string())
            .collect();
        if ids.is_empty() {
            warn!("no torrent ids to stop, skipping invocation");
            return Ok(false);
        }
        let ids_arg = ids.join(",");

        let output = self.run(&["-t", &ids_arg, "-S"])?;

        let confirmed = RESPONSE_RE
            .captures(&output)
            .and_then(|c| c.name("value"))
            .is_some_and(|m| m.as_str() == "success");

        Ok(confirmed)
    }
}
