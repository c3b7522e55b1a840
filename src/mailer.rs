//! Email dispatch through an external `mail` process.
//!
//! The report is handed to the system mailer as
//! `mail -s <subject> <recipient>` with the message body piped to its
//! standard input. Spawn failure, a broken pipe, and a non-zero exit all
//! surface as [`MailError`]; nothing is swallowed or retried.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::info;

/// Default mail binary, resolved through `PATH`.
const DEFAULT_PROGRAM: &str = "mail";

/// Errors that can occur while dispatching mail.
#[derive(Error, Debug)]
pub enum MailError {
    /// The mail binary could not be spawned.
    #[error("failed to invoke '{program}': {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the message body to the mailer's stdin failed.
    #[error("failed to write message body to '{program}': {source}")]
    Pipe {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The mail binary exited with a non-zero status.
    #[error("'{program}' exited with {status}")]
    ExitStatus {
        /// Program that was invoked.
        program: String,
        /// The reported exit status.
        status: std::process::ExitStatus,
    },
}

/// Dispatches plaintext messages via the system mail command.
#[derive(Debug, Clone)]
pub struct Mailer {
    program: PathBuf,
}

impl Default for Mailer {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

impl Mailer {
    /// Creates a mailer using the system `mail` binary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the mail binary path. Used by tests to substitute a fake
    /// executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Sends `body` to `recipient` with the given subject line.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] when the mailer cannot be spawned, the body
    /// cannot be piped, or the mailer exits non-zero.
    pub fn send(&self, subject: &str, recipient: &str, body: &str) -> Result<(), MailError> {
        let program = self.program.to_string_lossy().into_owned();

        info!(recipient, "sending email");

        let mut child = Command::new(&self.program)
            .args(["-s", subject, recipient])
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| MailError::Spawn {
                program: program.clone(),
                source,
            })?;

        // stdin is piped above, so the handle is always present.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(body.as_bytes())
                .map_err(|source| MailError::Pipe {
                    program: program.clone(),
                    source,
                })?;
        }

        let status = child.wait().map_err(|source| MailError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(MailError::ExitStatus { program, status });
        }

        Ok(())
    }
}
