//! Parser for `transmission-remote -i` torrent info blocks.
//!
//! `transmission-remote` prints one human-readable block per torrent, with
//! lines like:
//!
//! ```text
//! NAME
//!   Id: 7
//!   Name: ubuntu-24.04-desktop-amd64.iso
//!   Hash: 2c6b6858d61da9543d4231a71db4b1c9264b0685
//!   State: Seeding
//!   Percent Done: 100%
//!   ETA: 0 seconds
//!   Date added:       Wed Mar  2 23:22:05 2022
//!   Date finished:    Thu Mar  3 01:14:44 2022
//!   Latest activity:  Thu Mar  3 09:01:12 2022
//! ```
//!
//! Each known field is extracted with a line-anchored regular expression
//! capturing a named `value` group and converted to its typed form. A field
//! whose line is absent yields `None`; a field that is present but fails
//! conversion fails the whole record with [`ParseError::FieldConversion`]
//! so the caller can report it and move on to the next block.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use crate::types::TorrentRecord;

/// Timestamp layout used by `transmission-remote`, e.g.
/// `Wed Mar  2 23:22:05 2022`.
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Id: (?P<value>\d+)").expect("valid regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Name: (?P<value>.*)$").expect("valid regex"));
static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Hash: (?P<value>.*)$").expect("valid regex"));
static MAGNET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Magnet: (?P<value>.*)$").expect("valid regex"));
static STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)State: (?P<value>.*)$").expect("valid regex"));
static PERCENT_DONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Percent Done: (?P<value>.*)%$").expect("valid regex"));
static ETA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)ETA: (?P<value>\d+) seconds").expect("valid regex"));
static DATE_ADDED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Date added: (?P<value>.*)$").expect("valid regex"));
static DATE_FINISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Date finished: (?P<value>.*)$").expect("valid regex"));
static DATE_STARTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Date started: (?P<value>.*)$").expect("valid regex"));
static LATEST_ACTIVITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Latest activity: (?P<value>.*)$").expect("valid regex"));

/// Errors that can occur while parsing one torrent info block.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A field line was present but its value failed type conversion.
    #[error("field '{field}' has unparseable value '{value}'")]
    FieldConversion {
        /// Name of the field that failed.
        field: &'static str,
        /// The raw captured value.
        value: String,
    },
}

/// Extracts the raw `value` capture for a field, if its line is present.
fn capture<'t>(re: &Regex, section: &'t str) -> Option<&'t str> {
    re.captures(section)
        .and_then(|c| c.name("value"))
        .map(|m| m.as_str())
}

/// Converts a captured value to `i64`.
fn to_int(field: &'static str, value: &str) -> Result<i64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::FieldConversion {
            field,
            value: value.to_string(),
        })
}

/// Converts a captured value to `f64`. The `%` suffix is already excluded
/// by the field pattern, but the value may still be e.g. `99.9` or `100`.
fn to_float(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::FieldConversion {
            field,
            value: value.to_string(),
        })
}

/// Converts a captured value to a timestamp using [`TIMESTAMP_FORMAT`].
fn to_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        ParseError::FieldConversion {
            field,
            value: value.to_string(),
        }
    })
}

/// Parses one torrent info block into a [`TorrentRecord`].
///
/// Missing fields become `None`; the block is never rejected for
/// incompleteness. Even a block with no recognizable field yields an
/// all-`None` record, matching the lenient behavior of the listing path.
///
/// # Errors
///
/// Returns [`ParseError::FieldConversion`] when a field line is present but
/// its value cannot be converted (e.g. a garbled timestamp).
pub fn parse_record(section: &str) -> Result<TorrentRecord, ParseError> {
    let id = capture(&ID_RE, section)
        .map(|v| to_int("id", v))
        .transpose()?;
    let percent_done = capture(&PERCENT_DONE_RE, section)
        .map(|v| to_float("percent_done", v))
        .transpose()?;
    let eta = capture(&ETA_RE, section)
        .map(|v| to_int("eta", v))
        .transpose()?;
    let date_added = capture(&DATE_ADDED_RE, section)
        .map(|v| to_timestamp("date_added", v))
        .transpose()?;
    let date_finished = capture(&DATE_FINISHED_RE, section)
        .map(|v| to_timestamp("date_finished", v))
        .transpose()?;
    let date_started = capture(&DATE_STARTED_RE, section)
        .map(|v| to_timestamp("date_started", v))
        .transpose()?;
    let latest_activity = capture(&LATEST_ACTIVITY_RE, section)
        .map(|v| to_timestamp("latest_activity", v))
        .transpose()?;

    Ok(TorrentRecord {
        id,
        name: capture(&NAME_RE, section).map(|v| v.trim().to_string()),
        hash: capture(&HASH_RE, section).map(|v| v.trim().to_string()),
        magnet: capture(&MAGNET_RE, section).map(|v| v.trim().to_string()),
        state: capture(&STATE_RE, section).map(|v| v.trim().to_string()),
        percent_done,
        eta,
        date_added,
        date_finished,
        date_started,
        latest_activity,
    })
}
