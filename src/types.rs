//! Core data types for transmission-watch.
//!
//! The central type is [`TorrentRecord`], an immutable snapshot of one
//! torrent's state at poll time, reconstructed from the human-readable
//! output of `transmission-remote`. Every field is optional: the output
//! format carries no guarantees, and a field the parser cannot find is
//! represented as `None`, never as a sentinel value.

use chrono::NaiveDateTime;

/// Placeholder shown for a torrent whose `Name` line was missing.
const UNKNOWN_NAME: &str = "(unknown)";

/// A snapshot of one torrent's state at poll time.
///
/// The `name` field is the stable identity key across polls: it joins the
/// current listing against the persisted notification history. Transmission
/// does expose a content hash, but the historical store schema is keyed by
/// name, so two distinct torrents sharing a name conflate in notification
/// history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TorrentRecord {
    /// Client-assigned torrent id, used to address stop commands.
    pub id: Option<i64>,

    /// Torrent name; identity key for notification deduplication.
    pub name: Option<String>,

    /// Info hash, if the listing included one.
    pub hash: Option<String>,

    /// Magnet link, if the listing included one.
    pub magnet: Option<String>,

    /// Free-form state string (`"Stopped"`, `"Seeding"`, ...). Comparisons
    /// are case-insensitive; only `"stopped"` is significant to policy.
    pub state: Option<String>,

    /// Completion percentage in `[0, 100]`.
    pub percent_done: Option<f64>,

    /// Estimated seconds remaining, when the client reports one.
    pub eta: Option<i64>,

    /// When the torrent was added.
    pub date_added: Option<NaiveDateTime>,

    /// When the download completed.
    pub date_finished: Option<NaiveDateTime>,

    /// When the torrent was last started.
    pub date_started: Option<NaiveDateTime>,

    /// Last observed transfer activity.
    pub latest_activity: Option<NaiveDateTime>,
}

impl TorrentRecord {
    /// Returns the torrent name, or a placeholder when the listing had none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    /// Returns `true` if the download has completed (100%).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.percent_done == Some(100.0)
    }

    /// Returns `true` if the client reports the torrent as stopped.
    ///
    /// State comparison is case-insensitive. A record with no state is not
    /// considered stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("stopped"))
    }

    /// Returns `true` if the torrent is still making (or able to make)
    /// progress: incomplete and not stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.is_finished() && !self.is_stopped()
    }
}
