//! Notification category classification.
//!
//! Partitions a poll snapshot into named categories based on completion
//! percentage, state, and a "stopped too long" inactivity threshold. A
//! torrent may satisfy several category predicates at once; no exclusivity
//! is enforced.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

use crate::types::TorrentRecord;

/// A notification condition a torrent may currently satisfy.
///
/// The [`label`](Category::label) doubles as the persisted key inside
/// notification-store values, so it must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Download has completed.
    Finished,

    /// Incomplete, stopped, and inactive for longer than the configured
    /// threshold.
    StoppedTooLong,
}

impl Category {
    /// Stable human-readable label, also used as the store key.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Finished => "Finished",
            Category::StoppedTooLong => "Stopped for too long",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Torrents grouped by the categories they currently satisfy.
///
/// A `BTreeMap` keeps report sections in a deterministic order.
pub type Categorized = BTreeMap<Category, Vec<TorrentRecord>>;

/// Classifies the current record set against the known categories.
///
/// - [`Category::Finished`]: `percent_done == 100.0`, regardless of state.
/// - [`Category::StoppedTooLong`]: incomplete, stopped, and
///   `latest_activity < now - stopped_threshold`. A record with no
///   `latest_activity` is excluded: staleness cannot be proven.
///
/// Categories with no members are not present in the result.
#[must_use]
pub fn classify(
    records: &[TorrentRecord],
    now: NaiveDateTime,
    stopped_threshold: TimeDelta,
) -> Categorized {
    let stale_before = now - stopped_threshold;

    let finished: Vec<TorrentRecord> = records
        .iter()
        .filter(|t| t.is_finished())
        .cloned()
        .collect();

    let stopped_too_long: Vec<TorrentRecord> = records
        .iter()
        .filter(|t| {
            !t.is_finished()
                && t.is_stopped()
                && t.latest_activity.is_some_and(|at| at < stale_before)
        })
        .cloned()
        .collect();

    let mut categories = Categorized::new();
    if !finished.is_empty() {
        categories.insert(Category::Finished, finished);
    }
    if !stopped_too_long.is_empty() {
        categories.insert(Category::StoppedTooLong, stopped_too_long);
    }
    categories
}
