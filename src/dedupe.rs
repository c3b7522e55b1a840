//! Notification deduplication policy.
//!
//! Keeps the reminder logic apart from store I/O: every function here
//! operates on an explicit [`NotificationStore`] handle and leaves flushing
//! to the caller, except [`record_notified`] which persists before
//! returning (a notification that was sent must never be resent because a
//! later step crashed).

use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::classifier::Categorized;
use crate::store::{CategoryTimes, NotificationStore, StoreError};
use crate::types::TorrentRecord;

/// Removes store entries that no longer warrant reminder suppression.
///
/// Two kinds of entries are purged, per run, before classification:
///
/// - names absent from the current poll result (the torrent is gone), and
/// - names of currently running torrents, so a torrent that resumed
///   progress regains immediate notification eligibility if it degrades
///   again later.
///
/// Returns the number of entries removed. The caller flushes the store.
pub fn purge_stale(store: &mut NotificationStore, records: &[TorrentRecord]) -> usize {
    let current: HashSet<&str> = records.iter().filter_map(|t| t.name.as_deref()).collect();

    let mut purged = 0;
    for name in store.names() {
        if !current.contains(name.as_str()) && store.remove(&name) {
            purged += 1;
        }
    }

    for record in records.iter().filter(|t| t.is_running()) {
        if let Some(name) = record.name.as_deref() {
            if store.remove(name) {
                purged += 1;
            }
        }
    }

    if purged > 0 {
        debug!(purged, "purged stale notification entries");
    }
    purged
}

/// Filters `categories` down to the torrents that are due a notification.
///
/// A torrent is due for a category when the store holds no prior timestamp
/// for that (name, category) pair, or the prior notification is strictly
/// older than `remind_threshold`. Categories left with no members are
/// dropped entirely.
#[must_use]
pub fn filter_due(
    now: NaiveDateTime,
    remind_threshold: TimeDelta,
    categories: &Categorized,
    store: &NotificationStore,
) -> Categorized {
    let mut due = Categorized::new();

    for (&category, torrents) in categories {
        let pending: Vec<TorrentRecord> = torrents
            .iter()
            .filter(|t| {
                match store.last_notified(t.display_name(), category.label()) {
                    Some(last) => now - last > remind_threshold,
                    None => true,
                }
            })
            .cloned()
            .collect();

        if !pending.is_empty() {
            due.insert(category, pending);
        }
    }

    due
}

/// Records `now` as the last-notified timestamp for every torrent in the
/// (already filtered) category set, then flushes the store.
///
/// A torrent's store entry is replaced wholesale with the categories it
/// appeared in during this run, matching the historical overwrite
/// semantics.
///
/// # Errors
///
/// Returns [`StoreError`] when the flush fails.
pub fn record_notified(
    store: &mut NotificationStore,
    now: NaiveDateTime,
    categories: &Categorized,
) -> Result<(), StoreError> {
    let mut times_by_name: std::collections::BTreeMap<String, CategoryTimes> = Default::default();

    for (&category, torrents) in categories {
        for torrent in torrents {
            times_by_name
                .entry(torrent.display_name().to_string())
                .or_default()
                .insert(category.label().to_string(), now);
        }
    }

    for (name, times) in times_by_name {
        store.replace(&name, times);
    }

    store.flush()
}
