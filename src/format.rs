//! Plaintext rendering of torrent records and notification reports.
//!
//! Two row renderers exist: a right-justified `label: value` list (the
//! active default for reports) and a bordered fixed-width table. Absent
//! values render as `-`. Pure formatting over already-validated data; no
//! error paths.

use chrono::{NaiveDateTime, TimeDelta};

use crate::classifier::Categorized;
use crate::types::TorrentRecord;

/// Date layout used in reports, e.g. `Saturday 12:00 01-06-2024`.
const DATE_FORMAT: &str = "%A %H:%M %d-%m-%Y";

/// Placeholder for absent values.
const MISSING: &str = "-";

/// Column headers for torrent rows.
const HEADERS: [&str; 6] = [
    "Name",
    "State",
    "Percent done",
    "Latest activity",
    "Date finished",
    "Since finished",
];

/// Renders a duration compactly, e.g. `1d 3h 25m`. Sub-minute durations
/// (and any negative clock skew) render as `0m`.
#[must_use]
pub fn format_duration(duration: TimeDelta) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}

fn format_date(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(d) => d.format(DATE_FORMAT).to_string(),
        None => MISSING.to_string(),
    }
}

/// Builds the display row for one record, in [`HEADERS`] order.
fn torrent_row(torrent: &TorrentRecord, now: NaiveDateTime) -> [String; 6] {
    let percent = match torrent.percent_done {
        // Integral values keep one decimal, so 100 reads `100.0%` as in
        // the historical reports.
        Some(p) if p.fract() == 0.0 => format!("{p:.1}%"),
        Some(p) => format!("{p}%"),
        None => MISSING.to_string(),
    };
    let since_finished = match torrent.date_finished {
        Some(finished) => format_duration(now - finished),
        None => MISSING.to_string(),
    };

    [
        torrent.display_name().to_string(),
        torrent.state.clone().unwrap_or_else(|| MISSING.to_string()),
        percent,
        format_date(torrent.latest_activity),
        format_date(torrent.date_finished),
        since_finished,
    ]
}

fn torrent_rows(torrents: &[TorrentRecord], now: NaiveDateTime) -> Vec<[String; 6]> {
    let mut rows: Vec<[String; 6]> = torrents.iter().map(|t| torrent_row(t, now)).collect();
    rows.sort_by(|a, b| a[0].cmp(&b[0]));
    rows
}

/// Renders rows as right-justified `label: value` blocks, one blank line
/// between torrents.
fn format_list(rows: &[[String; 6]]) -> String {
    let width = HEADERS.iter().map(|h| h.len()).max().unwrap_or(0) + 1;

    let mut out = String::new();
    for row in rows {
        for (header, value) in HEADERS.iter().zip(row) {
            out.push_str(&format!("{header:>width$}: {value}\n"));
        }
        out.push('\n');
    }
    out
}

/// Renders rows as a bordered fixed-width table.
#[must_use]
pub fn format_table(torrents: &[TorrentRecord], now: NaiveDateTime) -> String {
    let rows = torrent_rows(torrents, now);

    let widths: Vec<usize> = HEADERS
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let cell_max = rows.iter().map(|r| r[col].len()).max().unwrap_or(0);
            header.len().max(cell_max) + 2
        })
        .collect();

    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(*w)))
        .chain(std::iter::once("+\n".to_string()))
        .collect();

    let format_line = |cells: &[String]| -> String {
        let mut line = String::new();
        for (cell, width) in cells.iter().zip(&widths) {
            line.push_str(&format!("| {cell:<pad$}", pad = width - 1));
        }
        line.push_str("|\n");
        line
    };

    let header_cells: Vec<String> = HEADERS.iter().map(|h| (*h).to_string()).collect();

    let mut out = separator.clone();
    out.push_str(&format_line(&header_cells));
    out.push_str(&separator);
    for row in &rows {
        out.push_str(&format_line(row));
    }
    out.push_str(&separator);
    out
}

/// Renders torrents in the list form, sorted by name. This is the active
/// default used by the notify tool.
#[must_use]
pub fn format_torrents(torrents: &[TorrentRecord], now: NaiveDateTime) -> String {
    format_list(&torrent_rows(torrents, now))
}

/// Renders a multi-section report with a banner header per category.
#[must_use]
pub fn format_report(categories: &Categorized, now: NaiveDateTime) -> String {
    let mut out = String::new();
    for (category, torrents) in categories {
        out.push_str(&format!("========= {category} =========\n"));
        out.push_str(&format_torrents(torrents, now));
        out.push('\n');
    }
    out
}
