//! Shared formatting for CLI commands.

use chrono::NaiveDate;
use tp_core::{Currency, EntryKind, ScheduleEntry};

/// Name shown for trips created without one.
pub const UNNAMED_TRIP: &str = "Untitled trip";

/// Formats a date as `Thu 15 May 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %-d %b %Y").to_string()
}

/// `09:00-11:00`, with an entry ending at midnight shown as `24:00`.
pub fn time_range(entry: &ScheduleEntry) -> String {
    let end = if entry.end_minutes() == tp_core::time::MINUTES_PER_DAY {
        "24:00".to_string()
    } else {
        entry.end_time().to_string()
    };
    format!("{}-{end}", entry.start_time())
}

/// Bracketed details: category and cost, or mode and distance.
pub fn entry_details(entry: &ScheduleEntry, currency: Currency) -> String {
    match entry.kind() {
        EntryKind::Activity(activity) => {
            format!("[{}, {}]", activity.category, currency.display(activity.cost))
        }
        EntryKind::Travel(leg) => format!("[{}, {:.1} km]", leg.mode, leg.distance_km),
    }
}

/// `1 leg`, `3 legs`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// `1 entry`, `3 entries`.
pub fn entry_count(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{count} entries")
    }
}

/// One line describing an entry, used in confirmations and warnings.
pub fn entry_line(entry: &ScheduleEntry) -> String {
    format!(
        "'{}' on {} {}",
        entry.title(),
        format_date(entry.date()),
        time_range(entry)
    )
}
