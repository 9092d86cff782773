//! Dates command for moving or resizing the trip window.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use tp_core::TripWindow;
use tp_db::Database;

use super::plan::Plan;
use super::util::format_date;

#[derive(Debug, Args)]
pub struct DatesArgs {
    /// New first day (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// New last day (YYYY-MM-DD).
    #[arg(long)]
    pub end: NaiveDate,
}

/// Changes the trip dates. Fails without saving when an entry would be left
/// outside the new window.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &DatesArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut plan = Plan::require(db)?;
    let window = TripWindow::new(args.start, args.end).context("invalid trip dates")?;
    plan.store
        .set_window(window)
        .context("cannot change the trip dates")?;
    plan.weather_cache.retain(|date, _| window.contains(*date));
    plan.save(db, now)?;

    writeln!(
        writer,
        "Trip dates are now {} to {} ({} days).",
        format_date(window.start()),
        format_date(window.end()),
        window.day_count()
    )?;
    Ok(())
}
