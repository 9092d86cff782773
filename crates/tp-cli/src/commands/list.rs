//! List command for showing the plan day by day.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tp_core::time::format_minutes;
use tp_core::{
    ScheduleEntry, TripWindow, conflicts_on_date, daily_load, is_overloaded,
};
use tp_db::Database;

use super::plan::Plan;
use super::util::{entry_count, entry_details, format_date, time_range};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show this day (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    trip_name: Option<&'a str>,
    trip_window: TripWindow,
    entries: Vec<&'a ScheduleEntry>,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &ListArgs) -> Result<()> {
    let plan = Plan::require(db)?;
    let window = plan.store.window();
    if let Some(date) = args.date {
        if !window.contains(date) {
            bail!("{date} is outside the trip ({window})");
        }
    }
    let days: Vec<NaiveDate> = args.date.map_or_else(|| window.days().collect(), |d| vec![d]);

    if args.json {
        let entries = days
            .iter()
            .flat_map(|day| plan.store.entries_on_date(*day))
            .collect();
        let output = ListOutput {
            trip_name: plan.trip_name.as_deref(),
            trip_window: window,
            entries,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "{}: {} to {}",
        plan.name(),
        format_date(window.start()),
        format_date(window.end())
    )?;

    let mut shown = 0;
    for day in days {
        let entries = plan.store.entries_on_date(day);
        if entries.is_empty() {
            continue;
        }
        shown += entries.len();
        write_day(writer, &plan, day, &entries)?;
    }

    if shown == 0 {
        match args.date {
            Some(day) => writeln!(writer, "Nothing planned on {}.", format_date(day))?,
            None => writeln!(writer, "Nothing planned yet. Try 'tp search' for ideas.")?,
        }
    }
    Ok(())
}

fn write_day<W: Write>(
    writer: &mut W,
    plan: &Plan,
    day: NaiveDate,
    entries: &[&ScheduleEntry],
) -> Result<()> {
    let load = daily_load(&plan.store, day);
    let flag = if is_overloaded(load) { ", overloaded" } else { "" };
    writeln!(writer)?;
    writeln!(
        writer,
        "{} ({}, {}{flag})",
        format_date(day),
        entry_count(entries.len()),
        format_minutes(load)
    )?;

    for entry in entries {
        writeln!(
            writer,
            "  {:<11}  {}  {} {}",
            time_range(entry),
            entry.id().short(),
            entry.title(),
            entry_details(entry, plan.currency)
        )?;
    }
    for pair in conflicts_on_date(&plan.store, day) {
        writeln!(
            writer,
            "  ! '{}' overlaps '{}'",
            pair.earlier.title(),
            pair.later.title()
        )?;
    }
    Ok(())
}
