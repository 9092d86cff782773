//! Stats command for trip totals.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use tp_core::time::format_minutes;
use tp_core::{Currency, trip_stats};
use tp_db::Database;

use super::plan::Plan;
use super::util::{format_date, plural};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Currency for totals; defaults to the trip's.
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &StatsArgs) -> Result<()> {
    let plan = Plan::require(db)?;
    let currency = args.currency.unwrap_or(plan.currency);
    let stats = trip_stats(&plan.store, currency);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(());
    }

    let window = plan.store.window();
    writeln!(writer, "{} ({} days)", plan.name(), window.day_count())?;
    writeln!(writer, "Entries:        {}", stats.entries)?;
    writeln!(
        writer,
        "Total cost:     {}{:.2}",
        currency.symbol(),
        stats.total_cost
    )?;
    writeln!(
        writer,
        "Total duration: {}",
        format_minutes(stats.total_duration_minutes)
    )?;
    writeln!(
        writer,
        "Travel:         {}, {:.1} km",
        plural(stats.travel.count, "leg"),
        stats.travel.total_distance_km
    )?;

    let overloaded: Vec<String> = stats
        .overloaded_days()
        .map(|day| format!("{} ({})", format_date(day.date), format_minutes(day.load_minutes)))
        .collect();
    if overloaded.is_empty() {
        writeln!(writer, "Overloaded:     none")?;
    } else {
        writeln!(writer, "Overloaded:     {}", overloaded.join(", "))?;
    }

    let conflicts: usize = stats.days.iter().map(|day| day.conflicts).sum();
    if conflicts > 0 {
        writeln!(writer, "Overlaps:       {conflicts}")?;
    }
    Ok(())
}
