//! Travel command for scheduling a journey between two places.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use tp_core::{ClockTime, EntryDraft, EntryId, TravelLeg, TravelMode};
use tp_db::Database;

use super::add::confirm;
use super::plan::Plan;

#[derive(Debug, Args)]
pub struct TravelArgs {
    /// walk, bus, taxi or tram.
    #[arg(long)]
    pub mode: TravelMode,

    /// Distance in kilometres.
    #[arg(long)]
    pub distance: f64,

    /// Title of the leg; defaults to the mode and distance.
    #[arg(long)]
    pub title: Option<String>,

    /// Day of travel (YYYY-MM-DD); defaults to the first trip day.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Departure time (HH:MM).
    #[arg(long)]
    pub start: ClockTime,

    /// Refuse to add the leg if it overlaps another entry.
    #[arg(long)]
    pub strict: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &TravelArgs,
    now: DateTime<Utc>,
) -> Result<EntryId> {
    let mut plan = Plan::require(db)?;
    let leg = TravelLeg {
        mode: args.mode,
        distance_km: args.distance,
    };
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| default_title(&leg));
    let date = args.date.unwrap_or_else(|| plan.store.window().start());

    let id = plan.schedule(writer, EntryDraft::travel(title, date, args.start, leg), args.strict)?;
    plan.save(db, now)?;
    confirm(writer, &plan, &id, "Added")?;
    Ok(id)
}

fn default_title(leg: &TravelLeg) -> String {
    let verb = match leg.mode {
        TravelMode::Walk => "Walk",
        TravelMode::Bus => "Bus",
        TravelMode::Taxi => "Taxi",
        TravelMode::Tram => "Tram",
    };
    format!("{verb} ({:.1} km)", leg.distance_km)
}
