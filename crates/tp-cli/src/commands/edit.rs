//! Edit command for changing an existing entry.
//!
//! The entry is rebuilt from its current contents with the given fields
//! replaced, then validated as a whole. Activity fields cannot be set on a
//! travel leg and the other way round.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use rust_decimal::Decimal;
use tp_core::{Category, ClockTime, EntryKind, Revision, TravelMode};
use tp_db::Database;

use super::add::confirm;
use super::plan::Plan;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry id or a unique prefix of it.
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub start: Option<ClockTime>,

    /// Activity duration in minutes.
    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub cost: Option<Decimal>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub transit: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Travel mode of a leg.
    #[arg(long)]
    pub mode: Option<TravelMode>,

    /// Travel distance in kilometres.
    #[arg(long)]
    pub distance: Option<f64>,

    /// Refuse the change if the entry would overlap another one.
    #[arg(long)]
    pub strict: bool,
}

impl EditArgs {
    fn activity_flags(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        if self.duration.is_some() {
            used.push("--duration");
        }
        if self.category.is_some() {
            used.push("--category");
        }
        if self.cost.is_some() {
            used.push("--cost");
        }
        if self.address.is_some() {
            used.push("--address");
        }
        if self.transit.is_some() {
            used.push("--transit");
        }
        if self.notes.is_some() {
            used.push("--notes");
        }
        used
    }

    fn travel_flags(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        if self.mode.is_some() {
            used.push("--mode");
        }
        if self.distance.is_some() {
            used.push("--distance");
        }
        used
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &EditArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut plan = Plan::require(db)?;
    let entry = plan
        .store
        .resolve_prefix(&args.id)
        .with_context(|| format!("cannot edit '{}'", args.id))?;
    let id = entry.id().clone();
    let mut draft = entry.to_draft();

    match &mut draft.kind {
        EntryKind::Activity(activity) => {
            if let Some(flag) = args.travel_flags().first() {
                bail!("{flag} only applies to travel legs");
            }
            if let Some(category) = args.category {
                activity.category = category;
            }
            if let Some(cost) = args.cost {
                activity.cost = cost;
            }
            if let Some(address) = &args.address {
                activity.address.clone_from(address);
            }
            if let Some(transit) = &args.transit {
                activity.transit_hint.clone_from(transit);
            }
            if let Some(notes) = &args.notes {
                activity.notes.clone_from(notes);
            }
            if let Some(duration) = args.duration {
                draft.duration_minutes = duration;
            }
        }
        EntryKind::Travel(leg) => {
            if let Some(flag) = args.activity_flags().first() {
                bail!("{flag} only applies to activities");
            }
            if let Some(mode) = args.mode {
                leg.mode = mode;
            }
            if let Some(distance) = args.distance {
                leg.distance_km = distance;
            }
        }
    }
    if let Some(title) = &args.title {
        draft.title.clone_from(title);
    }
    if let Some(start) = args.start {
        draft.start_time = start;
    }
    if let Some(date) = args.date {
        if date != draft.date {
            draft.date = date;
            draft.weather = plan.forecast(date);
        }
    }

    plan.check_conflict(
        writer,
        &Revision {
            id: &id,
            draft: &draft,
        },
        args.strict,
    )?;
    plan.store
        .update(&id, draft)
        .context("failed to update entry")?;
    plan.save(db, now)?;
    confirm(writer, &plan, &id, "Updated")?;
    Ok(())
}
