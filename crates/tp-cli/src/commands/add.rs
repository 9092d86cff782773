//! Add command for scheduling an activity.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use rust_decimal::Decimal;
use tp_core::{
    Activity, Category, ClockTime, EntryDraft, EntryId, EntryKind, LocalCatalog, PlaceSearch,
};
use tp_db::Database;

use super::plan::Plan;
use super::util::{entry_details, entry_line};

/// Duration of an activity when neither the user nor a catalog place gives one.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Title of the activity; defaults to the place name with --place.
    pub title: Option<String>,

    /// Fill in details from the first catalog place matching this name.
    #[arg(long)]
    pub place: Option<String>,

    /// Day of the activity (YYYY-MM-DD); defaults to the first trip day.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Start time (HH:MM).
    #[arg(long)]
    pub start: ClockTime,

    /// Duration in minutes.
    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub category: Option<Category>,

    /// Cost in euros.
    #[arg(long)]
    pub cost: Option<Decimal>,

    #[arg(long)]
    pub address: Option<String>,

    /// How to get there.
    #[arg(long)]
    pub transit: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Refuse to add the activity if it overlaps another entry.
    #[arg(long)]
    pub strict: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &AddArgs,
    now: DateTime<Utc>,
) -> Result<EntryId> {
    let mut plan = Plan::require(db)?;
    let date = args.date.unwrap_or_else(|| plan.store.window().start());
    let draft = build_draft(args, &LocalCatalog::edinburgh(), date)?;

    let id = plan.schedule(writer, draft, args.strict)?;
    plan.save(db, now)?;
    confirm(writer, &plan, &id, "Added")?;
    Ok(id)
}

/// Prints the confirmation line and the weather for a stored entry.
pub(crate) fn confirm<W: Write>(
    writer: &mut W,
    plan: &Plan,
    id: &EntryId,
    verb: &str,
) -> Result<()> {
    let Some(entry) = plan.store.get(id) else {
        return Ok(());
    };
    writeln!(
        writer,
        "{verb} {} {} {}",
        id.short(),
        entry_line(entry),
        entry_details(entry, plan.currency)
    )?;
    if let Some(weather) = entry.weather() {
        writeln!(
            writer,
            "  Weather: {}. {}",
            weather.description(),
            weather.recommendation()
        )?;
    }
    Ok(())
}

fn build_draft<S: PlaceSearch>(args: &AddArgs, places: &S, date: NaiveDate) -> Result<EntryDraft> {
    let mut draft = match &args.place {
        Some(query) => {
            let Some(place) = places.search(query).into_iter().next() else {
                bail!("no place matches '{query}'; try 'tp search'");
            };
            place.into_draft(date, args.start)
        }
        None => {
            let Some(title) = &args.title else {
                bail!("give the activity a title or pick one with --place");
            };
            EntryDraft::activity(
                title.clone(),
                date,
                args.start,
                DEFAULT_DURATION_MINUTES,
                Activity::new(Category::Attraction),
            )
        }
    };

    if let Some(title) = &args.title {
        draft.title.clone_from(title);
    }
    if let Some(duration) = args.duration {
        draft.duration_minutes = duration;
    }
    if let EntryKind::Activity(activity) = &mut draft.kind {
        apply_overrides(activity, args);
    }
    Ok(draft)
}

fn apply_overrides(activity: &mut Activity, args: &AddArgs) {
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
}
