//! Init command for starting a new trip.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use tp_core::{Currency, ScheduleStore, TripWindow};
use tp_db::Database;

use super::plan::Plan;
use super::util::format_date;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the trip.
    #[arg(long)]
    pub name: String,

    /// First day of the trip (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the trip (YYYY-MM-DD).
    #[arg(long)]
    pub end: NaiveDate,

    /// Currency for costs; defaults to the configured one.
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Replace an existing trip.
    #[arg(long)]
    pub force: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &InitArgs,
    default_currency: Currency,
    now: DateTime<Utc>,
) -> Result<()> {
    if !args.force {
        if let Some(existing) = Plan::load(db)? {
            bail!(
                "trip '{}' is already planned; pass --force to start over",
                existing.name()
            );
        }
    }

    let window = TripWindow::new(args.start, args.end).context("invalid trip dates")?;
    let name = args.name.trim();
    let trip_name = (!name.is_empty()).then(|| name.to_string());
    let plan = Plan::new(
        ScheduleStore::new(window),
        trip_name,
        args.currency.unwrap_or(default_currency),
    );
    plan.save(db, now)?;

    writeln!(
        writer,
        "Planned '{}' from {} to {} ({} days, costs in {}).",
        plan.name(),
        format_date(window.start()),
        format_date(window.end()),
        window.day_count(),
        plan.currency
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use insta::assert_snapshot;

    use super::*;

    fn args(force: bool) -> InitArgs {
        InitArgs {
            name: "Edinburgh".to_string(),
            start: "2025-05-15".parse().unwrap(),
            end: "2025-05-19".parse().unwrap(),
            currency: None,
            force,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_init_creates_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &mut db, &args(false), Currency::Gbp, now()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Planned 'Edinburgh' from Thu 15 May 2025 to Mon 19 May 2025 (5 days, costs in GBP).");
        let plan = Plan::require(&db).unwrap();
        assert_eq!(plan.currency, Currency::Gbp);
        assert!(plan.store.is_empty());
    }

    #[test]
    fn test_init_refuses_to_replace_without_force() {
        let mut db = Database::open_in_memory().unwrap();
        run(&mut Vec::new(), &mut db, &args(false), Currency::Eur, now()).unwrap();

        let err = run(&mut Vec::new(), &mut db, &args(false), Currency::Eur, now()).unwrap_err();
        assert!(err.to_string().contains("--force"), "{err}");

        run(&mut Vec::new(), &mut db, &args(true), Currency::Eur, now()).unwrap();
        assert_eq!(db.snapshot_count().unwrap(), 2);
    }

    #[test]
    fn test_init_rejects_inverted_dates() {
        let mut db = Database::open_in_memory().unwrap();
        let mut inverted = args(false);
        inverted.end = "2025-05-10".parse().unwrap();
        let err = run(&mut Vec::new(), &mut db, &inverted, Currency::Eur, now()).unwrap_err();
        assert_eq!(err.to_string(), "invalid trip dates");
        assert_eq!(db.snapshot_count().unwrap(), 0);
    }
}
