//! Import command for replacing the plan with an exported file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use tp_core::import;
use tp_db::Database;

use super::plan::Plan;
use super::util::{entry_count, format_date};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// A file written by `tp export`.
    pub file: PathBuf,
}

/// Replaces the current plan with the file's contents.
///
/// Nothing is saved unless the whole document is valid.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &ImportArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let imported =
        import(&json).with_context(|| format!("cannot import {}", args.file.display()))?;
    let plan = Plan::from_imported(imported);
    plan.save(db, now)?;

    let window = plan.store.window();
    writeln!(
        writer,
        "Imported {} for '{}' ({} to {}).",
        entry_count(plan.store.len()),
        plan.name(),
        format_date(window.start()),
        format_date(window.end())
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use insta::assert_snapshot;
    use serde_json::json;
    use tp_core::{Currency, ScheduleStore, TripWindow};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn write_json(dir: &tempfile::TempDir, value: &serde_json::Value) -> PathBuf {
        let path = dir.path().join("plan.json");
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_import_replaces_plan() {
        let temp = tempfile::tempdir().unwrap();
        let mut db = Database::open_in_memory().unwrap();
        let window = TripWindow::new(
            "2025-06-01".parse().unwrap(),
            "2025-06-02".parse().unwrap(),
        )
        .unwrap();
        Plan::new(ScheduleStore::new(window), None, Currency::Eur)
            .save(&mut db, now())
            .unwrap();

        let file = write_json(
            &temp,
            &json!({
                "version": 1,
                "tripName": "Edinburgh",
                "tripWindow": {"start": "2025-05-15", "end": "2025-05-19"},
                "currency": "GBP",
                "entries": [{
                    "id": "castle-1",
                    "title": "Edinburgh Castle",
                    "date": "2025-05-15",
                    "startTime": "09:00",
                    "durationMinutes": 120,
                    "endTime": "11:00",
                    "kind": {"type": "activity", "category": "attraction", "cost": 18.0}
                }],
                "exportedAt": "2025-04-30T08:00:00Z"
            }),
        );

        let mut output = Vec::new();
        run(&mut output, &mut db, &ImportArgs { file }, now()).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @"Imported 1 entry for 'Edinburgh' (Thu 15 May 2025 to Mon 19 May 2025).");

        let plan = Plan::require(&db).unwrap();
        assert_eq!(plan.currency, Currency::Gbp);
        assert_eq!(plan.store.all_entries()[0].id().as_str(), "castle-1");
        assert_eq!(db.snapshot_count().unwrap(), 2);
    }

    #[test]
    fn test_invalid_document_leaves_plan_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let mut db = Database::open_in_memory().unwrap();
        let file = write_json(
            &temp,
            &json!({
                "version": 1,
                "tripWindow": {"start": "2025-05-15", "end": "2025-05-19"},
                "entries": [{
                    "id": "late",
                    "title": "Ghost tour",
                    "date": "2025-05-15",
                    "startTime": "23:30",
                    "durationMinutes": 90,
                    "endTime": "01:00",
                    "kind": {"type": "activity", "category": "attraction", "cost": 0.0}
                }]
            }),
        );

        let err = run(&mut Vec::new(), &mut db, &ImportArgs { file }, now()).unwrap_err();
        assert!(err.to_string().starts_with("cannot import"), "{err}");
        assert!(format!("{err:#}").contains("runs past midnight"), "{err:#}");
        assert_eq!(db.snapshot_count().unwrap(), 0);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let mut db = Database::open_in_memory().unwrap();
        let args = ImportArgs {
            file: temp.path().join("nope.json"),
        };
        let err = run(&mut Vec::new(), &mut db, &args, now()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"), "{err}");
    }
}
