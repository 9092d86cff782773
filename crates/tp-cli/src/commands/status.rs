//! Status command for showing where the plan lives and what it holds.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::SecondsFormat;
use tp_db::Database;

use super::plan::Plan;
use super::util::{format_date, plural};

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    writeln!(writer, "Trip planner status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    let Some(plan) = Plan::load(db)? else {
        writeln!(writer, "No trip planned. Run 'tp init' to start one.")?;
        return Ok(());
    };

    let window = plan.store.window();
    writeln!(
        writer,
        "Trip: {} ({} to {}, {})",
        plan.name(),
        format_date(window.start()),
        format_date(window.end()),
        plural(usize::try_from(window.day_count()).unwrap_or(0), "day")
    )?;
    writeln!(writer, "Entries: {}", plan.store.len())?;
    writeln!(writer, "Currency: {}", plan.currency)?;

    let history = db.history()?;
    if let Some(latest) = history.first() {
        writeln!(
            writer,
            "Snapshots: {} (last saved {})",
            history.len(),
            latest.saved_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use insta::assert_snapshot;
    use tp_core::{Currency, ScheduleStore, TripWindow};

    use super::*;

    #[test]
    fn test_status_without_trip() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("tp.db");
        let db = Database::open(&db_path).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &db_path).unwrap();

        let output = String::from_utf8(output)
            .unwrap()
            .replace(&db_path.display().to_string(), "[TEMP]/tp.db");
        assert_snapshot!(output, @r"
        Trip planner status
        Database: [TEMP]/tp.db
        No trip planned. Run 'tp init' to start one.
        ");
    }

    #[test]
    fn test_status_reports_trip_and_history() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("tp.db");
        let mut db = Database::open(&db_path).unwrap();
        let window = TripWindow::new(
            "2025-05-15".parse().unwrap(),
            "2025-05-19".parse().unwrap(),
        )
        .unwrap();
        let plan = Plan::new(
            ScheduleStore::new(window),
            Some("Edinburgh".to_string()),
            Currency::Gbp,
        );
        let saved = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        plan.save(&mut db, saved).unwrap();
        plan.save(&mut db, saved + Duration::minutes(5)).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &db_path).unwrap();

        let output = String::from_utf8(output)
            .unwrap()
            .replace(&db_path.display().to_string(), "[TEMP]/tp.db");
        assert_snapshot!(output, @r"
        Trip planner status
        Database: [TEMP]/tp.db
        Trip: Edinburgh (Thu 15 May 2025 to Mon 19 May 2025, 5 days)
        Entries: 0
        Currency: GBP
        Snapshots: 2 (last saved 2025-05-01T12:05:00Z)
        ");
    }
}
