//! Export command for writing the plan to a JSON file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use tp_core::snapshot::snapshot_file_name;
use tp_db::Database;

use super::plan::Plan;
use super::util::entry_count;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory to write the file into.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Writes the plan to `<trip>-<start>-<end>.json` and returns the path.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &ExportArgs,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let plan = Plan::require(db)?;
    let path = args.dir.join(snapshot_file_name(
        plan.trip_name.as_deref(),
        &plan.store.window(),
    ));
    let json = plan
        .document(now)
        .to_json_pretty()
        .context("failed to encode the plan")?;
    write_file(&path, &json)?;

    writeln!(
        writer,
        "Exported {} to {}",
        entry_count(plan.store.len()),
        path.display()
    )?;
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
