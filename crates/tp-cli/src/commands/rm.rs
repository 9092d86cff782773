//! Rm command for deleting an entry.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use tp_db::Database;

use super::plan::Plan;
use super::util::entry_line;

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Entry id or a unique prefix of it.
    pub id: String,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &RmArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut plan = Plan::require(db)?;
    let id = plan
        .store
        .resolve_prefix(&args.id)
        .with_context(|| format!("cannot remove '{}'", args.id))?
        .id()
        .clone();
    let removed = plan.store.remove(&id)?;
    plan.save(db, now)?;

    writeln!(writer, "Removed {} {}", id.short(), entry_line(&removed))?;
    Ok(())
}
