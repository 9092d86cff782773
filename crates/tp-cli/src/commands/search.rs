//! Search command for finding places in the built-in catalog.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use tp_core::places::MIN_QUERY_CHARS;
use tp_core::time::format_minutes;
use tp_core::{Currency, PlaceSearch};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Part of a place name.
    pub query: String,
}

pub fn run<W: Write, S: PlaceSearch>(
    writer: &mut W,
    places: &S,
    args: &SearchArgs,
    currency: Currency,
) -> Result<()> {
    if args.query.trim().chars().count() < MIN_QUERY_CHARS {
        writeln!(writer, "Type at least {MIN_QUERY_CHARS} characters to search.")?;
        return Ok(());
    }

    let found = places.search(&args.query);
    if found.is_empty() {
        writeln!(writer, "No places match '{}'.", args.query.trim())?;
        return Ok(());
    }

    for place in &found {
        writeln!(
            writer,
            "{} [{}, {}, {}]",
            place.name,
            place.category,
            format_minutes(place.estimated_duration_minutes),
            currency.display(place.estimated_cost)
        )?;
        writeln!(writer, "  {}", place.address)?;
        if !place.transit_hint.is_empty() {
            writeln!(writer, "  {}", place.transit_hint)?;
        }
    }
    writeln!(writer)?;
    writeln!(writer, "Add one with: tp add --place <name> --start HH:MM")?;
    Ok(())
}
