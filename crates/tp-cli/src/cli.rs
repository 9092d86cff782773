//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    add::AddArgs, ask::AskArgs, dates::DatesArgs, edit::EditArgs, export::ExportArgs,
    import::ImportArgs, init::InitArgs, list::ListArgs, rm::RmArgs, search::SearchArgs,
    stats::StatsArgs, travel::TravelArgs,
};

/// Day-by-day trip planner.
///
/// Keeps a schedule of activities and travel legs for one trip, warns about
/// overlaps and busy days, and answers questions about the plan.
#[derive(Debug, Parser)]
#[command(name = "tp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new trip.
    Init(InitArgs),

    /// Change the trip dates.
    Dates(DatesArgs),

    /// Add an activity.
    Add(AddArgs),

    /// Add a travel leg.
    Travel(TravelArgs),

    /// Change an entry.
    Edit(EditArgs),

    /// Remove an entry.
    Rm(RmArgs),

    /// Show the plan day by day.
    List(ListArgs),

    /// Show costs, durations and busy days.
    Stats(StatsArgs),

    /// Search the place catalog.
    Search(SearchArgs),

    /// Ask the travel assistant a question.
    Ask(AskArgs),

    /// Write the plan to a JSON file.
    Export(ExportArgs),

    /// Replace the plan with an exported JSON file.
    Import(ImportArgs),

    /// Show where the plan is stored and what it holds.
    Status,
}
