//! Core scheduling model for the trip planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Time arithmetic: `HH:MM` parsing, formatting and duration math
//! - The schedule store: the trip window and its validated entries
//! - Overlap detection: advisory same-day conflict checks
//! - Aggregation: costs, durations, travel totals and daily load
//! - Snapshots: versioned JSON export and all-or-nothing import
//!
//! Weather and place search are collaborator traits with local
//! implementations. Nothing here performs I/O.

pub mod aggregate;
pub mod currency;
pub mod entry;
mod error;
pub mod overlap;
pub mod places;
pub mod snapshot;
mod store;
pub mod time;
mod types;
pub mod weather;
mod window;

pub use aggregate::{
    DaySummary, OVERLOAD_THRESHOLD_MINUTES, TravelSummary, TripStats, daily_load, is_overloaded,
    total_activity_duration, total_cost, travel_summary, trip_stats,
};
pub use currency::Currency;
pub use entry::{Activity, EntryDraft, EntryKind, ScheduleEntry, TravelLeg};
pub use error::{InputError, PlanError};
pub use overlap::{Revision, TimeBlock, conflicts_on_date, find_conflict};
pub use places::{LocalCatalog, PlaceCandidate, PlaceSearch};
pub use snapshot::{ImportedPlan, PlanDocument, SnapshotStore, export, import, restore};
pub use store::ScheduleStore;
pub use time::ClockTime;
pub use types::{Category, EntryId, TravelMode};
pub use weather::{SeasonalWeather, WeatherCache, WeatherSnapshot, WeatherSource};
pub use window::TripWindow;
