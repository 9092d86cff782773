//! Error taxonomy for the scheduling core.
//!
//! Overlap between entries is not an error. Conflicts are returned as data by
//! [`crate::overlap::find_conflict`].

use chrono::NaiveDate;
use thiserror::Error;

use crate::time::ClockTime;
use crate::types::EntryId;
use crate::window::TripWindow;

/// Errors returned by core operations.
///
/// A failed operation never leaves partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Caller-supplied data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// No entry exists with the given id.
    #[error("no entry with id {id}")]
    NotFound { id: EntryId },

    /// A snapshot document could not be imported.
    #[error("invalid snapshot: {reason}")]
    InvalidSchema { reason: String },
}

impl PlanError {
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            reason: reason.into(),
        }
    }
}

/// The specific validation rule an input broke.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A clock time was not `HH:MM` or was out of range.
    #[error("invalid time {value:?}, expected HH:MM between 00:00 and 23:59")]
    TimeFormat { value: String },

    /// A required text field was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A numeric field was negative or not a finite number.
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: String },

    /// A numeric field above its allowed maximum.
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: String,
        max: String,
    },

    /// A numeric field with more decimal places than it may hold.
    #[error("{field} must have at most {places} decimal places, got {value}")]
    Precision {
        field: &'static str,
        value: String,
        places: u32,
    },

    /// A trip window whose start lies after its end.
    #[error("trip start {start} is after trip end {end}")]
    WindowInverted { start: NaiveDate, end: NaiveDate },

    /// An entry date outside the trip window.
    #[error("{date} is outside the trip window {window}")]
    DateOutsideWindow { date: NaiveDate, window: TripWindow },

    /// An entry whose end time would fall on the following day.
    #[error("an entry starting at {start} lasting {duration_minutes} minutes runs past midnight")]
    CrossesMidnight {
        start: ClockTime,
        duration_minutes: u32,
    },

    /// Narrowing the trip window would orphan an existing entry.
    #[error("entry {id} on {date} falls outside the new trip window {window}")]
    OrphanedEntry {
        id: EntryId,
        date: NaiveDate,
        window: TripWindow,
    },

    /// Two entries share an id.
    #[error("duplicate entry id {id}")]
    DuplicateId { id: EntryId },

    /// A name that does not match any known variant.
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

impl InputError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::Unknown {
            kind,
            value: value.to_string(),
        }
    }
}
