//! The authoritative collection of a trip's entries.
//!
//! # Ordering
//!
//! Entries are kept in insertion order. Queries that present a day's plan sort
//! by start time with a stable sort, so entries starting at the same minute
//! keep their insertion order.
//!
//! # Overlaps
//!
//! The store never rejects an entry for overlapping another one. Overlap is an
//! advisory check the caller runs first via [`crate::overlap::find_conflict`].

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::entry::{EntryDraft, ScheduleEntry};
use crate::error::{InputError, PlanError};
use crate::types::EntryId;
use crate::window::TripWindow;

/// A trip window and the entries planned inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStore {
    window: TripWindow,
    entries: Vec<ScheduleEntry>,
}

impl ScheduleStore {
    /// Creates an empty store for the given trip.
    pub const fn new(window: TripWindow) -> Self {
        Self {
            window,
            entries: Vec::new(),
        }
    }

    /// Rebuilds a store from previously stored entries.
    ///
    /// Every entry is validated again and its derived fields recomputed. Fails
    /// on the first invalid entry or repeated id.
    pub fn from_entries(
        window: TripWindow,
        entries: impl IntoIterator<Item = ScheduleEntry>,
    ) -> Result<Self, PlanError> {
        let mut seen = HashSet::new();
        let mut validated = Vec::new();
        for entry in entries {
            if !seen.insert(entry.id().clone()) {
                return Err(InputError::DuplicateId {
                    id: entry.id().clone(),
                }
                .into());
            }
            validated.push(entry.revalidate(&window)?);
        }
        Ok(Self {
            window,
            entries: validated,
        })
    }

    pub const fn window(&self) -> TripWindow {
        self.window
    }

    /// Changes the trip dates.
    ///
    /// Rejected when an existing entry would fall outside the new window; the
    /// store is left unchanged in that case.
    pub fn set_window(&mut self, window: TripWindow) -> Result<(), PlanError> {
        if let Some(orphan) = self.entries.iter().find(|e| !window.contains(e.date())) {
            return Err(InputError::OrphanedEntry {
                id: orphan.id().clone(),
                date: orphan.date(),
                window,
            }
            .into());
        }
        self.window = window;
        Ok(())
    }

    /// Validates and stores a new entry, returning its freshly assigned id.
    pub fn add(&mut self, draft: EntryDraft) -> Result<EntryId, PlanError> {
        let entry = ScheduleEntry::build(EntryId::generate(), draft, &self.window)?;
        let id = entry.id().clone();
        self.entries.push(entry);
        Ok(id)
    }

    /// Replaces an entry wholesale, keeping its id and position.
    pub fn update(&mut self, id: &EntryId, draft: EntryDraft) -> Result<(), PlanError> {
        let slot = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| PlanError::NotFound { id: id.clone() })?;
        self.entries[slot] = ScheduleEntry::build(id.clone(), draft, &self.window)?;
        Ok(())
    }

    /// Removes an entry and returns it.
    ///
    /// Removing an unknown id is an error, not a no-op.
    pub fn remove(&mut self, id: &EntryId) -> Result<ScheduleEntry, PlanError> {
        let slot = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| PlanError::NotFound { id: id.clone() })?;
        Ok(self.entries.remove(slot))
    }

    pub fn get(&self, id: &EntryId) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Entries on `date`, by start time; ties keep insertion order.
    pub fn entries_on_date(&self, date: NaiveDate) -> Vec<&ScheduleEntry> {
        let mut day: Vec<_> = self.entries.iter().filter(|e| e.date() == date).collect();
        day.sort_by_key(|e| e.start_time());
        day
    }

    /// All entries in insertion order.
    pub fn all_entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// All entries in display order: by date, then start time.
    pub fn sorted_entries(&self) -> Vec<&ScheduleEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| (e.date(), e.start_time()));
        sorted
    }

    /// Finds the single entry whose id starts with `prefix`.
    ///
    /// Returns `NotFound` when nothing matches and `InvalidInput` when the
    /// prefix is ambiguous.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<&ScheduleEntry, PlanError> {
        let prefix = prefix.trim();
        let wanted = EntryId::new(prefix)?;
        if let Some(exact) = self.entries.iter().find(|e| e.id() == &wanted) {
            return Ok(exact);
        }
        let mut matches = self
            .entries
            .iter()
            .filter(|e| e.id().as_str().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            (None, _) => Err(PlanError::NotFound { id: wanted }),
            (Some(_), Some(_)) => Err(InputError::Unknown {
                kind: "entry id (ambiguous prefix)",
                value: prefix.to_string(),
            }
            .into()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
