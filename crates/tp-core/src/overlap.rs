//! Advisory overlap detection between entries on the same day.
//!
//! Intervals are half-open: `[09:00, 10:00)` and `[10:00, 11:00)` touch but do
//! not overlap. A reported conflict never blocks a mutation; users may keep
//! overlapping alternatives on purpose.

use chrono::NaiveDate;

use crate::entry::{EntryDraft, ScheduleEntry};
use crate::store::ScheduleStore;
use crate::time::MINUTES_PER_DAY;
use crate::types::EntryId;

/// A half-open interval of minutes within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Something that occupies time on a date.
///
/// Lets the detector check stored entries and not-yet-stored drafts alike.
pub trait TimeBlock {
    fn date(&self) -> NaiveDate;

    fn span(&self) -> Span;

    /// The id of the stored entry this block stands for, if any.
    ///
    /// Entries with the same id are never reported as conflicting with it.
    fn block_id(&self) -> Option<&EntryId> {
        None
    }
}

impl TimeBlock for ScheduleEntry {
    fn date(&self) -> NaiveDate {
        self.date()
    }

    fn span(&self) -> Span {
        Span {
            start: self.start_time().minutes(),
            end: self.end_minutes(),
        }
    }

    fn block_id(&self) -> Option<&EntryId> {
        Some(self.id())
    }
}

impl TimeBlock for EntryDraft {
    fn date(&self) -> NaiveDate {
        self.date
    }

    /// Drafts are not validated yet, so an end past midnight is clamped to
    /// the end of the same day.
    fn span(&self) -> Span {
        let start = self.start_time.minutes();
        Span {
            start,
            end: start
                .saturating_add(self.resolved_duration())
                .min(MINUTES_PER_DAY),
        }
    }
}

/// A draft that is about to replace a stored entry.
#[derive(Debug, Clone, Copy)]
pub struct Revision<'a> {
    pub id: &'a EntryId,
    pub draft: &'a EntryDraft,
}

impl TimeBlock for Revision<'_> {
    fn date(&self) -> NaiveDate {
        self.draft.date
    }

    fn span(&self) -> Span {
        self.draft.span()
    }

    fn block_id(&self) -> Option<&EntryId> {
        Some(self.id)
    }
}

/// Returns the first entry on the candidate's date that overlaps it.
///
/// Entries are scanned in [`ScheduleStore::entries_on_date`] order, so the
/// result is deterministic.
pub fn find_conflict<'a, B: TimeBlock + ?Sized>(
    store: &'a ScheduleStore,
    candidate: &B,
) -> Option<&'a ScheduleEntry> {
    let span = candidate.span();
    let own_id = candidate.block_id();
    store
        .entries_on_date(candidate.date())
        .into_iter()
        .filter(|existing| Some(existing.id()) != own_id)
        .find(|existing| TimeBlock::span(*existing).overlaps(&span))
}

/// Two stored entries whose intervals intersect.
#[derive(Debug, Clone, Copy)]
pub struct ConflictPair<'a> {
    pub earlier: &'a ScheduleEntry,
    pub later: &'a ScheduleEntry,
}

/// Every overlapping pair on `date`, in display order.
pub fn conflicts_on_date(store: &ScheduleStore, date: NaiveDate) -> Vec<ConflictPair<'_>> {
    let day = store.entries_on_date(date);
    let mut pairs = Vec::new();
    for (idx, &earlier) in day.iter().enumerate() {
        let span = TimeBlock::span(earlier);
        for &later in &day[idx + 1..] {
            if TimeBlock::span(later).overlaps(&span) {
                pairs.push(ConflictPair { earlier, later });
            }
        }
    }
    pairs
}
