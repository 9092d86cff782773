//! The date range a trip covers.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, PlanError};

/// An inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowFields")]
pub struct TripWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct WindowFields {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowFields> for TripWindow {
    type Error = PlanError;

    fn try_from(fields: WindowFields) -> Result<Self, Self::Error> {
        Self::new(fields.start, fields.end)
    }
}

impl TripWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlanError> {
        if start > end {
            return Err(InputError::WindowInverted { start, end }.into());
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date of the trip, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Number of days in the trip, counting both ends.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for TripWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let err = TripWindow::new(date("2025-05-19"), date("2025-05-15")).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(InputError::WindowInverted { .. })
        ));
    }

    #[test]
    fn single_day_window_is_valid() {
        let window = TripWindow::new(date("2025-05-15"), date("2025-05-15")).unwrap();
        assert_eq!(window.day_count(), 1);
        assert_eq!(window.days().collect::<Vec<_>>(), vec![date("2025-05-15")]);
    }

    #[test]
    fn days_cover_both_ends() {
        let window = TripWindow::new(date("2025-05-30"), date("2025-06-02")).unwrap();
        let days: Vec<_> = window.days().map(|d| d.to_string()).collect();
        assert_eq!(
            days,
            ["2025-05-30", "2025-05-31", "2025-06-01", "2025-06-02"]
        );
        assert!(window.contains(date("2025-06-01")));
        assert!(!window.contains(date("2025-06-03")));
        assert!(!window.contains(date("2025-05-29")));
    }

    #[test]
    fn serde_validates_order() {
        let window: TripWindow =
            serde_json::from_str(r#"{"start":"2025-05-15","end":"2025-05-19"}"#).unwrap();
        assert_eq!(window.to_string(), "2025-05-15..2025-05-19");
        assert_eq!(
            serde_json::to_string(&window).unwrap(),
            r#"{"start":"2025-05-15","end":"2025-05-19"}"#
        );

        let inverted: Result<TripWindow, _> =
            serde_json::from_str(r#"{"start":"2025-05-19","end":"2025-05-15"}"#);
        assert!(inverted.is_err());
    }
}
