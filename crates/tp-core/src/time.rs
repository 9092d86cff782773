//! Clock-time arithmetic at minute resolution.
//!
//! Times of day are minute offsets from midnight. Parsing is strict: malformed
//! input is an error rather than a silent `00:00`, and callers decide whether
//! to fall back or reject.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{InputError, PlanError};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

static CLOCK_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

/// A time of day between 00:00 and 23:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, PlanError> {
        if hour >= 24 || minute >= 60 {
            return Err(InputError::TimeFormat {
                value: format!("{hour:02}:{minute:02}"),
            }
            .into());
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Creates a time from a minute offset, which must be below one day.
    pub fn from_minutes(minutes: u32) -> Result<Self, PlanError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(InputError::TimeFormat {
                value: format!("{minutes} minutes"),
            }
            .into());
        }
        Ok(Self(minutes))
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub const fn hour(self) -> u32 {
        self.0 / 60
    }

    pub const fn minute(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_minutes(s).map(Self)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        format(time)
    }
}

/// The result of adding a duration to a clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftedTime {
    /// The resulting time of day, wrapped modulo 24 hours.
    pub time: ClockTime,
    /// How many midnights the addition passed (or landed on).
    pub days_carried: u32,
}

impl ShiftedTime {
    /// Whether the result lies on a later day than the start.
    pub const fn wrapped(&self) -> bool {
        self.days_carried > 0
    }
}

/// Parses `"HH:MM"` into minutes since midnight.
///
/// Hours may have one or two digits; minutes always have two.
pub fn to_minutes(time: &str) -> Result<u32, PlanError> {
    let invalid = || {
        PlanError::from(InputError::TimeFormat {
            value: time.to_string(),
        })
    };

    let caps = CLOCK_RE.captures(time).ok_or_else(invalid)?;
    let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
    if hour >= 24 || minute >= 60 {
        return Err(invalid());
    }
    Ok(hour * 60 + minute)
}

/// Adds `minutes` to `time`, wrapping past midnight.
///
/// Callers that care about day boundaries must check
/// [`ShiftedTime::wrapped`] instead of assuming the result is on the same day.
pub const fn add_duration(time: ClockTime, minutes: u32) -> ShiftedTime {
    let mut days_carried = minutes / MINUTES_PER_DAY;
    let mut total = time.0 + minutes % MINUTES_PER_DAY;
    if total >= MINUTES_PER_DAY {
        total -= MINUTES_PER_DAY;
        days_carried += 1;
    }
    ShiftedTime {
        time: ClockTime(total),
        days_carried,
    }
}

/// Formats a time as zero-padded `"HH:MM"`.
pub fn format(time: ClockTime) -> String {
    time.to_string()
}

/// Renders a minute count as `"2h 05m"` or `"45m"`.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest:02}m")
    } else {
        format!("{rest}m")
    }
}
