//! Identifier and enum types with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InputError;

/// A validated schedule entry identifier.
///
/// Entry ids are opaque non-empty strings. The store assigns a fresh UUID to
/// every new entry, so ids are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Creates an id after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, InputError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(InputError::Empty { field: "entry id" });
        }
        Ok(Self(id))
    }

    /// Generates a fresh random id.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first eight characters, for compact display.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl TryFrom<String> for EntryId {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What kind of place an activity takes place at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Attraction,
    Restaurant,
    Cafe,
    Bar,
    Shopping,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Attraction,
        Self::Restaurant,
        Self::Cafe,
        Self::Bar,
        Self::Shopping,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attraction => "attraction",
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::Shopping => "shopping",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::unknown("category", s))
    }
}

/// How a travel leg is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walk,
    Bus,
    Taxi,
    Tram,
}

impl TravelMode {
    pub const ALL: [Self; 4] = [Self::Walk, Self::Bus, Self::Taxi, Self::Tram];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Bus => "bus",
            Self::Taxi => "taxi",
            Self::Tram => "tram",
        }
    }

    /// Average door-to-door speed in km/h.
    #[must_use]
    pub const fn speed_kmh(&self) -> f64 {
        match self {
            Self::Walk => 4.0,
            Self::Bus => 15.0,
            Self::Taxi => 30.0,
            Self::Tram => 20.0,
        }
    }

    /// Minutes added for waiting and boarding.
    #[must_use]
    pub const fn boarding_minutes(&self) -> u32 {
        match self {
            Self::Walk => 0,
            Self::Bus | Self::Taxi | Self::Tram => 5,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::unknown("travel mode", s))
    }
}
