//! Schedule entries: activities and travel legs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, PlanError};
use crate::time::{ClockTime, MINUTES_PER_DAY, add_duration};
use crate::types::{Category, EntryId, TravelMode};
use crate::weather::WeatherSnapshot;
use crate::window::TripWindow;

/// Shortest travel leg, in minutes.
pub const MIN_TRAVEL_MINUTES: u32 = 5;

/// Largest cost a single activity may carry, one trillion.
pub const MAX_COST: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Costs are kept in whole cents.
pub const COST_DECIMAL_PLACES: u32 = 2;

/// Details of a visit to a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub category: Category,
    /// Cost in the canonical currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(default)]
    pub address: String,
    /// Free-text hint on how to get there.
    #[serde(default)]
    pub transit_hint: String,
    #[serde(default)]
    pub notes: String,
}

impl Activity {
    /// A free activity with no address or notes.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            cost: Decimal::ZERO,
            address: String::new(),
            transit_hint: String::new(),
            notes: String::new(),
        }
    }
}

/// A journey between two places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLeg {
    pub mode: TravelMode,
    pub distance_km: f64,
}

impl TravelLeg {
    /// Duration implied by distance and mode, including boarding time.
    ///
    /// Never shorter than [`MIN_TRAVEL_MINUTES`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn duration_minutes(&self) -> u32 {
        let riding = (self.distance_km * 60.0 / self.mode.speed_kmh()).ceil();
        let riding = if riding.is_finite() && riding > 0.0 {
            riding.min(f64::from(u32::MAX)) as u32
        } else {
            0
        };
        riding
            .saturating_add(self.mode.boarding_minutes())
            .max(MIN_TRAVEL_MINUTES)
    }
}

/// What an entry schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Activity(Activity),
    Travel(TravelLeg),
}

/// Caller-built input for creating or replacing an entry.
///
/// The store turns a draft into a [`ScheduleEntry`] after validation, adding
/// the id and the derived end time.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    /// Ignored for travel legs, whose duration follows from the leg.
    pub duration_minutes: u32,
    pub kind: EntryKind,
    pub weather: Option<WeatherSnapshot>,
}

impl EntryDraft {
    pub fn activity(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: ClockTime,
        duration_minutes: u32,
        activity: Activity,
    ) -> Self {
        Self {
            title: title.into(),
            date,
            start_time,
            duration_minutes,
            kind: EntryKind::Activity(activity),
            weather: None,
        }
    }

    pub fn travel(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: ClockTime,
        leg: TravelLeg,
    ) -> Self {
        Self {
            title: title.into(),
            date,
            start_time,
            duration_minutes: leg.duration_minutes(),
            kind: EntryKind::Travel(leg),
            weather: None,
        }
    }

    #[must_use]
    pub fn with_weather(mut self, weather: WeatherSnapshot) -> Self {
        self.weather = Some(weather);
        self
    }

    /// The duration the entry will have once stored.
    pub fn resolved_duration(&self) -> u32 {
        match &self.kind {
            EntryKind::Activity(_) => self.duration_minutes,
            EntryKind::Travel(leg) => leg.duration_minutes(),
        }
    }
}

/// One scheduled activity or travel leg.
///
/// Entries are only created and replaced through the store, so every stored
/// entry satisfies the validation rules in [`ScheduleEntry::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    id: EntryId,
    title: String,
    date: NaiveDate,
    start_time: ClockTime,
    duration_minutes: u32,
    end_time: ClockTime,
    kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weather: Option<WeatherSnapshot>,
}

impl ScheduleEntry {
    /// Validates a draft against the trip window and derives its end time.
    pub(crate) fn build(
        id: EntryId,
        draft: EntryDraft,
        window: &TripWindow,
    ) -> Result<Self, PlanError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(InputError::Empty { field: "title" }.into());
        }
        if !window.contains(draft.date) {
            return Err(InputError::DateOutsideWindow {
                date: draft.date,
                window: *window,
            }
            .into());
        }
        validate_kind(&draft.kind)?;

        let duration_minutes = draft.resolved_duration();
        if draft.start_time.minutes().saturating_add(duration_minutes) > MINUTES_PER_DAY {
            return Err(InputError::CrossesMidnight {
                start: draft.start_time,
                duration_minutes,
            }
            .into());
        }

        Ok(Self {
            id,
            title: title.to_string(),
            date: draft.date,
            start_time: draft.start_time,
            duration_minutes,
            end_time: add_duration(draft.start_time, duration_minutes).time,
            kind: draft.kind,
            weather: draft.weather,
        })
    }

    /// Re-runs validation and re-derives computed fields, keeping the id.
    pub(crate) fn revalidate(self, window: &TripWindow) -> Result<Self, PlanError> {
        let id = self.id.clone();
        Self::build(id, self.into_draft(), window)
    }

    pub const fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn start_time(&self) -> ClockTime {
        self.start_time
    }

    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// End of the entry; `00:00` when it ends exactly at midnight.
    pub const fn end_time(&self) -> ClockTime {
        self.end_time
    }

    /// End as minutes since the start of the entry's own day (up to 1440).
    pub const fn end_minutes(&self) -> u32 {
        self.start_time.minutes() + self.duration_minutes
    }

    pub const fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub const fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub const fn is_travel(&self) -> bool {
        matches!(self.kind, EntryKind::Travel(_))
    }

    /// Cost in the canonical currency; travel legs are free.
    pub fn cost(&self) -> Decimal {
        match &self.kind {
            EntryKind::Activity(activity) => activity.cost,
            EntryKind::Travel(_) => Decimal::ZERO,
        }
    }

    /// A draft with this entry's current contents, for whole-entry edits.
    pub fn to_draft(&self) -> EntryDraft {
        self.clone().into_draft()
    }

    fn into_draft(self) -> EntryDraft {
        EntryDraft {
            title: self.title,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            kind: self.kind,
            weather: self.weather,
        }
    }
}

fn validate_kind(kind: &EntryKind) -> Result<(), PlanError> {
    match kind {
        EntryKind::Activity(activity) => validate_cost(activity.cost),
        EntryKind::Travel(leg) if !leg.distance_km.is_finite() || leg.distance_km < 0.0 => {
            Err(InputError::Negative {
                field: "distance",
                value: leg.distance_km.to_string(),
            }
            .into())
        }
        EntryKind::Travel(_) => Ok(()),
    }
}

/// Costs are whole cents between zero and [`MAX_COST`].
fn validate_cost(cost: Decimal) -> Result<(), PlanError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(InputError::Negative {
            field: "cost",
            value: cost.to_string(),
        }
        .into());
    }
    if cost > MAX_COST {
        return Err(InputError::TooLarge {
            field: "cost",
            value: cost.to_string(),
            max: MAX_COST.to_string(),
        }
        .into());
    }
    if cost.normalize().scale() > COST_DECIMAL_PLACES {
        return Err(InputError::Precision {
            field: "cost",
            value: cost.to_string(),
            places: COST_DECIMAL_PLACES,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn window() -> TripWindow {
        TripWindow::new(date("2025-05-15"), date("2025-05-19")).unwrap()
    }

    fn id(s: &str) -> EntryId {
        EntryId::new(s).unwrap()
    }

    fn castle() -> EntryDraft {
        let mut activity = Activity::new(Category::Attraction);
        activity.cost = Decimal::new(18, 0);
        EntryDraft::activity("Edinburgh Castle", date("2025-05-15"), t("09:00"), 120, activity)
    }

    #[test]
    fn build_derives_end_time() {
        let entry = ScheduleEntry::build(id("a"), castle(), &window()).unwrap();
        assert_eq!(entry.end_time(), t("11:00"));
        assert_eq!(entry.end_minutes(), 660);
        assert_eq!(entry.cost(), Decimal::new(18, 0));
    }

    #[test]
    fn zero_duration_ends_at_start() {
        let mut draft = castle();
        draft.duration_minutes = 0;
        let entry = ScheduleEntry::build(id("a"), draft, &window()).unwrap();
        assert_eq!(entry.end_time(), entry.start_time());
    }

    #[test]
    fn build_trims_and_requires_title() {
        let mut draft = castle();
        draft.title = "  Castle  ".to_string();
        let entry = ScheduleEntry::build(id("a"), draft, &window()).unwrap();
        assert_eq!(entry.title(), "Castle");

        let mut draft = castle();
        draft.title = "   ".to_string();
        let err = ScheduleEntry::build(id("a"), draft, &window()).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidInput(InputError::Empty { field: "title" })
        );
    }

    #[test]
    fn build_rejects_dates_outside_window() {
        let mut draft = castle();
        draft.date = date("2025-05-20");
        let err = ScheduleEntry::build(id("a"), draft, &window()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(InputError::DateOutsideWindow { .. })
        ));
    }

    #[test]
    fn build_rejects_midnight_crossing_but_allows_ending_at_midnight() {
        let mut draft = castle();
        draft.start_time = t("23:00");
        draft.duration_minutes = 61;
        let err = ScheduleEntry::build(id("a"), draft.clone(), &window()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(InputError::CrossesMidnight { .. })
        ));

        draft.duration_minutes = 60;
        let entry = ScheduleEntry::build(id("a"), draft, &window()).unwrap();
        assert_eq!(entry.end_time(), ClockTime::MIDNIGHT);
        assert_eq!(entry.end_minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn build_rejects_negative_cost() {
        let mut draft = castle();
        if let EntryKind::Activity(activity) = &mut draft.kind {
            activity.cost = Decimal::new(-1, 0);
        }
        let err = ScheduleEntry::build(id("a"), draft, &window()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(InputError::Negative { field: "cost", .. })
        ));
    }

    #[test]
    fn build_rejects_cost_beyond_cap() {
        let mut draft = castle();
        if let EntryKind::Activity(activity) = &mut draft.kind {
            activity.cost = Decimal::new(5, 0) * Decimal::from(10_u64.pow(13));
        }
        let err = ScheduleEntry::build(id("a"), draft.clone(), &window()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(InputError::TooLarge { field: "cost", .. })
        ));

        if let EntryKind::Activity(activity) = &mut draft.kind {
            activity.cost = MAX_COST;
        }
        assert!(ScheduleEntry::build(id("a"), draft, &window()).is_ok());
    }

    #[test]
    fn build_rejects_fractional_cents() {
        let mut draft = castle();
        if let EntryKind::Activity(activity) = &mut draft.kind {
            activity.cost = "0.1234567890123456789".parse().unwrap();
        }
        let err = ScheduleEntry::build(id("a"), draft.clone(), &window()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(InputError::Precision { places: 2, .. })
        ));

        // Trailing zeros do not count as extra precision.
        if let EntryKind::Activity(activity) = &mut draft.kind {
            activity.cost = "12.3000".parse().unwrap();
        }
        assert!(ScheduleEntry::build(id("a"), draft, &window()).is_ok());
    }

    #[test]
    fn cents_cost_survives_json_roundtrip() {
        let mut draft = castle();
        if let EntryKind::Activity(activity) = &mut draft.kind {
            activity.cost = "999999999999.99".parse().unwrap();
        }
        let entry = ScheduleEntry::build(id("a"), draft, &window()).unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ScheduleEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cost(), entry.cost());
    }

    #[test]
    fn build_rejects_invalid_distance() {
        for distance in [-1.0, f64::NAN, f64::INFINITY] {
            let leg = TravelLeg {
                mode: TravelMode::Bus,
                distance_km: distance,
            };
            let draft = EntryDraft::travel("Bus", date("2025-05-15"), t("10:00"), leg);
            assert!(ScheduleEntry::build(id("a"), draft, &window()).is_err());
        }
    }

    #[test]
    fn travel_duration_follows_mode_speed() {
        let walk = TravelLeg {
            mode: TravelMode::Walk,
            distance_km: 2.0,
        };
        assert_eq!(walk.duration_minutes(), 30);

        let bus = TravelLeg {
            mode: TravelMode::Bus,
            distance_km: 3.0,
        };
        // 12 minutes riding plus 5 boarding
        assert_eq!(bus.duration_minutes(), 17);

        let short_walk = TravelLeg {
            mode: TravelMode::Walk,
            distance_km: 0.1,
        };
        assert_eq!(short_walk.duration_minutes(), MIN_TRAVEL_MINUTES);

        let zero_taxi = TravelLeg {
            mode: TravelMode::Taxi,
            distance_km: 0.0,
        };
        assert_eq!(zero_taxi.duration_minutes(), 5);
    }

    #[test]
    fn travel_draft_ignores_supplied_duration() {
        let leg = TravelLeg {
            mode: TravelMode::Tram,
            distance_km: 5.0,
        };
        let mut draft = EntryDraft::travel("Tram to Leith", date("2025-05-16"), t("14:00"), leg);
        draft.duration_minutes = 999;
        assert_eq!(draft.resolved_duration(), 20);
        let entry = ScheduleEntry::build(id("b"), draft, &window()).unwrap();
        assert_eq!(entry.duration_minutes(), 20);
        assert_eq!(entry.end_time(), t("14:20"));
        assert_eq!(entry.cost(), Decimal::ZERO);
        assert!(entry.is_travel());
    }

    #[test]
    fn entry_serializes_with_camel_case_fields() {
        let entry = ScheduleEntry::build(id("a"), castle(), &window()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "11:00");
        assert_eq!(json["durationMinutes"], 120);
        assert_eq!(json["kind"]["type"], "activity");
        assert_eq!(json["kind"]["category"], "attraction");
        assert_eq!(json["kind"]["cost"], 18.0);
        assert!(json.get("weather").is_none());

        let parsed: ScheduleEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn to_draft_roundtrips_through_build() {
        let entry = ScheduleEntry::build(id("a"), castle(), &window()).unwrap();
        let rebuilt = ScheduleEntry::build(id("a"), entry.to_draft(), &window()).unwrap();
        assert_eq!(rebuilt, entry);
    }
}
