//! Trip statistics.
//!
//! Everything here is derived from a [`ScheduleStore`] on demand and never
//! cached. Costs are summed in the canonical currency and converted once at
//! the end, so rounding happens a single time per figure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::Currency;
use crate::entry::EntryKind;
use crate::overlap::conflicts_on_date;
use crate::store::ScheduleStore;

/// A day planned for longer than this (in minutes) is overloaded.
pub const OVERLOAD_THRESHOLD_MINUTES: u32 = 480;

/// Sum of all activity costs in the canonical currency.
pub fn base_cost(store: &ScheduleStore) -> Decimal {
    store.all_entries().iter().map(|e| e.cost()).sum()
}

/// Sum of all activity costs, converted to `currency` and rounded to cents.
pub fn total_cost(store: &ScheduleStore, currency: Currency) -> Decimal {
    currency.convert(base_cost(store))
}

/// Total planned minutes over every entry, travel legs included.
pub fn total_activity_duration(store: &ScheduleStore) -> u32 {
    store
        .all_entries()
        .iter()
        .map(|e| e.duration_minutes())
        .fold(0, u32::saturating_add)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelSummary {
    pub count: usize,
    pub total_distance_km: f64,
}

pub fn travel_summary(store: &ScheduleStore) -> TravelSummary {
    store
        .all_entries()
        .iter()
        .filter_map(|e| match e.kind() {
            EntryKind::Travel(leg) => Some(leg.distance_km),
            EntryKind::Activity(_) => None,
        })
        .fold(TravelSummary::default(), |acc, km| TravelSummary {
            count: acc.count + 1,
            total_distance_km: acc.total_distance_km + km,
        })
}

/// Minutes planned on `date`.
pub fn daily_load(store: &ScheduleStore, date: NaiveDate) -> u32 {
    store
        .all_entries()
        .iter()
        .filter(|e| e.date() == date)
        .map(|e| e.duration_minutes())
        .fold(0, u32::saturating_add)
}

/// Strictly more than [`OVERLOAD_THRESHOLD_MINUTES`].
pub const fn is_overloaded(load_minutes: u32) -> bool {
    load_minutes > OVERLOAD_THRESHOLD_MINUTES
}

/// One row of the per-day breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub entries: usize,
    pub load_minutes: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub overloaded: bool,
    pub conflicts: usize,
}

/// A row for every day of the trip window, including empty days.
pub fn day_summaries(store: &ScheduleStore, currency: Currency) -> Vec<DaySummary> {
    store
        .window()
        .days()
        .map(|date| {
            let day = store.entries_on_date(date);
            let load_minutes = day
                .iter()
                .map(|e| e.duration_minutes())
                .fold(0, u32::saturating_add);
            let cost: Decimal = day.iter().map(|e| e.cost()).sum();
            DaySummary {
                date,
                entries: day.len(),
                load_minutes,
                cost: currency.convert(cost),
                overloaded: is_overloaded(load_minutes),
                conflicts: conflicts_on_date(store, date).len(),
            }
        })
        .collect()
}

/// Every statistic for a trip, ready to print or serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    pub currency: Currency,
    pub entries: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    pub total_duration_minutes: u32,
    pub travel: TravelSummary,
    pub days: Vec<DaySummary>,
}

impl TripStats {
    pub fn overloaded_days(&self) -> impl Iterator<Item = &DaySummary> {
        self.days.iter().filter(|d| d.overloaded)
    }
}

pub fn trip_stats(store: &ScheduleStore, currency: Currency) -> TripStats {
    TripStats {
        currency,
        entries: store.len(),
        total_cost: total_cost(store, currency),
        total_duration_minutes: total_activity_duration(store),
        travel: travel_summary(store),
        days: day_summaries(store, currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Activity, EntryDraft, MAX_COST, TravelLeg};
    use crate::time::ClockTime;
    use crate::types::{Category, TravelMode};
    use crate::window::TripWindow;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn store() -> ScheduleStore {
        ScheduleStore::new(TripWindow::new(date("2025-05-15"), date("2025-05-17")).unwrap())
    }

    fn paid(title: &str, day: &str, start: &str, minutes: u32, cost: Decimal) -> EntryDraft {
        let mut activity = Activity::new(Category::Attraction);
        activity.cost = cost;
        EntryDraft::activity(title, date(day), t(start), minutes, activity)
    }

    fn leg(mode: TravelMode, distance_km: f64) -> TravelLeg {
        TravelLeg { mode, distance_km }
    }

    /// Castle, a bus ride and Holyroodhouse on the first day.
    fn sample() -> ScheduleStore {
        let mut store = store();
        store
            .add(paid("Castle", "2025-05-15", "09:00", 120, Decimal::new(18, 0)))
            .unwrap();
        store
            .add(EntryDraft::travel(
                "Bus",
                date("2025-05-15"),
                t("11:00"),
                leg(TravelMode::Bus, 3.0),
            ))
            .unwrap();
        store
            .add(paid(
                "Holyroodhouse",
                "2025-05-15",
                "11:30",
                90,
                Decimal::new(1750, 2),
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_total_cost_converts_once() {
        let store = sample();
        assert_eq!(base_cost(&store), Decimal::new(3550, 2));
        assert_eq!(total_cost(&store, Currency::Eur), Decimal::new(3550, 2));
        assert_eq!(total_cost(&store, Currency::Gbp), Decimal::new(3018, 2));
    }

    #[test]
    fn test_costs_at_the_cap_convert_without_overflow() {
        let mut store = store();
        for start in ["09:00", "12:00", "15:00"] {
            store
                .add(paid("Gold", "2025-05-15", start, 60, MAX_COST))
                .unwrap();
        }
        let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
        let err = store.add(paid("Too much", "2025-05-16", "09:00", 60, huge));
        assert!(err.is_err());
        assert_eq!(store.len(), 3);

        assert_eq!(total_cost(&store, Currency::Usd), Decimal::new(324, 2) * MAX_COST);
        let stats = trip_stats(&store, Currency::Usd);
        assert_eq!(stats.total_cost, Decimal::new(324, 2) * MAX_COST);
    }

    #[test]
    fn test_empty_store_totals_are_zero() {
        let store = store();
        assert_eq!(total_cost(&store, Currency::Usd), Decimal::ZERO);
        assert_eq!(total_activity_duration(&store), 0);
        assert_eq!(travel_summary(&store), TravelSummary::default());
    }

    #[test]
    fn test_total_duration_includes_travel() {
        // 120 + 17 + 90
        assert_eq!(total_activity_duration(&sample()), 227);
    }

    #[test]
    fn test_travel_summary_counts_legs() {
        let mut store = sample();
        store
            .add(EntryDraft::travel(
                "Walk back",
                date("2025-05-16"),
                t("18:00"),
                leg(TravelMode::Walk, 1.5),
            ))
            .unwrap();
        let summary = travel_summary(&store);
        assert_eq!(summary.count, 2);
        assert!((summary.total_distance_km - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_load_sums_one_day() {
        let mut store = store();
        for (title, start, minutes) in [
            ("A", "09:00", 120),
            ("B", "11:00", 90),
            ("C", "13:00", 150),
        ] {
            store
                .add(paid(title, "2025-05-16", start, minutes, Decimal::ZERO))
                .unwrap();
        }
        store
            .add(paid("Other day", "2025-05-15", "09:00", 60, Decimal::ZERO))
            .unwrap();
        assert_eq!(daily_load(&store, date("2025-05-16")), 360);
        assert_eq!(daily_load(&store, date("2025-05-17")), 0);
    }

    #[test]
    fn test_overload_threshold_is_exclusive() {
        assert!(is_overloaded(500));
        assert!(!is_overloaded(480));
        assert!(!is_overloaded(0));
    }

    #[test]
    fn test_day_summaries_cover_whole_window() {
        let mut store = sample();
        store
            .add(paid("Long hike", "2025-05-16", "08:00", 500, Decimal::ZERO))
            .unwrap();
        store
            .add(paid("Picnic", "2025-05-16", "12:00", 60, Decimal::new(10, 0)))
            .unwrap();

        let days = day_summaries(&store, Currency::Eur);
        assert_eq!(days.len(), 3);

        assert_eq!(days[0].entries, 3);
        assert_eq!(days[0].load_minutes, 227);
        assert_eq!(days[0].cost, Decimal::new(3550, 2));
        assert_eq!(days[0].conflicts, 0);
        assert!(!days[0].overloaded);

        assert_eq!(days[1].load_minutes, 560);
        assert!(days[1].overloaded);
        assert_eq!(days[1].conflicts, 1);

        assert_eq!(days[2].entries, 0);
        assert_eq!(days[2].cost, Decimal::ZERO);
    }

    #[test]
    fn test_trip_stats_serializes_numbers() {
        let stats = trip_stats(&sample(), Currency::Gbp);
        assert_eq!(stats.overloaded_days().count(), 0);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["totalCost"], 30.18);
        assert_eq!(json["totalDurationMinutes"], 227);
        assert_eq!(json["travel"]["count"], 1);
        assert_eq!(json["days"][0]["date"], "2025-05-15");
    }
}
