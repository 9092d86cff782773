//! Versioned JSON documents for exporting and importing a whole plan.
//!
//! Import is all-or-nothing: either every entry validates and a fresh
//! [`ScheduleStore`] is returned, or nothing is. Only the trip window and the
//! entries are strict. The weather cache, currency and trip name are taken
//! when they parse and silently defaulted when they do not.

use std::convert::Infallible;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::currency::Currency;
use crate::entry::ScheduleEntry;
use crate::error::PlanError;
use crate::store::ScheduleStore;
use crate::weather::WeatherCache;
use crate::window::TripWindow;

/// Newest document version this crate reads and the one it writes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Runs of characters that cannot appear in a file-name slug.
static SLUG_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A complete plan as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_name: Option<String>,
    pub trip_window: TripWindow,
    pub entries: Vec<ScheduleEntry>,
    #[serde(default)]
    pub weather_cache: WeatherCache,
    #[serde(default)]
    pub currency: Currency,
    pub exported_at: DateTime<Utc>,
}

/// The result of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPlan {
    pub store: ScheduleStore,
    pub trip_name: Option<String>,
    pub weather_cache: WeatherCache,
    pub currency: Currency,
    pub exported_at: DateTime<Utc>,
}

/// Captures the full state of a plan.
pub fn export(
    store: &ScheduleStore,
    trip_name: Option<&str>,
    weather_cache: &WeatherCache,
    currency: Currency,
    exported_at: DateTime<Utc>,
) -> PlanDocument {
    PlanDocument {
        version: SNAPSHOT_VERSION,
        trip_name: trip_name.map(str::to_string),
        trip_window: store.window(),
        entries: store.all_entries().to_vec(),
        weather_cache: weather_cache.clone(),
        currency,
        exported_at,
    }
}

/// Parses and restores a document in one step.
pub fn import(json: &str) -> Result<ImportedPlan, PlanError> {
    restore(PlanDocument::parse(json)?)
}

/// Rebuilds a store from a parsed document, validating every entry.
pub fn restore(doc: PlanDocument) -> Result<ImportedPlan, PlanError> {
    let store = ScheduleStore::from_entries(doc.trip_window, doc.entries)
        .map_err(|e| PlanError::schema(e.to_string()))?;
    tracing::debug!(entries = store.len(), window = %store.window(), "restored plan");
    Ok(ImportedPlan {
        store,
        trip_name: doc.trip_name,
        weather_cache: doc.weather_cache,
        currency: doc.currency,
        exported_at: doc.exported_at,
    })
}

impl PlanDocument {
    /// Parses a document, reporting structural problems as `InvalidSchema`.
    ///
    /// A missing `version` is read as version 1.
    pub fn parse(json: &str) -> Result<Self, PlanError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| PlanError::schema(format!("not valid JSON: {e}")))?;
        let Value::Object(mut root) = value else {
            return Err(PlanError::schema("document must be a JSON object"));
        };

        let version = match root.get("version") {
            None => SNAPSHOT_VERSION,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| PlanError::schema("version must be a non-negative integer"))?,
        };
        if version > SNAPSHOT_VERSION {
            return Err(PlanError::schema(format!(
                "version {version} is newer than the supported version {SNAPSHOT_VERSION}"
            )));
        }

        let trip_window = root
            .remove("tripWindow")
            .ok_or_else(|| PlanError::schema("missing tripWindow"))?;
        let trip_window: TripWindow = serde_json::from_value(trip_window)
            .map_err(|e| PlanError::schema(format!("tripWindow: {e}")))?;

        let Some(Value::Array(raw_entries)) = root.remove("entries") else {
            return Err(PlanError::schema("entries must be an array"));
        };
        let entries = raw_entries
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                serde_json::from_value(raw)
                    .map_err(|e| PlanError::schema(format!("entry {idx}: {e}")))
            })
            .collect::<Result<Vec<ScheduleEntry>, _>>()?;

        Ok(Self {
            version,
            trip_name: lenient(&mut root, "tripName"),
            trip_window,
            entries,
            weather_cache: lenient(&mut root, "weatherCache").unwrap_or_default(),
            currency: lenient(&mut root, "currency").unwrap_or_default(),
            exported_at: lenient(&mut root, "exportedAt").unwrap_or(DateTime::UNIX_EPOCH),
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Takes an optional field, dropping it when it does not deserialize.
fn lenient<T: serde::de::DeserializeOwned>(root: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = root.remove(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(field = key, error = %e, "ignoring malformed snapshot field");
            None
        }
    }
}

/// File name for an exported plan: `<slug>-<start>-<end>.json`.
pub fn snapshot_file_name(trip_name: Option<&str>, window: &TripWindow) -> String {
    let lowered = trip_name.unwrap_or_default().to_lowercase();
    let slug = SLUG_SEPARATOR_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "trip" } else { slug };
    format!("{slug}-{}-{}.json", window.start(), window.end())
}

/// Somewhere plan documents can be kept between sessions.
pub trait SnapshotStore {
    type Error;

    fn save(&mut self, doc: &PlanDocument) -> Result<(), Self::Error>;

    /// The most recently saved document, if any.
    fn load(&self) -> Result<Option<PlanDocument>, Self::Error>;
}

/// Keeps every saved document in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshots {
    saved: Vec<PlanDocument>,
}

impl MemorySnapshots {
    pub fn saved(&self) -> &[PlanDocument] {
        &self.saved
    }
}

impl SnapshotStore for MemorySnapshots {
    type Error = Infallible;

    fn save(&mut self, doc: &PlanDocument) -> Result<(), Self::Error> {
        self.saved.push(doc.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<PlanDocument>, Self::Error> {
        Ok(self.saved.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::entry::{Activity, EntryDraft, TravelLeg};
    use crate::error::InputError;
    use crate::time::ClockTime;
    use crate::types::{Category, TravelMode};
    use crate::weather::{SeasonalWeather, WeatherSource};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn window() -> TripWindow {
        TripWindow::new(date("2025-05-15"), date("2025-05-19")).unwrap()
    }

    fn exported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn sample_store() -> ScheduleStore {
        let mut store = ScheduleStore::new(window());
        let mut castle = Activity::new(Category::Attraction);
        castle.cost = Decimal::new(18, 0);
        castle.address = "Castlehill, Edinburgh EH1 2NG".to_string();
        store
            .add(EntryDraft::activity(
                "Edinburgh Castle",
                date("2025-05-15"),
                t("09:00"),
                120,
                castle,
            ))
            .unwrap();
        store
            .add(EntryDraft::travel(
                "Tram to Leith",
                date("2025-05-16"),
                t("10:00"),
                TravelLeg {
                    mode: TravelMode::Tram,
                    distance_km: 4.2,
                },
            ))
            .unwrap();
        let forecast = SeasonalWeather::new(1).forecast(date("2025-05-17")).unwrap();
        store
            .add(
                EntryDraft::activity(
                    "Dinner",
                    date("2025-05-17"),
                    t("19:30"),
                    90,
                    Activity::new(Category::Restaurant),
                )
                .with_weather(forecast),
            )
            .unwrap();
        store
    }

    fn sample_json() -> Value {
        let doc = export(
            &sample_store(),
            Some("Edinburgh"),
            &WeatherCache::new(),
            Currency::Gbp,
            exported_at(),
        );
        serde_json::to_value(&doc).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_entries_and_window() {
        let store = sample_store();
        let mut cache = WeatherCache::new();
        let source = SeasonalWeather::new(3);
        cache.insert(date("2025-05-15"), source.forecast(date("2025-05-15")).unwrap());

        let doc = export(&store, Some("Edinburgh"), &cache, Currency::Usd, exported_at());
        let json = doc.to_json_pretty().unwrap();
        let imported = import(&json).unwrap();

        assert_eq!(imported.store, store);
        assert_eq!(imported.store.len(), 3);
        assert_eq!(imported.store.window(), window());
        assert_eq!(imported.weather_cache, cache);
        assert_eq!(imported.currency, Currency::Usd);
        assert_eq!(imported.trip_name.as_deref(), Some("Edinburgh"));
        assert_eq!(imported.exported_at, exported_at());
    }

    #[test]
    fn test_costs_round_trip_exactly() {
        let mut store = ScheduleStore::new(window());
        for (start, cost) in [
            ("09:00", "19.99"),
            ("11:00", "0.10"),
            ("13:00", "999999999999.99"),
        ] {
            let mut activity = Activity::new(Category::Shopping);
            activity.cost = cost.parse().unwrap();
            store
                .add(EntryDraft::activity("Shop", date("2025-05-15"), t(start), 60, activity))
                .unwrap();
        }
        let doc = export(&store, None, &WeatherCache::new(), Currency::Eur, exported_at());
        let imported = import(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(imported.store, store);

        let mut json = sample_json();
        json["entries"][0]["kind"]["cost"] = json!(0.123_456_789_012_345_68);
        assert!(matches!(
            import(&json.to_string()),
            Err(PlanError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_document_uses_camel_case_fields() {
        let json = sample_json();
        assert_eq!(json["version"], SNAPSHOT_VERSION);
        assert_eq!(json["tripName"], "Edinburgh");
        assert_eq!(json["tripWindow"]["start"], "2025-05-15");
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["entries"].as_array().unwrap().len(), 3);
        assert_eq!(json["exportedAt"], "2025-05-01T12:00:00Z");
    }

    #[test]
    fn test_rejects_non_json_and_non_objects() {
        for text in ["not json", "[]", "42"] {
            assert!(matches!(
                import(text),
                Err(PlanError::InvalidSchema { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_missing_window_or_entries() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("tripWindow");
        let err = import(&json.to_string()).unwrap_err();
        assert_eq!(err, PlanError::schema("missing tripWindow"));

        let mut json = sample_json();
        json["tripWindow"].as_object_mut().unwrap().remove("end");
        assert!(matches!(
            import(&json.to_string()),
            Err(PlanError::InvalidSchema { .. })
        ));

        let mut json = sample_json();
        json["entries"] = json!({"not": "an array"});
        let err = import(&json.to_string()).unwrap_err();
        assert_eq!(err, PlanError::schema("entries must be an array"));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let mut json = sample_json();
        json["tripWindow"] = json!({"start": "2025-05-19", "end": "2025-05-15"});
        assert!(matches!(
            import(&json.to_string()),
            Err(PlanError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_rejects_newer_version() {
        let mut json = sample_json();
        json["version"] = json!(SNAPSHOT_VERSION + 1);
        let err = import(&json.to_string()).unwrap_err();
        assert!(err.to_string().contains("newer than the supported version"));
    }

    #[test]
    fn test_missing_version_reads_as_current() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("version");
        assert_eq!(import(&json.to_string()).unwrap().store.len(), 3);
    }

    #[test]
    fn test_one_bad_entry_rejects_whole_import() {
        let mut json = sample_json();
        json["entries"][1]["startTime"] = json!("25:00");
        let err = import(&json.to_string()).unwrap_err();
        assert!(err.to_string().contains("entry 1"), "{err}");

        let mut json = sample_json();
        json["entries"][2]["date"] = json!("2025-06-01");
        assert!(matches!(
            import(&json.to_string()),
            Err(PlanError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut json = sample_json();
        let first_id = json["entries"][0]["id"].clone();
        json["entries"][1]["id"] = first_id.clone();
        let err = import(&json.to_string()).unwrap_err();
        let id = first_id.as_str().unwrap();
        let expected = PlanError::InvalidInput(InputError::DuplicateId {
            id: crate::types::EntryId::new(id).unwrap(),
        });
        assert_eq!(err, PlanError::schema(expected.to_string()));
    }

    #[test]
    fn test_derived_fields_are_recomputed() {
        let mut json = sample_json();
        json["entries"][0]["endTime"] = json!("23:59");
        let imported = import(&json.to_string()).unwrap();
        assert_eq!(imported.store.all_entries()[0].end_time(), t("11:00"));
    }

    #[test]
    fn test_best_effort_fields_fall_back() {
        let mut json = sample_json();
        json["currency"] = json!("JPY");
        json["weatherCache"] = json!(["garbage"]);
        json["exportedAt"] = json!("yesterday");
        json["tripName"] = json!(7);
        let imported = import(&json.to_string()).unwrap();
        assert_eq!(imported.currency, Currency::Eur);
        assert!(imported.weather_cache.is_empty());
        assert_eq!(imported.exported_at, DateTime::UNIX_EPOCH);
        assert_eq!(imported.trip_name, None);
        assert_eq!(imported.store.len(), 3);
    }

    #[test]
    fn test_snapshot_file_name() {
        assert_eq!(
            snapshot_file_name(Some("Edinburgh Voyage!"), &window()),
            "edinburgh-voyage-2025-05-15-2025-05-19.json"
        );
        assert_eq!(
            snapshot_file_name(None, &window()),
            "trip-2025-05-15-2025-05-19.json"
        );
        assert_eq!(
            snapshot_file_name(Some("  ***  "), &window()),
            "trip-2025-05-15-2025-05-19.json"
        );
    }

    #[test]
    fn test_memory_snapshots_return_latest() {
        let mut snapshots = MemorySnapshots::default();
        assert_eq!(snapshots.load().unwrap(), None);

        let first = export(
            &ScheduleStore::new(window()),
            None,
            &WeatherCache::new(),
            Currency::Eur,
            exported_at(),
        );
        let second = export(
            &sample_store(),
            None,
            &WeatherCache::new(),
            Currency::Eur,
            exported_at(),
        );
        snapshots.save(&first).unwrap();
        snapshots.save(&second).unwrap();
        assert_eq!(snapshots.saved().len(), 2);
        assert_eq!(snapshots.load().unwrap(), Some(second));
    }
}
