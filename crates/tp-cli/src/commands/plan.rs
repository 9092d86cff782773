//! The working plan shared by every command.
//!
//! Each invocation loads the newest snapshot, applies one change through the
//! core and saves a new snapshot.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use tp_core::weather::cached_forecast;
use tp_core::{
    Currency, EntryDraft, EntryId, ImportedPlan, PlanDocument, ScheduleStore, SeasonalWeather,
    SnapshotStore, TimeBlock, WeatherCache, WeatherSnapshot, export, find_conflict, restore,
};

use super::util::{UNNAMED_TRIP, entry_line};

#[derive(Debug, Clone)]
pub struct Plan {
    pub store: ScheduleStore,
    pub trip_name: Option<String>,
    pub weather_cache: WeatherCache,
    pub currency: Currency,
}

impl Plan {
    pub fn new(store: ScheduleStore, trip_name: Option<String>, currency: Currency) -> Self {
        Self {
            store,
            trip_name,
            weather_cache: WeatherCache::new(),
            currency,
        }
    }

    pub fn from_imported(imported: ImportedPlan) -> Self {
        Self {
            store: imported.store,
            trip_name: imported.trip_name,
            weather_cache: imported.weather_cache,
            currency: imported.currency,
        }
    }

    /// Loads the newest saved plan, if any.
    pub fn load<S>(snapshots: &S) -> Result<Option<Self>>
    where
        S: SnapshotStore,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        let Some(doc) = snapshots.load().context("failed to load the saved plan")? else {
            return Ok(None);
        };
        let imported = restore(doc).context("the saved plan is invalid")?;
        Ok(Some(Self::from_imported(imported)))
    }

    /// Loads the newest saved plan, failing when no trip exists yet.
    pub fn require<S>(snapshots: &S) -> Result<Self>
    where
        S: SnapshotStore,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        match Self::load(snapshots)? {
            Some(plan) => Ok(plan),
            None => bail!("no trip planned yet; run 'tp init' first"),
        }
    }

    pub fn document(&self, now: DateTime<Utc>) -> PlanDocument {
        export(
            &self.store,
            self.trip_name.as_deref(),
            &self.weather_cache,
            self.currency,
            now,
        )
    }

    pub fn save<S>(&self, snapshots: &mut S, now: DateTime<Utc>) -> Result<()>
    where
        S: SnapshotStore,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        snapshots
            .save(&self.document(now))
            .context("failed to save the plan")
    }

    pub fn name(&self) -> &str {
        self.trip_name.as_deref().unwrap_or(UNNAMED_TRIP)
    }

    /// Weather for `date`, from the cache or the seasonal source.
    ///
    /// Forecast failures are logged and yield `None`; an entry is still added
    /// without weather.
    pub fn forecast(&mut self, date: NaiveDate) -> Option<WeatherSnapshot> {
        match cached_forecast(&mut self.weather_cache, &SeasonalWeather::default(), date) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "no weather for entry");
                None
            }
        }
    }

    /// Runs the overlap check for `candidate`.
    ///
    /// With `strict` a conflict aborts the command; otherwise a warning is
    /// written and the caller goes ahead.
    pub fn check_conflict<W: Write, B: TimeBlock + ?Sized>(
        &self,
        writer: &mut W,
        candidate: &B,
        strict: bool,
    ) -> Result<()> {
        let Some(existing) = find_conflict(&self.store, candidate) else {
            return Ok(());
        };
        if strict {
            bail!("overlaps with {}", entry_line(existing));
        }
        writeln!(writer, "Warning: overlaps with {}", entry_line(existing))?;
        Ok(())
    }

    /// Adds a new entry after attaching weather and checking for overlaps.
    pub fn schedule<W: Write>(
        &mut self,
        writer: &mut W,
        draft: EntryDraft,
        strict: bool,
    ) -> Result<EntryId> {
        let draft = match self.forecast(draft.date) {
            Some(weather) => draft.with_weather(weather),
            None => draft,
        };
        self.check_conflict(writer, &draft, strict)?;
        let id = self.store.add(draft).context("failed to add entry")?;
        tracing::debug!(id = %id, "entry added");
        Ok(id)
    }
}
