//! Weather forecasts attached to schedule entries.
//!
//! The core never fetches weather itself. A [`WeatherSource`] is injected by the
//! caller; [`SeasonalWeather`] is a deterministic stand-in for a real service.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Forecasts already fetched, keyed by date.
pub type WeatherCache = BTreeMap<NaiveDate, WeatherSnapshot>;

/// Broad sky condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Sunny,
    PartlyCloudy,
    Cloudy,
    LightRain,
    Rain,
}

impl WeatherKind {
    pub const ALL: [Self; 5] = [
        Self::Sunny,
        Self::PartlyCloudy,
        Self::Cloudy,
        Self::LightRain,
        Self::Rain,
    ];

    pub const fn is_rain(self) -> bool {
        matches!(self, Self::LightRain | Self::Rain)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Cloudy => "Cloudy",
            Self::LightRain => "Light rain",
            Self::Rain => "Rain",
        }
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A forecast for one day, as returned by a [`WeatherSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    #[serde(rename = "type")]
    pub kind: WeatherKind,
    pub temperature_c: f64,
    /// Chance of precipitation, 0–100.
    pub precipitation_probability_pct: u8,
    pub wind_speed_kmh: f64,
}

impl WeatherSnapshot {
    /// Short human description, e.g. `Light rain, 11.5°C`.
    pub fn description(&self) -> String {
        format!("{}, {}°C", self.kind, self.temperature_c)
    }

    /// What to pack for the day.
    pub fn recommendation(&self) -> &'static str {
        if self.kind.is_rain() || self.precipitation_probability_pct > 50 {
            "Take an umbrella and a waterproof jacket."
        } else if self.kind == WeatherKind::Cloudy && self.temperature_c < 12.0 {
            "Bring a light jacket, it may feel cool."
        } else if self.kind == WeatherKind::Sunny && self.temperature_c > 15.0 {
            "A good day for outdoor activities."
        } else if self.kind == WeatherKind::PartlyCloudy {
            "Changeable weather, carry an extra layer."
        } else {
            "A typical day, be ready for anything."
        }
    }
}

/// A forecast that could not be obtained.
///
/// Treated as "not fetched yet"; retrying is the caller's decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("weather for {date} is unavailable: {reason}")]
pub struct WeatherUnavailable {
    pub date: NaiveDate,
    pub reason: String,
}

/// Anything that can produce a forecast for a date.
pub trait WeatherSource {
    fn forecast(&self, date: NaiveDate) -> Result<WeatherSnapshot, WeatherUnavailable>;
}

/// Returns the cached forecast for `date`, fetching and caching it on a miss.
pub fn cached_forecast<S: WeatherSource + ?Sized>(
    cache: &mut WeatherCache,
    source: &S,
    date: NaiveDate,
) -> Result<WeatherSnapshot, WeatherUnavailable> {
    if let Some(hit) = cache.get(&date) {
        return Ok(hit.clone());
    }
    let forecast = source.forecast(date)?;
    cache.insert(date, forecast.clone());
    Ok(forecast)
}

/// Relative frequency of each [`WeatherKind`], in `WeatherKind::ALL` order.
const KIND_WEIGHTS: [f64; 5] = [0.2, 0.3, 0.2, 0.2, 0.1];

/// A deterministic late-spring forecast generator.
///
/// The same seed and date always produce the same forecast, which keeps plans
/// and tests reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalWeather {
    seed: u64,
}

impl SeasonalWeather {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl WeatherSource for SeasonalWeather {
    fn forecast(&self, date: NaiveDate) -> Result<WeatherSnapshot, WeatherUnavailable> {
        let day = u64::from(date.num_days_from_ce().unsigned_abs());
        let mut rng = StdRng::seed_from_u64(self.seed ^ day.wrapping_mul(0xA24B_AED4_963E_E407));

        let kinds = WeightedIndex::new(KIND_WEIGHTS).map_err(|err| WeatherUnavailable {
            date,
            reason: err.to_string(),
        })?;
        let kind = WeatherKind::ALL[kinds.sample(&mut rng)];

        let temperature_c = round_tenth(rng.random_range(8.0..17.0));
        let precipitation = if kind.is_rain() {
            rng.random_range(50.0..100.0)
        } else {
            rng.random_range(0.0..30.0)
        };
        let wind_speed_kmh = round_tenth(rng.random_range(5.0..20.0));

        Ok(WeatherSnapshot {
            kind,
            temperature_c,
            precipitation_probability_pct: percent(precipitation),
            wind_speed_kmh,
        })
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
