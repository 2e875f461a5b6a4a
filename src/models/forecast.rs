use super::weather::WeatherSample;
use crate::error::{Result, WeatherWatchError};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hours between displayed forecast points
pub const OUTLOOK_STEP_HOURS: usize = 3;
/// Number of displayed forecast points (covers the next 24 hours)
pub const OUTLOOK_POINTS: usize = 8;

/// Hourly weather data for one location, as fetched from the weather source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub fetched_at: DateTime<Utc>,
    /// Offset of the series' local time labels from UTC
    pub utc_offset_seconds: i32,
    pub hourly: HourlySeries,
}

/// Parallel hourly series. Values can be null upstream, so each is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>, // local "YYYY-MM-DDTHH:MM"
    pub temperature_c: Vec<Option<f64>>,
    pub wind_speed_kmh: Vec<Option<f64>>,
    pub precipitation_mm: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn value(series: &[Option<f64>], index: usize) -> Option<f64> {
        series.get(index).copied().flatten()
    }
}

impl WeatherReport {
    /// Wall-clock time in the report's timezone
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.naive_utc() + Duration::seconds(self.utc_offset_seconds as i64)
    }

    /// Index of the hourly slot containing `now`
    pub fn current_index(&self, now: DateTime<Utc>) -> Option<usize> {
        let label = self.local_time(now).format("%Y-%m-%dT%H:00").to_string();
        self.hourly.time.iter().position(|t| *t == label)
    }

    pub fn sample_at(&self, index: usize) -> Result<WeatherSample> {
        if index >= self.hourly.len() {
            return Err(WeatherWatchError::InvalidData(format!(
                "hour index {} outside forecast range of {} hours",
                index,
                self.hourly.len()
            )));
        }

        WeatherSample::from_reading(
            HourlySeries::value(&self.hourly.temperature_c, index),
            HourlySeries::value(&self.hourly.wind_speed_kmh, index),
            HourlySeries::value(&self.hourly.precipitation_mm, index),
        )
    }

    /// Like `current_index`, but a missing hour is an error
    pub fn current_slot(&self, now: DateTime<Utc>) -> Result<usize> {
        self.current_index(now).ok_or_else(|| {
            WeatherWatchError::DataSourceUnavailable(format!(
                "no forecast slot for {}",
                self.local_time(now).format("%Y-%m-%d %H:00")
            ))
        })
    }

    /// Display-only outlook: every third hour after `from_index`, up to 24 hours ahead.
    /// Slots past the end of the series or with null values are skipped.
    pub fn outlook(&self, from_index: usize) -> ForecastOutlook {
        let points: Vec<ForecastPoint> = (1..=OUTLOOK_POINTS)
            .map(|i| from_index + i * OUTLOOK_STEP_HOURS)
            .filter(|idx| *idx < self.hourly.len())
            .filter_map(|idx| {
                let temperature_c = HourlySeries::value(&self.hourly.temperature_c, idx)?;
                let precipitation_mm = HourlySeries::value(&self.hourly.precipitation_mm, idx)?;
                Some(ForecastPoint {
                    label: hour_label(&self.hourly.time[idx]).to_string(),
                    temperature_c,
                    precipitation_mm,
                })
            })
            .collect();

        if points.is_empty() {
            ForecastOutlook::Unavailable(format!(
                "no forecast hours after slot {} of {}",
                from_index,
                self.hourly.len()
            ))
        } else {
            ForecastOutlook::Available(points)
        }
    }
}

/// "HH:MM" tail of an ISO-like time label
fn hour_label(time: &str) -> &str {
    time.get(time.len().saturating_sub(5)..).unwrap_or(time)
}

/// A single displayed forecast point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub label: String,
    pub temperature_c: f64,
    pub precipitation_mm: f64,
}

/// Forecast for display. Absence is a value, not a swallowed error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForecastOutlook {
    Available(Vec<ForecastPoint>),
    Unavailable(String),
}

impl ForecastOutlook {
    #[cfg(test)]
    pub fn points(&self) -> &[ForecastPoint] {
        match self {
            ForecastOutlook::Available(points) => points,
            ForecastOutlook::Unavailable(_) => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ForecastOutlook::Available(_))
    }
}
