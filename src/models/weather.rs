use crate::error::{Result, WeatherWatchError};
use serde::{Deserialize, Serialize};

/// One point-in-time reading used for rule evaluation.
///
/// Units are fixed: temperature in °C, wind speed in km/h, precipitation in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub precipitation_mm: f64,
}

impl WeatherSample {
    pub fn new(temperature_c: f64, wind_speed_kmh: f64, precipitation_mm: f64) -> Self {
        Self {
            temperature_c,
            wind_speed_kmh,
            precipitation_mm,
        }
    }

    /// Build a sample from nullable API values.
    ///
    /// Every rule reads all three fields, so an absent value fails the whole
    /// sample instead of being defaulted.
    pub fn from_reading(
        temperature_c: Option<f64>,
        wind_speed_kmh: Option<f64>,
        precipitation_mm: Option<f64>,
    ) -> Result<Self> {
        Ok(Self {
            temperature_c: temperature_c.ok_or(WeatherWatchError::MissingField("temperature"))?,
            wind_speed_kmh: wind_speed_kmh.ok_or(WeatherWatchError::MissingField("wind_speed"))?,
            precipitation_mm: precipitation_mm
                .ok_or(WeatherWatchError::MissingField("precipitation"))?,
        })
    }

    pub fn is_dry(&self) -> bool {
        self.precipitation_mm == 0.0
    }

    pub fn is_freezing(&self) -> bool {
        self.temperature_c <= 0.0
    }
}

impl std::fmt::Display for WeatherSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}°C, Rain {}mm, Wind {}km/h",
            self.temperature_c, self.precipitation_mm, self.wind_speed_kmh
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_reading_all_present() {
        let sample = WeatherSample::from_reading(Some(4.5), Some(12.0), Some(0.0)).unwrap();
        assert_eq!(sample, WeatherSample::new(4.5, 12.0, 0.0));
    }

    #[test]
    fn from_reading_reports_first_missing_field() {
        let err = WeatherSample::from_reading(None, None, Some(1.0)).unwrap_err();
        assert!(matches!(err, WeatherWatchError::MissingField("temperature")));

        let err = WeatherSample::from_reading(Some(1.0), Some(3.0), None).unwrap_err();
        assert!(matches!(
            err,
            WeatherWatchError::MissingField("precipitation")
        ));
    }

    #[test]
    fn display_renders_values_verbatim() {
        let sample = WeatherSample::new(12.5, 7.0, 0.0);
        assert_eq!(sample.to_string(), "12.5°C, Rain 0mm, Wind 7km/h");
    }

    #[test]
    fn freezing_and_dry_helpers() {
        assert!(WeatherSample::new(0.0, 0.0, 0.0).is_freezing());
        assert!(!WeatherSample::new(0.1, 0.0, 0.0).is_freezing());
        assert!(WeatherSample::new(20.0, 0.0, 0.0).is_dry());
        assert!(!WeatherSample::new(20.0, 0.0, 0.2).is_dry());
    }
}
