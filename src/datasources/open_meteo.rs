use super::WeatherSource;
use crate::config::{LocationConfig, OpenMeteoConfig};
use crate::error::{Result, WeatherWatchError};
use crate::models::{HourlySeries, WeatherReport};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Instant;

const HOURLY_FIELDS: &str = "temperature_2m,windspeed_10m,precipitation";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    api_base: String,
    location: LocationConfig,
}

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    hourly: OmHourly,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(config: &OpenMeteoConfig, location: LocationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            location,
        }
    }

    fn forecast_url(&self) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&hourly={}&timezone={}",
            self.api_base,
            self.location.latitude,
            self.location.longitude,
            HOURLY_FIELDS,
            self.location.timezone.replace('/', "%2F")
        )
    }

    /// Fetch the hourly forecast for the configured location
    pub async fn fetch_forecast(&self) -> Result<WeatherReport> {
        let started = Instant::now();

        let response = self
            .client
            .get(self.forecast_url())
            .send()
            .await
            .map_err(|e| WeatherWatchError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherWatchError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let om_response: OmForecastResponse = response.json().await.map_err(|e| {
            WeatherWatchError::DataSourceUnavailable(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            ))
        })?;

        tracing::debug!(
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            hours = om_response.hourly.time.len(),
            "Open-Meteo forecast fetched"
        );

        let report = Self::convert_response(om_response);
        if report.hourly.is_empty() {
            return Err(WeatherWatchError::DataSourceUnavailable(
                "Open-Meteo returned an empty hourly series".into(),
            ));
        }
        Ok(report)
    }

    fn convert_response(response: OmForecastResponse) -> WeatherReport {
        WeatherReport {
            fetched_at: Utc::now(),
            utc_offset_seconds: response.utc_offset_seconds,
            hourly: HourlySeries {
                time: response.hourly.time,
                temperature_c: response.hourly.temperature_2m,
                wind_speed_kmh: response.hourly.windspeed_10m,
                precipitation_mm: response.hourly.precipitation,
            },
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    fn name(&self) -> &'static str {
        "Open-Meteo"
    }

    async fn fetch(&self) -> Result<WeatherReport> {
        self.fetch_forecast().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn location() -> LocationConfig {
        LocationConfig {
            name: "Dresden".into(),
            latitude: 51.0504,
            longitude: 13.7373,
            timezone: "Europe/Berlin".into(),
        }
    }

    fn client(base: &str) -> OpenMeteoClient {
        OpenMeteoClient::new(
            &OpenMeteoConfig {
                api_base: base.to_string(),
            },
            location(),
        )
    }

    #[test]
    fn forecast_url_requests_hourly_fields() {
        let url = client("https://api.open-meteo.com/").forecast_url();
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?"));
        assert!(url.contains("hourly=temperature_2m,windspeed_10m,precipitation"));
        assert!(url.contains("timezone=Europe%2FBerlin"));
    }

    #[tokio::test]
    async fn fetch_parses_nullable_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "51.0504"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "utc_offset_seconds": 3600,
                "hourly": {
                    "time": ["2025-01-10T00:00", "2025-01-10T01:00"],
                    "temperature_2m": [1.5, null],
                    "windspeed_10m": [12.0, 14.0],
                    "precipitation": [0.0, 0.3]
                }
            })))
            .mount(&server)
            .await;

        let report = client(&server.uri()).fetch().await.unwrap();
        assert_eq!(report.utc_offset_seconds, 3600);
        assert_eq!(report.hourly.len(), 2);

        let sample = report.sample_at(0).unwrap();
        assert_eq!(sample.temperature_c, 1.5);
        assert_eq!(sample.precipitation_mm, 0.0);
        assert!(matches!(
            report.sample_at(1),
            Err(WeatherWatchError::MissingField("temperature"))
        ));
    }

    #[tokio::test]
    async fn fetch_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).fetch().await.unwrap_err();
        match err {
            WeatherWatchError::DataSourceUnavailable(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn empty_series_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "utc_offset_seconds": 0,
                "hourly": {
                    "time": [],
                    "temperature_2m": [],
                    "windspeed_10m": [],
                    "precipitation": []
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri()).fetch().await.unwrap_err();
        assert!(matches!(err, WeatherWatchError::DataSourceUnavailable(_)));
    }
}
