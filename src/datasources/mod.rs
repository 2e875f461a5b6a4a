pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

use crate::error::Result;
use crate::models::WeatherReport;
use async_trait::async_trait;

/// Supplier of hourly weather data
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<WeatherReport>;
}
