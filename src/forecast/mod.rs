pub mod aggregate;
pub mod chart;
pub mod mock;
pub mod openweather;
pub mod types;

use async_trait::async_trait;
use openweather::OpenWeatherError;
use types::*;

/// Upstream weather data as the dashboard needs it.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Canonical name of the first fuzzy match, or `query` itself when nothing matches.
    async fn resolve_city(&self, query: &str) -> Result<String, OpenWeatherError>;

    async fn current_weather(&self, city: &str) -> Result<CurrentConditions, OpenWeatherError>;

    async fn current_weather_at(&self, lat: f64, lon: f64) -> Result<CurrentConditions, OpenWeatherError>;

    async fn forecast(&self, city: &str) -> Result<ForecastSeries, OpenWeatherError>;

    /// AQI of the most recent data point.
    async fn air_quality(&self, lat: f64, lon: f64) -> Result<u8, OpenWeatherError>;
}
