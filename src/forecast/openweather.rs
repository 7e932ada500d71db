use super::types::*;
use super::WeatherApi;
use crate::config::Config;
use crate::utils::validate_coordinates;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenWeatherError {
    #[error("City not found")]
    NotFound(String),
    #[error("Forecast fetch failed")]
    FetchFailed { status: u16 },
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Invalid coordinates")]
    InvalidCoordinates,
}

pub struct OpenWeatherClient {
    client: Client,
    config: Config,
}

impl OpenWeatherClient {
    pub fn new(config: Config) -> Result<Self, OpenWeatherError> {
        let mut builder = Client::builder().user_agent("WeatherDashboard/1.0");
        if let Some(secs) = config.http_timeout_secs.filter(|secs| *secs > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.openweather_base_url.trim_end_matches('/'), path)
    }

    /// One GET, no retry. Status handling is left to the caller.
    async fn send(&self, url: &str, params: &[(&str, &str)]) -> Result<Response, OpenWeatherError> {
        let response = self.client.get(url).query(params).send().await?;
        tracing::debug!(url, status = %response.status(), "OpenWeather response");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, OpenWeatherError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_current_weather(&self, city: &str) -> Result<CurrentConditions, OpenWeatherError> {
        let url = self.endpoint(&self.config.openweather_current_path);

        let response = self
            .send(&url, &[
                ("q", city),
                ("units", &self.config.units),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        if !response.status().is_success() {
            tracing::warn!(city, status = %response.status(), "Current weather lookup failed");
            return Err(OpenWeatherError::NotFound(city.to_string()));
        }

        let current: CurrentWeatherResponse = Self::decode(response).await?;
        CurrentConditions::try_from(current)
    }

    pub async fn get_current_weather_at(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, OpenWeatherError> {
        validate_coordinates(lat, lon).map_err(|_| OpenWeatherError::InvalidCoordinates)?;

        let url = self.endpoint(&self.config.openweather_current_path);
        let (lat_param, lon_param) = (lat.to_string(), lon.to_string());

        let response = self
            .send(&url, &[
                ("lat", &lat_param),
                ("lon", &lon_param),
                ("units", &self.config.units),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        if !response.status().is_success() {
            tracing::warn!(lat, lon, status = %response.status(), "Current weather lookup by coordinates failed");
            return Err(OpenWeatherError::NotFound(format!("{lat},{lon}")));
        }

        let current: CurrentWeatherResponse = Self::decode(response).await?;
        CurrentConditions::try_from(current)
    }

    pub async fn get_forecast3h(&self, city: &str) -> Result<ForecastSeries, OpenWeatherError> {
        let url = self.endpoint(&self.config.openweather_forecast3h_path);

        let response = self
            .send(&url, &[
                ("q", city),
                ("units", &self.config.units),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(city, %status, "Forecast fetch failed");
            return Err(OpenWeatherError::FetchFailed { status: status.as_u16() });
        }

        let forecast: Forecast3hResponse = Self::decode(response).await?;
        ForecastSeries::try_from(forecast)
    }

    /// Fuzzy "like" search. Zero matches, or an upstream refusal, echo the query back.
    pub async fn search_city(&self, query: &str) -> Result<String, OpenWeatherError> {
        let url = self.endpoint(&self.config.openweather_find_path);

        let response = self
            .send(&url, &[
                ("q", query),
                ("type", "like"),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        if !response.status().is_success() {
            tracing::debug!(query, status = %response.status(), "City search refused, keeping query");
            return Ok(query.to_string());
        }

        let found: FindResponse = Self::decode(response).await?;
        Ok(first_match_or_query(&found, query))
    }

    pub async fn get_air_quality(&self, lat: f64, lon: f64) -> Result<u8, OpenWeatherError> {
        validate_coordinates(lat, lon).map_err(|_| OpenWeatherError::InvalidCoordinates)?;

        let url = self.endpoint(&self.config.openweather_air_pollution_path);
        let (lat_param, lon_param) = (lat.to_string(), lon.to_string());

        let response = self
            .send(&url, &[
                ("lat", &lat_param),
                ("lon", &lon_param),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OpenWeatherError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let pollution: AirPollutionResponse = Self::decode(response).await?;
        pollution
            .list
            .first()
            .map(|item| item.main.aqi)
            .ok_or_else(|| OpenWeatherError::MalformedResponse("air pollution list is empty".to_string()))
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn resolve_city(&self, query: &str) -> Result<String, OpenWeatherError> {
        self.search_city(query).await
    }

    async fn current_weather(&self, city: &str) -> Result<CurrentConditions, OpenWeatherError> {
        self.get_current_weather(city).await
    }

    async fn current_weather_at(&self, lat: f64, lon: f64) -> Result<CurrentConditions, OpenWeatherError> {
        self.get_current_weather_at(lat, lon).await
    }

    async fn forecast(&self, city: &str) -> Result<ForecastSeries, OpenWeatherError> {
        self.get_forecast3h(city).await
    }

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<u8, OpenWeatherError> {
        self.get_air_quality(lat, lon).await
    }
}

pub(crate) fn first_match_or_query(found: &FindResponse, query: &str) -> String {
    match found.list.first() {
        Some(item) if found.count > 0 => item.name.clone(),
        _ => query.to_string(),
    }
}

fn primary_condition(weather: &[WeatherCondition]) -> Result<&WeatherCondition, OpenWeatherError> {
    weather
        .first()
        .ok_or_else(|| OpenWeatherError::MalformedResponse("weather conditions missing".to_string()))
}

// Convert OpenWeather data to internal format
impl TryFrom<&Forecast3hItem> for WeatherSample {
    type Error = OpenWeatherError;

    fn try_from(item: &Forecast3hItem) -> Result<Self, Self::Error> {
        let condition = primary_condition(&item.weather)?;

        Ok(Self {
            ts: item.dt,
            temp_c: item.main.temp,
            humidity: item.main.humidity,
            wind_ms: item.wind.speed,
            icon: condition.icon.clone(),
            condition: condition.main.clone(),
            description: condition.description.clone(),
        })
    }
}

impl TryFrom<Forecast3hResponse> for ForecastSeries {
    type Error = OpenWeatherError;

    fn try_from(forecast: Forecast3hResponse) -> Result<Self, Self::Error> {
        let samples = forecast
            .list
            .iter()
            .map(WeatherSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            city: forecast.city.name,
            utc_offset_secs: forecast.city.timezone,
            samples,
        })
    }
}

impl TryFrom<CurrentWeatherResponse> for CurrentConditions {
    type Error = OpenWeatherError;

    fn try_from(current: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let condition = primary_condition(&current.weather)?;

        let sample = WeatherSample {
            ts: current.dt,
            temp_c: current.main.temp,
            humidity: current.main.humidity,
            wind_ms: current.wind.speed,
            icon: condition.icon.clone(),
            condition: condition.main.clone(),
            description: condition.description.clone(),
        };

        Ok(Self {
            city: current.name,
            country: current.sys.country,
            lat: current.coord.lat,
            lon: current.coord.lon,
            sample,
            feels_like_c: current.main.feels_like,
            pressure_hpa: current.main.pressure,
            visibility_m: current.visibility,
            sunrise: current.sys.sunrise,
            sunset: current.sys.sunset,
            utc_offset_secs: current.timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(dt: i64, temp: f64, weather: Vec<WeatherCondition>) -> Forecast3hItem {
        Forecast3hItem {
            dt,
            main: MainReadings {
                temp,
                feels_like: temp,
                temp_min: None,
                temp_max: None,
                pressure: 1012.0,
                humidity: 70.0,
            },
            weather,
            wind: Wind { speed: 3.5, deg: Some(200.0), gust: None },
            visibility: Some(10000),
            pop: None,
            rain: None,
            dt_txt: None,
        }
    }

    fn rain() -> WeatherCondition {
        WeatherCondition {
            id: 500,
            main: "Rain".to_string(),
            description: "light rain".to_string(),
            icon: "10d".to_string(),
        }
    }

    #[test]
    fn test_sample_from_forecast_item() {
        let sample = WeatherSample::try_from(&item(1_700_000_000, 12.3, vec![rain()])).unwrap();
        assert_eq!(sample.ts, 1_700_000_000);
        assert_eq!(sample.temp_c, 12.3);
        assert_eq!(sample.humidity, 70.0);
        assert_eq!(sample.wind_ms, 3.5);
        assert_eq!(sample.icon, "10d");
        assert_eq!(sample.condition, "Rain");
    }

    #[test]
    fn test_sample_without_conditions_is_malformed() {
        let err = WeatherSample::try_from(&item(0, 1.0, vec![])).unwrap_err();
        assert!(matches!(err, OpenWeatherError::MalformedResponse(_)));
    }

    #[test]
    fn test_first_match_or_query() {
        let none = FindResponse { count: 0, list: vec![] };
        assert_eq!(first_match_or_query(&none, "Xyzzy"), "Xyzzy");

        let one = FindResponse {
            count: 1,
            list: vec![FindItem { name: "London".to_string(), coord: None }],
        };
        assert_eq!(first_match_or_query(&one, "Londo"), "London");
    }

    #[test]
    fn test_error_messages_match_user_facing_text() {
        assert_eq!(OpenWeatherError::NotFound("Nowhere".into()).to_string(), "City not found");
        assert_eq!(OpenWeatherError::FetchFailed { status: 500 }.to_string(), "Forecast fetch failed");
    }
}
