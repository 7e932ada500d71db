use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

// Internal representation

/// One observation or 3-hour forecast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSample {
    pub ts: i64,
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_ms: f64,
    pub icon: String,
    /// Condition category such as "Rain" or "Clouds".
    pub condition: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city: String,
    /// Shift in seconds from UTC of the forecast city.
    pub utc_offset_secs: i32,
    pub samples: Vec<WeatherSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentConditions {
    pub city: String,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub sample: WeatherSample,
    pub feels_like_c: f64,
    pub pressure_hpa: f64,
    pub visibility_m: Option<f64>,
    pub sunrise: i64,
    pub sunset: i64,
    pub utc_offset_secs: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailySummary {
    pub day: String,
    pub avg_temp_c: i64,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub wind_speed: Vec<f64>,
}

// OpenWeather 2.5 wire format

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Coord,
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
    pub visibility: Option<f64>,
    pub wind: Wind,
    pub dt: i64,
    pub sys: CurrentSys,
    #[serde(default)]
    pub timezone: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSys {
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast3hResponse {
    pub cod: String,
    pub cnt: i32,
    pub list: Vec<Forecast3hItem>,
    pub city: Forecast3hCity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast3hItem {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    pub visibility: Option<i32>,
    pub pop: Option<f64>,
    pub rain: Option<HashMap<String, f64>>,
    pub dt_txt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast3hCity {
    pub name: String,
    pub coord: Option<Coord>,
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: i32,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub list: Vec<FindItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindItem {
    pub name: String,
    pub coord: Option<Coord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionResponse {
    pub list: Vec<AirPollutionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionItem {
    pub dt: Option<i64>,
    pub main: AirQualityMain,
    pub components: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityMain {
    pub aqi: u8,
}
