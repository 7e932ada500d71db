//! Data the front end needs beyond raw readings: which backdrop to play,
//! whether to use the day or night palette, and the detail tiles.

use crate::forecast::types::CurrentConditions;
use crate::utils::{round_to_decimals, DisplayZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    Clear,
    Clouds,
    Rain,
    Storm,
    Mist,
}

impl Backdrop {
    /// Pick a backdrop from a condition category. Checks run in a fixed order,
    /// so "thunderstorm with rain" plays the rain backdrop.
    pub fn for_condition(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        if condition.contains("rain") {
            Backdrop::Rain
        } else if condition.contains("storm") || condition.contains("thunder") {
            Backdrop::Storm
        } else if condition.contains("cloud") {
            Backdrop::Clouds
        } else if condition.contains("mist") || condition.contains("fog") {
            Backdrop::Mist
        } else {
            Backdrop::Clear
        }
    }

    pub fn video(&self) -> &'static str {
        match self {
            Backdrop::Clear => "clear.mp4",
            Backdrop::Clouds => "clouds.mp4",
            Backdrop::Rain => "rain.mp4",
            Backdrop::Storm => "thunder.mp4",
            Backdrop::Mist => "mist.mp4",
        }
    }

    pub fn ambient_audio(&self) -> Option<&'static str> {
        match self {
            Backdrop::Rain => Some("rain"),
            Backdrop::Storm => Some("thunder"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BackdropView {
    pub kind: Backdrop,
    pub video: String,
    pub audio: Option<String>,
}

impl From<Backdrop> for BackdropView {
    fn from(kind: Backdrop) -> Self {
        Self {
            kind,
            video: kind.video().to_string(),
            audio: kind.ambient_audio().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Day,
    Night,
}

impl Theme {
    /// Day strictly between sunrise and sunset.
    pub fn at(now: i64, sunrise: i64, sunset: i64) -> Self {
        if now > sunrise && now < sunset {
            Theme::Day
        } else {
            Theme::Night
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherDetails {
    pub visibility_km: Option<f64>,
    pub pressure_hpa: f64,
    pub dew_point_c: f64,
    pub sunrise: String,
    pub sunset: String,
}

/// Rough dew point from temperature and relative humidity: T - (100 - RH) / 5.
pub fn dew_point(temp_c: f64, humidity: f64) -> f64 {
    round_to_decimals(temp_c - (100.0 - humidity) / 5.0, 1)
}

impl WeatherDetails {
    pub fn from_current(current: &CurrentConditions, zone: &DisplayZone) -> Self {
        Self {
            visibility_km: current.visibility_m.map(|m| round_to_decimals(m / 1000.0, 1)),
            pressure_hpa: current.pressure_hpa,
            dew_point_c: dew_point(current.sample.temp_c, current.sample.humidity),
            sunrise: zone.time_label(current.sunrise),
            sunset: zone.time_label(current.sunset),
        }
    }
}
