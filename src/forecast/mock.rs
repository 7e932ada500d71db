use super::openweather::OpenWeatherError;
use super::types::*;
use super::WeatherApi;
use crate::utils::{haversine_distance, validate_coordinates};
use async_trait::async_trait;
use chrono::Utc;

const STEP_SECS: i64 = 3 * 3600;
const FORECAST_STEPS: i64 = 40;
// Phase origin of the synthetic diurnal curve
const CURVE_EPOCH: i64 = 1_704_067_200;

struct MockCity {
    name: &'static str,
    country: &'static str,
    lat: f64,
    lon: f64,
    utc_offset_secs: i32,
    base_temp: f64,
}

const CITIES: [MockCity; 8] = [
    MockCity { name: "London", country: "GB", lat: 51.5085, lon: -0.1257, utc_offset_secs: 0, base_temp: 11.0 },
    MockCity { name: "Delhi", country: "IN", lat: 28.6667, lon: 77.2167, utc_offset_secs: 19_800, base_temp: 27.0 },
    MockCity { name: "Mumbai", country: "IN", lat: 19.0144, lon: 72.8479, utc_offset_secs: 19_800, base_temp: 29.0 },
    MockCity { name: "Bengaluru", country: "IN", lat: 12.9762, lon: 77.6033, utc_offset_secs: 19_800, base_temp: 24.0 },
    MockCity { name: "Chennai", country: "IN", lat: 13.0878, lon: 80.2785, utc_offset_secs: 19_800, base_temp: 30.0 },
    MockCity { name: "Kolkata", country: "IN", lat: 22.5697, lon: 88.3697, utc_offset_secs: 19_800, base_temp: 28.0 },
    MockCity { name: "Hyderabad", country: "IN", lat: 17.3840, lon: 78.4564, utc_offset_secs: 19_800, base_temp: 27.0 },
    MockCity { name: "Bangkok", country: "TH", lat: 13.7563, lon: 100.5018, utc_offset_secs: 25_200, base_temp: 31.0 },
];

const CONDITIONS: [(&str, &str, &str); 5] = [
    ("Clear", "clear sky", "01"),
    ("Clouds", "scattered clouds", "03"),
    ("Rain", "light rain", "10"),
    ("Thunderstorm", "thunderstorm", "11"),
    ("Mist", "mist", "50"),
];

/// Offline stand-in for OpenWeather with a fixed set of cities.
/// Output is reproducible for a given start time.
pub struct MockWeatherClient {
    start: Option<i64>,
}

impl MockWeatherClient {
    pub fn new() -> Self {
        Self { start: None }
    }

    /// Pin the first forecast step instead of following the clock.
    pub fn with_start(start: i64) -> Self {
        Self { start: Some(start) }
    }

    fn start_ts(&self) -> i64 {
        let ts = self.start.unwrap_or_else(|| Utc::now().timestamp());
        (ts / STEP_SECS) * STEP_SECS
    }

    fn find(name: &str) -> Option<&'static MockCity> {
        CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    fn sample(city: &MockCity, ts: i64, rng: &mut fastrand::Rng) -> WeatherSample {
        let hours = ((ts - CURVE_EPOCH) / 3600) as f64;
        let local_hour = (ts + city.utc_offset_secs as i64).rem_euclid(86_400) / 3600;
        let (condition, description, icon) = CONDITIONS[rng.usize(..CONDITIONS.len())];
        let suffix = if (6..18).contains(&local_hour) { "d" } else { "n" };

        WeatherSample {
            ts,
            temp_c: city.base_temp + 4.0 * (hours * 0.26).sin() + rng.f64() - 0.5,
            humidity: (65.0 + 20.0 * (hours * 0.13).cos()).round(),
            wind_ms: 2.5 + 2.5 * rng.f64(),
            icon: format!("{icon}{suffix}"),
            condition: condition.to_string(),
            description: description.to_string(),
        }
    }

    fn conditions_for(city: &MockCity, ts: i64) -> CurrentConditions {
        let mut rng = fastrand::Rng::with_seed(seed_for(city.name, ts));
        let sample = Self::sample(city, ts, &mut rng);
        let midnight = ts - (ts + city.utc_offset_secs as i64).rem_euclid(86_400);

        CurrentConditions {
            city: city.name.to_string(),
            country: Some(city.country.to_string()),
            lat: city.lat,
            lon: city.lon,
            feels_like_c: sample.temp_c + 1.5,
            pressure_hpa: 1005.0 + 15.0 * rng.f64(),
            visibility_m: Some(10_000.0),
            sunrise: midnight + 6 * 3600,
            sunset: midnight + 18 * 3600,
            utc_offset_secs: city.utc_offset_secs,
            sample,
        }
    }
}

impl Default for MockWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_for(name: &str, ts: i64) -> u64 {
    name.bytes().fold(ts as u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

#[async_trait]
impl WeatherApi for MockWeatherClient {
    async fn resolve_city(&self, query: &str) -> Result<String, OpenWeatherError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(query.to_string());
        }

        Ok(CITIES
            .iter()
            .find(|c| c.name.to_lowercase().starts_with(&needle))
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| query.to_string()))
    }

    async fn current_weather(&self, city: &str) -> Result<CurrentConditions, OpenWeatherError> {
        let found = Self::find(city).ok_or_else(|| OpenWeatherError::NotFound(city.to_string()))?;
        Ok(Self::conditions_for(found, self.start_ts()))
    }

    async fn current_weather_at(&self, lat: f64, lon: f64) -> Result<CurrentConditions, OpenWeatherError> {
        validate_coordinates(lat, lon).map_err(|_| OpenWeatherError::InvalidCoordinates)?;

        let nearest = CITIES
            .iter()
            .min_by(|a, b| {
                haversine_distance(lat, lon, a.lat, a.lon).total_cmp(&haversine_distance(lat, lon, b.lat, b.lon))
            })
            .ok_or_else(|| OpenWeatherError::NotFound(format!("{lat},{lon}")))?;

        Ok(Self::conditions_for(nearest, self.start_ts()))
    }

    async fn forecast(&self, city: &str) -> Result<ForecastSeries, OpenWeatherError> {
        let found = Self::find(city).ok_or(OpenWeatherError::FetchFailed { status: 404 })?;
        let start = self.start_ts();
        let mut rng = fastrand::Rng::with_seed(seed_for(found.name, start));

        let samples = (0..FORECAST_STEPS)
            .map(|step| Self::sample(found, start + step * STEP_SECS, &mut rng))
            .collect();

        Ok(ForecastSeries {
            city: found.name.to_string(),
            utc_offset_secs: found.utc_offset_secs,
            samples,
        })
    }

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<u8, OpenWeatherError> {
        validate_coordinates(lat, lon).map_err(|_| OpenWeatherError::InvalidCoordinates)?;
        Ok(1 + ((lat.abs() + lon.abs()) as u64 % 5) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_705_276_800;

    #[tokio::test]
    async fn test_resolve_city_prefix_match() {
        let mock = MockWeatherClient::with_start(START);
        assert_eq!(mock.resolve_city("Londo").await.unwrap(), "London");
        assert_eq!(mock.resolve_city("mum").await.unwrap(), "Mumbai");
        assert_eq!(mock.resolve_city("Atlantis").await.unwrap(), "Atlantis");
        assert_eq!(mock.resolve_city("").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unknown_city_fails_like_upstream() {
        let mock = MockWeatherClient::with_start(START);
        assert!(matches!(
            mock.current_weather("Atlantis").await,
            Err(OpenWeatherError::NotFound(_))
        ));
        assert!(matches!(
            mock.forecast("Atlantis").await,
            Err(OpenWeatherError::FetchFailed { status: 404 })
        ));
    }

    #[tokio::test]
    async fn test_forecast_is_forty_three_hour_steps() {
        let mock = MockWeatherClient::with_start(START);
        let series = mock.forecast("London").await.unwrap();

        assert_eq!(series.samples.len(), 40);
        assert_eq!(series.samples[0].ts, START);
        assert!(series.samples.windows(2).all(|w| w[1].ts - w[0].ts == STEP_SECS));
    }

    #[tokio::test]
    async fn test_output_is_reproducible() {
        let a = MockWeatherClient::with_start(START).forecast("Delhi").await.unwrap();
        let b = MockWeatherClient::with_start(START).forecast("Delhi").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_coordinates_pick_nearest_city() {
        let mock = MockWeatherClient::with_start(START);
        let current = mock.current_weather_at(51.4, -0.2).await.unwrap();
        assert_eq!(current.city, "London");
        assert!(current.sunrise < current.sunset);
    }

    #[tokio::test]
    async fn test_air_quality_in_range() {
        let mock = MockWeatherClient::with_start(START);
        let aqi = mock.air_quality(28.6667, 77.2167).await.unwrap();
        assert!((1..=5).contains(&aqi));
        assert!(matches!(
            mock.air_quality(100.0, 0.0).await,
            Err(OpenWeatherError::InvalidCoordinates)
        ));
    }
}
