use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_SNAPSHOT_CITIES: [&str; 6] =
    ["Delhi", "Mumbai", "Bengaluru", "Chennai", "Kolkata", "Hyderabad"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub openweather_api_key: String,
    pub openweather_base_url: String,
    pub openweather_current_path: String,
    pub openweather_forecast3h_path: String,
    pub openweather_find_path: String,
    pub openweather_air_pollution_path: String,
    pub units: String,
    pub default_city: String,
    pub snapshot_cities: Vec<String>,
    /// IANA zone used for day and time labels. Falls back to the city's own UTC offset.
    pub app_timezone: Option<String>,
    /// Per-request timeout; requests wait indefinitely when unset.
    pub http_timeout_secs: Option<u64>,
    pub bind_addr: String,
    pub use_mock_weather: bool,
}

impl Config {
    /// Configuration with every optional setting at its default.
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            openweather_api_key: api_key.into(),
            openweather_base_url: "https://api.openweathermap.org".to_string(),
            openweather_current_path: "/data/2.5/weather".to_string(),
            openweather_forecast3h_path: "/data/2.5/forecast".to_string(),
            openweather_find_path: "/data/2.5/find".to_string(),
            openweather_air_pollution_path: "/data/2.5/air_pollution".to_string(),
            units: "metric".to_string(),
            default_city: "London".to_string(),
            snapshot_cities: DEFAULT_SNAPSHOT_CITIES.iter().map(|c| c.to_string()).collect(),
            app_timezone: None,
            http_timeout_secs: None,
            bind_addr: "0.0.0.0:8080".to_string(),
            use_mock_weather: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openweather_base_url = base_url.into();
        self
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let use_mock_weather = env::var("USE_MOCK_WEATHER")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let api_key = match env::var("OPENWEATHER_API_KEY") {
            Ok(key) => key,
            Err(_) if use_mock_weather => String::new(),
            Err(_) => return Err(anyhow::anyhow!("OPENWEATHER_API_KEY not set")),
        };

        let defaults = Config::new(api_key);

        let http_timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => Some(parse_timeout_secs(&raw)?),
            Err(_) => None,
        };

        Ok(Config {
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or(defaults.openweather_base_url),
            openweather_current_path: env::var("OPENWEATHER_CURRENT_PATH")
                .unwrap_or(defaults.openweather_current_path),
            openweather_forecast3h_path: env::var("OPENWEATHER_FORECAST3H_PATH")
                .unwrap_or(defaults.openweather_forecast3h_path),
            openweather_find_path: env::var("OPENWEATHER_FIND_PATH")
                .unwrap_or(defaults.openweather_find_path),
            openweather_air_pollution_path: env::var("OPENWEATHER_AIR_POLLUTION_PATH")
                .unwrap_or(defaults.openweather_air_pollution_path),
            units: env::var("OPENWEATHER_UNITS").unwrap_or(defaults.units),
            default_city: env::var("DEFAULT_CITY").unwrap_or(defaults.default_city),
            snapshot_cities: env::var("SNAPSHOT_CITIES")
                .map(|raw| parse_city_list(&raw))
                .unwrap_or(defaults.snapshot_cities),
            app_timezone: env::var("APP_TIMEZONE").ok().filter(|tz| !tz.trim().is_empty()),
            http_timeout_secs,
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            use_mock_weather,
            openweather_api_key: defaults.openweather_api_key,
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// A zero timeout would fail every request before it is sent.
fn parse_timeout_secs(raw: &str) -> anyhow::Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be at least 1 second, got {raw:?}")),
        Ok(secs) => Ok(secs),
        Err(_) => Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}")),
    }
}

/// Split a comma separated list, dropping blanks.
pub fn parse_city_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("key");
        assert_eq!(config.openweather_api_key, "key");
        assert_eq!(config.default_city, "London");
        assert_eq!(config.units, "metric");
        assert_eq!(config.snapshot_cities.len(), 6);
        assert_eq!(config.snapshot_cities[0], "Delhi");
        assert!(config.http_timeout_secs.is_none());
        assert!(config.app_timezone.is_none());
    }

    #[test]
    fn test_with_base_url() {
        let config = Config::new("key").with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.openweather_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.openweather_current_path, "/data/2.5/weather");
    }

    #[test]
    fn test_parse_city_list() {
        assert_eq!(parse_city_list("Paris, Berlin ,,Rome"), vec!["Paris", "Berlin", "Rome"]);
        assert!(parse_city_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30").unwrap(), 30);
        assert_eq!(parse_timeout_secs(" 5 ").unwrap(), 5);
        assert!(parse_timeout_secs("0").is_err());
        assert!(parse_timeout_secs("-1").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
