use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Validate latitude and longitude coordinates
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Invalid latitude: {}. Must be between -90 and 90", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Invalid longitude: {}. Must be between -180 and 180", lon));
    }
    Ok(())
}

/// Calculate distance between two coordinates using Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round to the nearest integer, ties toward positive infinity (-2.5 becomes -2).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to specified decimal places
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let multiplier = 10_f64.powi(decimals as i32);
    (value * multiplier).round() / multiplier
}

/// Parse timezone string and validate
pub fn parse_timezone(tz_str: &str) -> Result<chrono_tz::Tz, String> {
    tz_str.parse::<chrono_tz::Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Zone that day and time labels are rendered in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    Offset(FixedOffset),
    Named(chrono_tz::Tz),
}

impl DisplayZone {
    /// Offset in seconds east of UTC, as OpenWeather reports `timezone`.
    /// Out-of-range offsets fall back to UTC.
    pub fn from_offset_secs(secs: i32) -> Self {
        let offset = FixedOffset::east_opt(secs).unwrap_or_else(|| {
            tracing::warn!(secs, "UTC offset out of range, using UTC");
            Utc.fix()
        });
        DisplayZone::Offset(offset)
    }

    /// The configured zone when one is set, otherwise the location's own offset.
    pub fn resolve(configured: Option<chrono_tz::Tz>, offset_secs: i32) -> Self {
        configured
            .map(DisplayZone::Named)
            .unwrap_or_else(|| DisplayZone::from_offset_secs(offset_secs))
    }

    fn format(&self, ts: i64, fmt: &str) -> String {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default();
        match self {
            DisplayZone::Offset(offset) => utc.with_timezone(offset).format(fmt).to_string(),
            DisplayZone::Named(tz) => utc.with_timezone(tz).format(fmt).to_string(),
        }
    }

    /// Short weekday name, e.g. "Mon".
    pub fn weekday_label(&self, ts: i64) -> String {
        self.format(ts, "%a")
    }

    /// 24-hour clock time, e.g. "15:00".
    pub fn time_label(&self, ts: i64) -> String {
        self.format(ts, "%H:%M")
    }
}

/// Error response helper
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_haversine_distance() {
        // London to Paris is roughly 344 km
        let distance = haversine_distance(51.5085, -0.1257, 48.8534, 2.3488);
        assert!((distance - 344.0).abs() < 10.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to_decimals(9.876, 1), 9.9);
        assert_eq!(round_to_decimals(10.04, 1), 10.0);
    }

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("Asia/Kolkata").is_ok());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_display_zone_offset_labels() {
        // 2024-01-15T23:00:00Z is a Monday in UTC and Tuesday 04:30 in UTC+5:30
        let ts = 1_705_359_600;
        let utc = DisplayZone::from_offset_secs(0);
        let india = DisplayZone::from_offset_secs(19_800);

        assert_eq!(utc.weekday_label(ts), "Mon");
        assert_eq!(utc.time_label(ts), "23:00");
        assert_eq!(india.weekday_label(ts), "Tue");
        assert_eq!(india.time_label(ts), "04:30");
    }

    #[test]
    fn test_display_zone_resolve_prefers_configured() {
        let tz = parse_timezone("America/New_York").unwrap();
        assert_eq!(DisplayZone::resolve(Some(tz), 3600), DisplayZone::Named(tz));
        assert_eq!(
            DisplayZone::resolve(None, 3600),
            DisplayZone::Offset(FixedOffset::east_opt(3600).unwrap())
        );
    }

    #[test]
    fn test_display_zone_invalid_offset_falls_back_to_utc() {
        assert_eq!(
            DisplayZone::from_offset_secs(200_000),
            DisplayZone::Offset(FixedOffset::east_opt(0).unwrap())
        );
    }

    #[test]
    fn test_error_response_request_id() {
        let response = ErrorResponse::new("City not found", "not_found").with_request_id("abc".into());
        assert_eq!(response.error, "City not found");
        assert_eq!(response.request_id.as_deref(), Some("abc"));
    }
}
