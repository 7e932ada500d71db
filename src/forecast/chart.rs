use super::types::*;
use crate::utils::DisplayZone;

/// 12 steps of 3 hours: the chart never reaches past the first 36 hours.
pub const CHART_POINTS: usize = 12;

pub fn build_chart_series(samples: &[WeatherSample], zone: &DisplayZone) -> ChartSeries {
    let points = &samples[..samples.len().min(CHART_POINTS)];

    ChartSeries {
        labels: points.iter().map(|s| zone.time_label(s.ts)).collect(),
        temperature: points.iter().map(|s| s.temp_c).collect(),
        humidity: points.iter().map(|s| s.humidity).collect(),
        wind_speed: points.iter().map(|s| s.wind_ms).collect(),
    }
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
