use super::types::*;
use crate::utils::{round_half_up, DisplayZone};

pub const MAX_FORECAST_DAYS: usize = 5;

/// Samples sharing a day label.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub label: String,
    pub samples: Vec<WeatherSample>,
}

impl DailyBucket {
    pub fn average_temp(&self) -> f64 {
        let count = self.samples.len() as f64;
        let temp_sum: f64 = self.samples.iter().map(|s| s.temp_c).sum();
        temp_sum / count
    }

    pub fn summarize(&self) -> Option<DailySummary> {
        let first = self.samples.first()?;
        Some(DailySummary {
            day: self.label.clone(),
            avg_temp_c: round_half_up(self.average_temp()),
            icon: first.icon.clone(),
        })
    }
}

/// Buckets appear in the order their label is first met in `samples`.
/// A series that wraps past the end of the week is therefore not re-sorted,
/// and two dates with the same weekday name share a bucket.
pub fn group_by_day(samples: &[WeatherSample], zone: &DisplayZone) -> Vec<DailyBucket> {
    let mut buckets: Vec<DailyBucket> = Vec::new();

    for sample in samples {
        let label = zone.weekday_label(sample.ts);
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.samples.push(sample.clone()),
            None => buckets.push(DailyBucket {
                label,
                samples: vec![sample.clone()],
            }),
        }
    }

    buckets
}

pub fn summarize_days(samples: &[WeatherSample], zone: &DisplayZone) -> Vec<DailySummary> {
    group_by_day(samples, zone)
        .iter()
        .take(MAX_FORECAST_DAYS)
        .filter_map(DailyBucket::summarize)
        .collect()
}
