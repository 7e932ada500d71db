use crate::config::Config;
use crate::forecast::{
    aggregate::summarize_days,
    chart::build_chart_series,
    openweather::OpenWeatherError,
    types::{ChartSeries, CurrentConditions, DailySummary},
    WeatherApi,
};
use crate::presentation::{Backdrop, BackdropView, Theme, WeatherDetails};
use crate::utils::{parse_timezone, round_half_up, DisplayZone};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Weather(#[from] OpenWeatherError),
    #[error("Superseded by a newer search")]
    Superseded,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentPanel {
    pub conditions: CurrentConditions,
    pub temp_display_c: i64,
    pub details: WeatherDetails,
    pub backdrop: BackdropView,
    pub theme: Theme,
    pub observed_at: String,
}

impl CurrentPanel {
    fn new(conditions: CurrentConditions, zone: &DisplayZone, now: i64) -> Self {
        Self {
            temp_display_c: round_half_up(conditions.sample.temp_c),
            details: WeatherDetails::from_current(&conditions, zone),
            backdrop: Backdrop::for_condition(&conditions.sample.condition).into(),
            theme: Theme::at(now, conditions.sunrise, conditions.sunset),
            observed_at: format!("{} {}", zone.weekday_label(now), zone.time_label(now)),
            conditions,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastPanel {
    pub city: String,
    pub days: Vec<DailySummary>,
    pub chart: ChartSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CitySnapshot {
    pub city: String,
    pub temp_c: i64,
    pub icon: String,
}

/// What the dashboard currently shows. Each panel is replaced on its own
/// as a load reaches it; a failed load leaves later panels as they were.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DashboardView {
    pub generation: u64,
    pub load_id: Option<Uuid>,
    pub current: Option<CurrentPanel>,
    pub air_quality: Option<u8>,
    pub forecast: Option<ForecastPanel>,
    pub snapshots: Option<Vec<CitySnapshot>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub struct Dashboard {
    api: Arc<dyn WeatherApi>,
    config: Arc<Config>,
    display_tz: Option<chrono_tz::Tz>,
    generation: AtomicU64,
    view: RwLock<DashboardView>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn WeatherApi>, config: Arc<Config>) -> anyhow::Result<Self> {
        let display_tz = config
            .app_timezone
            .as_deref()
            .map(parse_timezone)
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Self {
            api,
            config,
            display_tz,
            generation: AtomicU64::new(0),
            view: RwLock::new(DashboardView::default()),
        })
    }

    /// Newest generation handed out so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn latest(&self) -> DashboardView {
        self.view.read().await.clone()
    }

    pub fn zone_for(&self, utc_offset_secs: i32) -> DisplayZone {
        DisplayZone::resolve(self.display_tz, utc_offset_secs)
    }

    fn ensure_current(&self, generation: u64) -> Result<(), DashboardError> {
        if self.generation() == generation {
            Ok(())
        } else {
            tracing::debug!(generation, newest = self.generation(), "Dropping superseded load");
            Err(DashboardError::Superseded)
        }
    }

    /// Take the next generation and a fresh load id, recorded on the current span.
    fn begin(&self) -> (u64, Uuid) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let load_id = Uuid::new_v4();
        let span = tracing::Span::current();
        span.record("generation", generation);
        span.record("load_id", tracing::field::display(load_id));
        (generation, load_id)
    }

    /// Apply `update` and return a copy of the resulting view, both under the write lock.
    async fn publish<F>(&self, generation: u64, load_id: Uuid, update: F) -> Result<DashboardView, DashboardError>
    where
        F: FnOnce(&mut DashboardView),
    {
        let mut view = self.view.write().await;
        // checked under the write lock so a stale load cannot interleave with a newer publish
        self.ensure_current(generation)?;
        view.generation = generation;
        view.load_id = Some(load_id);
        update(&mut view);
        view.updated_at = Some(Utc::now());
        Ok(view.clone())
    }

    /// Resolve the city, then fill the dashboard panel by panel. The first
    /// failing step ends the load; panels already published stay.
    #[tracing::instrument(skip(self), fields(generation = tracing::field::Empty, load_id = tracing::field::Empty))]
    pub async fn load(&self, query: &str) -> Result<DashboardView, DashboardError> {
        let (generation, load_id) = self.begin();
        self.load_with(generation, load_id, query).await
    }

    /// Geolocation entry point: name the place at the coordinates, or fall
    /// back to the default city when that lookup fails. The generation is
    /// taken before the lookup, so a search started meanwhile wins.
    #[tracing::instrument(skip(self), fields(generation = tracing::field::Empty, load_id = tracing::field::Empty))]
    pub async fn load_at(&self, lat: f64, lon: f64) -> Result<DashboardView, DashboardError> {
        let (generation, load_id) = self.begin();

        let city = match self.api.current_weather_at(lat, lon).await {
            Ok(current) => current.city,
            Err(e) => {
                tracing::warn!(lat, lon, error = %e, "Location lookup failed, using default city");
                self.config.default_city.clone()
            }
        };
        self.ensure_current(generation)?;

        self.load_with(generation, load_id, &city).await
    }

    async fn load_with(&self, generation: u64, load_id: Uuid, query: &str) -> Result<DashboardView, DashboardError> {
        let city = self.api.resolve_city(query).await?;
        self.ensure_current(generation)?;
        tracing::info!(query, city = %city, "Loading dashboard");

        let current = self.api.current_weather(&city).await?;
        let (lat, lon) = (current.lat, current.lon);
        let zone = self.zone_for(current.utc_offset_secs);
        let panel = CurrentPanel::new(current, &zone, Utc::now().timestamp());
        self.publish(generation, load_id, |view| view.current = Some(panel)).await?;

        let aqi = self.api.air_quality(lat, lon).await?;
        self.publish(generation, load_id, |view| view.air_quality = Some(aqi)).await?;

        let series = self.api.forecast(&city).await?;
        let zone = self.zone_for(series.utc_offset_secs);
        let forecast = ForecastPanel {
            city: series.city.clone(),
            days: summarize_days(&series.samples, &zone),
            chart: build_chart_series(&series.samples, &zone),
        };
        tracing::debug!(samples = series.samples.len(), days = forecast.days.len(), "Forecast aggregated");
        self.publish(generation, load_id, |view| view.forecast = Some(forecast)).await?;

        let snapshots = self.collect_snapshots(generation).await?;
        self.publish(generation, load_id, |view| view.snapshots = Some(snapshots)).await
    }

    pub async fn load_default(&self) -> Result<DashboardView, DashboardError> {
        let city = self.config.default_city.clone();
        self.load(&city).await
    }

    /// Snapshot cards are fetched one city at a time. The row stops at the
    /// first city that fails; that failure is logged, not returned.
    async fn collect_snapshots(&self, generation: u64) -> Result<Vec<CitySnapshot>, DashboardError> {
        let mut snapshots = Vec::with_capacity(self.config.snapshot_cities.len());

        for city in &self.config.snapshot_cities {
            self.ensure_current(generation)?;
            match self.api.current_weather(city).await {
                Ok(current) => snapshots.push(CitySnapshot {
                    city: city.clone(),
                    temp_c: round_half_up(current.sample.temp_c),
                    icon: current.sample.icon,
                }),
                Err(e) => {
                    tracing::warn!(city = %city, error = %e, "Snapshot fetch failed, skipping remaining cities");
                    break;
                }
            }
        }

        Ok(snapshots)
    }
}
