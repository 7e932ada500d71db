use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    config::Config,
    dashboard::{CitySnapshot, CurrentPanel, Dashboard, DashboardError, DashboardView, ForecastPanel},
    forecast::{
        aggregate::summarize_days,
        chart::build_chart_series,
        openweather::OpenWeatherError,
        types::{ChartSeries, CurrentConditions, DailySummary, WeatherSample},
        WeatherApi,
    },
    presentation::{Backdrop, BackdropView, Theme, WeatherDetails},
    utils::ErrorResponse,
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dashboard: Arc<Dashboard>,
    pub weather_client: Arc<dyn WeatherApi>,
}

// Request/Response types
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// City name; fuzzy matched before lookup. Takes precedence over coordinates.
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastQuery {
    pub city: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AirQualityQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    /// "openweather", or "mock" when running on offline data
    pub upstream: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub city: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub city: String,
    pub days: Vec<DailySummary>,
    pub chart: ChartSeries,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AirQualityResponse {
    pub aqi: u8,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DashboardError::Superseded => (StatusCode::CONFLICT, "superseded"),
            DashboardError::Weather(OpenWeatherError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            DashboardError::Weather(OpenWeatherError::InvalidCoordinates) => {
                (StatusCode::BAD_REQUEST, "invalid_coordinates")
            }
            DashboardError::Weather(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse::new(&self.to_string(), code).with_request_id(Uuid::new_v4().to_string());
        (status, Json(body)).into_response()
    }
}

// Route handlers
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service is up", body = HealthResponse)))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let upstream = if state.config.use_mock_weather { "mock" } else { "openweather" };
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstream: upstream.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard after this load", body = DashboardView),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 409, description = "A newer load replaced this one", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, DashboardError> {
    let view = match (params.city, params.lat, params.lon) {
        (Some(city), _, _) => state.dashboard.load(city.trim()).await?,
        (None, Some(lat), Some(lon)) => state.dashboard.load_at(lat, lon).await?,
        _ => state.dashboard.load_default().await?,
    };
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/dashboard/latest",
    responses(
        (status = 200, description = "What the dashboard shows now", body = DashboardView),
        (status = 404, description = "Nothing loaded yet", body = ErrorResponse),
    )
)]
pub async fn get_latest_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, (StatusCode, Json<ErrorResponse>)> {
    let view = state.dashboard.latest().await;
    if view.updated_at.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("No dashboard loaded yet", "not_loaded")),
        ));
    }
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Best match, or the query itself", body = SearchResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
    )
)]
pub async fn search_city(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, DashboardError> {
    let city = state.weather_client.resolve_city(&params.q).await?;
    Ok(Json(SearchResponse { query: params.q, city }))
}

#[utoipa::path(
    get,
    path = "/forecast",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Daily cards and chart series", body = ForecastResponse),
        (status = 502, description = "Forecast fetch failed", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, DashboardError> {
    let series = state.weather_client.forecast(&params.city).await?;
    let zone = state.dashboard.zone_for(series.utc_offset_secs);

    Ok(Json(ForecastResponse {
        days: summarize_days(&series.samples, &zone),
        chart: build_chart_series(&series.samples, &zone),
        city: series.city,
        generated_at: chrono::Utc::now(),
    }))
}

#[utoipa::path(
    get,
    path = "/air-quality",
    params(AirQualityQuery),
    responses(
        (status = 200, description = "Most recent AQI", body = AirQualityResponse),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
    )
)]
pub async fn get_air_quality(
    State(state): State<AppState>,
    Query(params): Query<AirQualityQuery>,
) -> Result<Json<AirQualityResponse>, DashboardError> {
    let aqi = state.weather_client.air_quality(params.lat, params.lon).await?;
    Ok(Json(AirQualityResponse {
        aqi,
        generated_at: chrono::Utc::now(),
    }))
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_dashboard, get_latest_dashboard, search_city, get_forecast, get_air_quality),
    components(schemas(
        HealthResponse,
        SearchResponse,
        ForecastResponse,
        AirQualityResponse,
        DashboardView,
        CurrentPanel,
        ForecastPanel,
        CitySnapshot,
        CurrentConditions,
        WeatherSample,
        DailySummary,
        ChartSeries,
        WeatherDetails,
        BackdropView,
        Backdrop,
        Theme,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/latest", get(get_latest_dashboard))
        .route("/search", get(search_city))
        .route("/forecast", get(get_forecast))
        .route("/air-quality", get(get_air_quality))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}
