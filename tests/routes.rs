use std::sync::Arc;

use serde_json::Value;
use weather_dashboard_server::{
    config::Config,
    dashboard::Dashboard,
    forecast::{mock::MockWeatherClient, WeatherApi},
    routes::{create_router, AppState},
};

const START: i64 = 1_705_276_800;

async fn spawn_app() -> String {
    let mut config = Config::new("");
    config.use_mock_weather = true;
    let config = Arc::new(config);

    let weather_client: Arc<dyn WeatherApi> = Arc::new(MockWeatherClient::with_start(START));
    let dashboard = Arc::new(Dashboard::new(weather_client.clone(), config.clone()).unwrap());
    let state = AppState {
        config,
        dashboard,
        weather_client,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    format!("http://{addr}")
}

async fn get(url: String) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["upstream"], "mock");
}

#[tokio::test]
async fn test_latest_is_empty_until_first_load() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/dashboard/latest")).await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_loaded");

    let (status, _) = get(format!("{base}/dashboard?city=Londo")).await;
    assert_eq!(status, 200);

    let (status, body) = get(format!("{base}/dashboard/latest")).await;
    assert_eq!(status, 200);
    assert_eq!(body["current"]["conditions"]["city"], "London");
}

#[tokio::test]
async fn test_dashboard_by_city() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/dashboard?city=Londo")).await;

    assert_eq!(status, 200);
    assert_eq!(body["generation"], 1);
    assert_eq!(body["current"]["conditions"]["city"], "London");
    assert_eq!(body["forecast"]["days"].as_array().unwrap().len(), 5);
    assert_eq!(body["forecast"]["chart"]["labels"].as_array().unwrap().len(), 12);
    assert_eq!(body["snapshots"].as_array().unwrap().len(), 6);
    assert!(body["air_quality"].is_u64());
}

#[tokio::test]
async fn test_dashboard_by_coordinates_and_default() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/dashboard?lat=19.0&lon=72.8")).await;
    assert_eq!(status, 200);
    assert_eq!(body["current"]["conditions"]["city"], "Mumbai");

    let (status, body) = get(format!("{base}/dashboard")).await;
    assert_eq!(status, 200);
    assert_eq!(body["current"]["conditions"]["city"], "London");
    assert_eq!(body["generation"], 2);
}

#[tokio::test]
async fn test_dashboard_unknown_city() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/dashboard?city=Atlantis")).await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "City not found");
    assert_eq!(body["code"], "not_found");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_search() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/search?q=beng")).await;
    assert_eq!(status, 200);
    assert_eq!(body["query"], "beng");
    assert_eq!(body["city"], "Bengaluru");

    let (_, body) = get(format!("{base}/search?q=Xyzzy")).await;
    assert_eq!(body["city"], "Xyzzy");
}

#[tokio::test]
async fn test_forecast() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/forecast?city=Delhi")).await;
    assert_eq!(status, 200);
    assert_eq!(body["city"], "Delhi");
    assert_eq!(body["days"].as_array().unwrap().len(), 5);
    assert_eq!(body["chart"]["temperature"].as_array().unwrap().len(), 12);

    let (status, body) = get(format!("{base}/forecast?city=Nowhere")).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "Forecast fetch failed");
}

#[tokio::test]
async fn test_air_quality() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/air-quality?lat=51.5&lon=-0.12")).await;
    assert_eq!(status, 200);
    let aqi = body["aqi"].as_u64().unwrap();
    assert!((1..=5).contains(&aqi));

    let (status, body) = get(format!("{base}/air-quality?lat=91&lon=0")).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "invalid_coordinates");
}

#[tokio::test]
async fn test_openapi_document() {
    let base = spawn_app().await;

    let (status, body) = get(format!("{base}/api-docs/openapi.json")).await;

    assert_eq!(status, 200);
    assert!(body["paths"]["/dashboard"].is_object());
}
