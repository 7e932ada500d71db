use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_dashboard_server::{
    config::Config,
    dashboard::Dashboard,
    forecast::{mock::MockWeatherClient, openweather::OpenWeatherClient, WeatherApi},
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_dashboard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    // Initialize weather client
    let weather_client: Arc<dyn WeatherApi> = if config.use_mock_weather {
        tracing::warn!("USE_MOCK_WEATHER is set, serving offline data");
        Arc::new(MockWeatherClient::new())
    } else {
        Arc::new(OpenWeatherClient::new(config.as_ref().clone())?)
    };

    let dashboard = Arc::new(Dashboard::new(weather_client.clone(), config.clone())?);

    // Show the default city until someone searches
    let initial = dashboard.clone();
    tokio::spawn(async move {
        if let Err(e) = initial.load_default().await {
            tracing::warn!(error = %e, "Initial dashboard load failed");
        }
    });

    // Create application state
    let state = AppState {
        config: config.clone(),
        dashboard,
        weather_client,
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server starting on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
