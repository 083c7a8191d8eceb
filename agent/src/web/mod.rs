//! Web server module for the proxy API
//!
//! Exposes the chat and weather proxies over HTTP, plus health and model
//! listing endpoints.

pub mod api;
pub mod state;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ClimaConfig;
use state::AppState;

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub port: u16,
    pub generate_url: String,
    pub model: String,
    pub geocoding_url: String,
    pub forecast_url: String,
    pub llm_url: String,
}

impl WebConfig {
    /// Build from file configuration
    pub fn from_file_config(config: &ClimaConfig) -> Self {
        Self {
            port: config.proxy.port,
            generate_url: config.proxy.generate_url.clone(),
            model: config.proxy.model.clone(),
            geocoding_url: config.weather.geocoding_url.clone(),
            forecast_url: config.weather.forecast_url.clone(),
            llm_url: config.llm.url.clone(),
        }
    }
}

/// Start the web server
pub async fn serve(config: WebConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting proxy server on http://localhost:{}", config.port);
    tracing::info!("Chat proxy -> {} (model {})", config.generate_url, config.model);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(api::chat))
        .route("/weather", post(api::weather))
        .route("/models", get(api::list_models))
        .route("/health", get(api::health_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
