//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::state::AppState;
use crate::error::ProxyError;
use crate::llm::ModelDescriptor;
use crate::proxy::{
    ChatProxy, ChatRequest, ChatResponse, ErrorResponse, WeatherProxy, WeatherRequest,
    WeatherResult,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: &ProxyError, message: String) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(message)))
}

/// Relay a chat message to the model
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let result = match payload {
        Ok(Json(req)) => state.chat.generate(&req.message).await,
        Err(rejection) => Err(ProxyError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(response) => Ok(Json(ChatResponse {
            response: Some(response),
        })),
        Err(e) => {
            tracing::error!(kind = e.kind(), "Failed to process chat message: {}", e);
            Err(api_error(&e, ChatProxy::error_message(&e)))
        }
    }
}

/// Look up current weather for a place name
pub async fn weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<WeatherResult>, ApiError> {
    let result = match payload {
        Ok(Json(req)) => state.weather.lookup(req.location.as_deref()).await,
        Err(rejection) => Err(ProxyError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(weather) => Ok(Json(weather)),
        Err(e) => {
            tracing::error!(kind = e.kind(), "Failed to fetch weather data: {}", e);
            Err(api_error(&e, WeatherProxy::error_message(&e)))
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub generate_url: String,
    pub llm_url: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.chat.model().to_string(),
        generate_url: state.chat.generate_url().to_string(),
        llm_url: state.llm.base_url().to_string(),
    })
}

/// Models list response
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelDescriptor>,
    pub current: String,
}

/// List available Ollama models
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    match state.llm.fetch_models().await {
        Ok(models) => Ok(Json(ModelsResponse {
            models,
            current: state.chat.model().to_string(),
        })),
        Err(e) => {
            tracing::error!("Failed to list models: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}
