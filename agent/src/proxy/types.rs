//! Request and response bodies shared by the proxies and the agents

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Successful answer of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: Option<String>,
}

/// Body of `POST /api/weather`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub location: Option<String>,
}

/// Current conditions for a geocoded place.
///
/// Readings are passed through from the forecast service: Celsius, km/h
/// and percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResult {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub conditions: String,
    /// Display name returned by geocoding, not the raw query
    pub location: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: Some(msg.into()),
        }
    }
}
