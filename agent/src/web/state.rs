//! Shared application state

use anyhow::Result;
use std::sync::Arc;

use super::WebConfig;
use crate::llm::LlmService;
use crate::proxy::{ChatProxy, WeatherProxy};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Relay for `/api/chat`
    pub chat: Arc<ChatProxy>,
    /// Relay for `/api/weather`
    pub weather: Arc<WeatherProxy>,
    /// Direct Ollama client for model listing
    pub llm: LlmService,
}

impl AppState {
    /// Create new app state
    pub fn new(config: &WebConfig) -> Result<Self> {
        Ok(Self {
            chat: Arc::new(ChatProxy::new(&config.generate_url, &config.model)),
            weather: Arc::new(WeatherProxy::new(
                &config.geocoding_url,
                &config.forecast_url,
            )),
            llm: LlmService::new(&config.llm_url)?,
        })
    }
}
