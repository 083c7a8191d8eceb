//! Weather agent: finds a city in the message and reports its current weather

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::{proxy_endpoint, Agent};
use crate::error::{AgentError, AgentResult};
use crate::proxy::{ErrorResponse, WeatherRequest, WeatherResult};

/// Reply when no city could be found in the message
pub const CITY_GUIDANCE: &str = "Por favor, pergunte sobre o clima em uma cidade específica. Por exemplo: 'Como está o clima em São Paulo?'";

const FALLBACK_FAILURE: &str = "Falha ao obter dados do clima";

static CITY_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Trigger word, preposition, then a run of letters and spaces
fn city_pattern() -> &'static Regex {
    CITY_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(?:tempo|clima|temperatura|previsão)\s+(?:em|para|na|no)\s+([a-zA-ZÀ-ÿ\s]+)(?:\?|\.|\s|$)",
        )
        .expect("city pattern is a valid regex")
    })
}

/// Extract the city named in a weather question.
///
/// Only the first match counts. The capture is greedy, so trailing words
/// after the city stay in the result.
pub fn extract_city(input: &str) -> Option<&str> {
    city_pattern()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|city| !city.is_empty())
}

/// Render a lookup result as the chat reply
pub fn format_report(weather: &WeatherResult) -> String {
    format!(
        "Clima atual em {}:\n\
         🌡️ Temperatura: {}°C\n\
         🌡️ Sensação térmica: {}°C\n\
         💧 Umidade: {}%\n\
         💨 Velocidade do vento: {} km/h\n\
         🌬️ Rajadas de vento: {} km/h\n\
         🌤️ Condições: {}",
        weather.location,
        weather.temperature,
        weather.feels_like,
        weather.humidity,
        weather.wind_speed,
        weather.wind_gust,
        weather.conditions
    )
}

/// Agent backed by `POST /api/weather`
pub struct WeatherAgent {
    http_client: reqwest::Client,
    endpoint: url::Url,
}

impl WeatherAgent {
    /// Create an agent talking to the proxy at `proxy_url`
    pub fn new(proxy_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http_client: reqwest::Client::new(),
            endpoint: proxy_endpoint(proxy_url, "/api/weather")?,
        })
    }
}

#[async_trait]
impl Agent for WeatherAgent {
    fn name(&self) -> &str {
        "weather"
    }

    async fn handle(&self, input: &str) -> AgentResult<String> {
        let Some(city) = extract_city(input) else {
            tracing::debug!("No city found in weather question");
            return Ok(CITY_GUIDANCE.to_string());
        };

        let request = WeatherRequest {
            location: Some(city.to_string()),
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let body: ErrorResponse = response.json().await?;
            return Err(AgentError::Proxy(
                body.error.unwrap_or_else(|| FALLBACK_FAILURE.to_string()),
            ));
        }

        let weather: WeatherResult = response.json().await?;
        Ok(format_report(&weather))
    }

    fn apology(&self, error: &AgentError) -> String {
        let detail = error.to_string();
        let detail = if detail.is_empty() {
            "Desconhecido".to_string()
        } else {
            detail
        };
        format!(
            "Desculpe, não foi possível obter informações sobre o clima no momento. Erro: {}",
            detail
        )
    }
}
