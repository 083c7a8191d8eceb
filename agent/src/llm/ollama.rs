//! Direct Ollama client
//!
//! Talks to Ollama without going through the proxy: model listing,
//! one-shot generation and a reachability check. Every call carries a
//! fixed request timeout.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::LlmError;

/// Request timeout applied to every direct Ollama call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_NUM_PREDICT: u64 = 1000;

/// Information about an available model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    /// Size on disk, in bytes
    pub size: u64,
    pub modified: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Option<Vec<OllamaModel>>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
    size: u64,
    modified_at: DateTime<FixedOffset>,
}

impl From<OllamaModel> for ModelDescriptor {
    fn from(model: OllamaModel) -> Self {
        Self {
            name: model.name,
            size: model.size,
            modified: model.modified_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: Option<String>,
}

/// Outcome of [`LlmService::list_models`]
#[derive(Debug, Clone, Serialize)]
pub struct ListModelsResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<ModelDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of [`LlmService::query_model`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// Reachability of the Ollama service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Online,
    Offline,
    Checking,
}

impl ServiceState {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::Online => "Online",
            ServiceState::Offline => "Offline",
            ServiceState::Checking => "Verificando...",
        }
    }
}

/// Outcome of [`LlmService::check_service`]
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: ServiceState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Direct client for an Ollama-compatible service
#[derive(Clone)]
pub struct LlmService {
    base_url: String,
    http_client: reqwest::Client,
}

impl LlmService {
    /// Create a client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the installed models from `/api/tags`
    pub async fn fetch_models(&self) -> Result<Vec<ModelDescriptor>, LlmError> {
        let response = self
            .http_client
            .get(self.endpoint("/api/tags"))
            .send()
            .await?
            .error_for_status()?;

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|_| LlmError::UnexpectedFormat)?;

        let models = tags.models.ok_or(LlmError::UnexpectedFormat)?;
        Ok(models.into_iter().map(ModelDescriptor::from).collect())
    }

    /// List available models, folding failures into the result
    pub async fn list_models(&self) -> ListModelsResult {
        match self.fetch_models().await {
            Ok(models) => {
                tracing::debug!("Ollama reported {} models", models.len());
                ListModelsResult {
                    success: true,
                    models: Some(models),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to list models: {}", e);
                ListModelsResult {
                    success: false,
                    models: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Run a single non-streaming generation.
    ///
    /// `overrides` are merged on top of the default options
    /// (`temperature = 0.7`, `num_predict = 1000`).
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        overrides: Map<String, Value>,
    ) -> Result<String, LlmError> {
        let mut options = Map::new();
        options.insert("temperature".to_string(), json!(DEFAULT_TEMPERATURE));
        options.insert("num_predict".to_string(), json!(DEFAULT_NUM_PREDICT));
        options.extend(overrides);

        let body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": options,
        });

        let response = self
            .http_client
            .post(self.endpoint("/api/generate"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            return Err(LlmError::Api(message));
        }

        let data: OllamaGenerateResponse = response.json().await?;
        Ok(data.response.unwrap_or_default())
    }

    /// Query a model, folding failures and timing into the result
    pub async fn query_model(
        &self,
        model: &str,
        prompt: &str,
        overrides: Map<String, Value>,
    ) -> QueryResponse {
        let started = Instant::now();

        match self.generate(model, prompt, overrides).await {
            Ok(response) => QueryResponse {
                success: true,
                response: Some(response),
                error: None,
                model: Some(model.to_string()),
                processing_time_ms: Some(started.elapsed().as_millis() as u64),
            },
            Err(e) => {
                tracing::warn!("Generation with {} failed: {}", model, e);
                QueryResponse {
                    success: false,
                    response: None,
                    error: Some(e.to_string()),
                    model: Some(model.to_string()),
                    processing_time_ms: None,
                }
            }
        }
    }

    /// Check whether Ollama answers on `/api/tags`
    pub async fn check_service(&self) -> ServiceStatus {
        let result = self
            .http_client
            .get(self.endpoint("/api/tags"))
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match result {
            Ok(_) => ServiceStatus {
                status: ServiceState::Online,
                message: "Serviço Ollama está disponível".to_string(),
                error: None,
            },
            Err(e) => ServiceStatus {
                status: ServiceState::Offline,
                message: format!("Serviço Ollama está indisponível: {}", e),
                error: Some(e.to_string()),
            },
        }
    }
}
