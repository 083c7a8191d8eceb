//! LLM generation proxy
//!
//! Forwards a user message as the `prompt` of a non-streaming generation
//! request, using a fixed model identifier.

use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, ProxyResult};

/// Reply used when the model answers without a `response` field
pub const NO_RESPONSE_PLACEHOLDER: &str = "Sem resposta do modelo";

const SERVICE_NAME: &str = "Ollama API";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Relays chat messages to a generation endpoint
pub struct ChatProxy {
    http_client: reqwest::Client,
    generate_url: String,
    model: String,
}

impl ChatProxy {
    /// Create a proxy for the given generation endpoint and model
    pub fn new(generate_url: &str, model: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            generate_url: generate_url.to_string(),
            model: model.to_string(),
        }
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the generation endpoint
    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    /// Send `message` to the model and return its reply
    pub async fn generate(&self, message: &str) -> ProxyResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: message,
            stream: false,
        };

        let response = self
            .http_client
            .post(&self.generate_url)
            .json(&request)
            .send()
            .await?;

        tracing::debug!("Generation endpoint answered {}", response.status());

        if !response.status().is_success() {
            let err = ProxyError::from_response(SERVICE_NAME, response).await;
            tracing::error!("Generation request rejected: {}", err);
            return Err(err);
        }

        let body = response.text().await?;
        let data: GenerateResponse = serde_json::from_str(&body)?;

        Ok(data
            .response
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()))
    }

    /// Text of the `{ error }` body for a failed chat request
    pub fn error_message(err: &ProxyError) -> String {
        format!("Erro ao processar: {}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_forwards_message_as_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/llm/generate")
            .match_body(Matcher::Json(json!({
                "model": "ollama3.1",
                "prompt": "Qual a capital da França?",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Paris.", "done": true}"#)
            .create_async()
            .await;

        let proxy = ChatProxy::new(&format!("{}/llm/generate", server.url()), "ollama3.1");
        let reply = proxy.generate("Qual a capital da França?").await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Paris.");
    }

    #[tokio::test]
    async fn test_missing_response_uses_placeholder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"done": true}"#)
            .create_async()
            .await;

        let proxy = ChatProxy::new(&format!("{}/api/generate", server.url()), "llama3.1:8b");
        let reply = proxy.generate("hi").await.unwrap();

        assert_eq!(reply, NO_RESPONSE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_status_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(503)
            .with_body("model is loading")
            .create_async()
            .await;

        let proxy = ChatProxy::new(&format!("{}/api/generate", server.url()), "llama3.1:8b");
        let err = proxy.generate("hi").await.unwrap_err();

        assert_eq!(err.kind(), "upstream");
        let message = ChatProxy::error_message(&err);
        assert!(message.starts_with("Erro ao processar: "));
        assert!(message.contains("Service Unavailable"));
        assert!(message.contains("model is loading"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let proxy = ChatProxy::new(&format!("{}/api/generate", server.url()), "llama3.1:8b");
        let err = proxy.generate("hi").await.unwrap_err();

        assert_eq!(err.kind(), "parse");
    }
}
