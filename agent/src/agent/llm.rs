//! LLM agent: general chat through the generation proxy

use async_trait::async_trait;

use super::{proxy_endpoint, Agent};
use crate::error::{AgentError, AgentResult};
use crate::proxy::{ChatRequest, ChatResponse};

/// Reply shown when the LLM could not be reached
pub const LLM_APOLOGY: &str = "Desculpe, não consegui processar sua solicitação no momento.";

/// Agent backed by `POST /api/chat`
pub struct LlmAgent {
    http_client: reqwest::Client,
    endpoint: url::Url,
}

impl LlmAgent {
    /// Create an agent talking to the proxy at `proxy_url`
    pub fn new(proxy_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http_client: reqwest::Client::new(),
            endpoint: proxy_endpoint(proxy_url, "/api/chat")?,
        })
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        "llm"
    }

    async fn handle(&self, input: &str) -> AgentResult<String> {
        let request = ChatRequest {
            message: input.to_string(),
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        // The error body is not inspected
        if !response.status().is_success() {
            return Err(AgentError::Status(format!(
                "Falha ao comunicar com o LLM local ({})",
                response.status()
            )));
        }

        let data: ChatResponse = response.json().await?;
        data.response.ok_or(AgentError::MissingField("response"))
    }

    fn apology(&self, _error: &AgentError) -> String {
        LLM_APOLOGY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_unwraps_proxy_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::Json(json!({"message": "Olá"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Olá! Como posso ajudar?"}"#)
            .create_async()
            .await;

        let agent = LlmAgent::new(&server.url()).unwrap();
        let reply = agent.process("Olá").await;

        mock.assert_async().await;
        assert_eq!(reply, "Olá! Como posso ajudar?");
    }

    #[tokio::test]
    async fn test_proxy_error_becomes_apology() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body(r#"{"error": "Erro ao processar: connection refused"}"#)
            .create_async()
            .await;

        let agent = LlmAgent::new(&server.url()).unwrap();
        assert_eq!(agent.process("Olá").await, LLM_APOLOGY);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_apology() {
        // Nothing listens on port 1
        let agent = LlmAgent::new("http://127.0.0.1:1").unwrap();

        let err = agent.handle("Olá").await.unwrap_err();
        assert!(matches!(err, AgentError::Transport(_)));
        assert_eq!(agent.process("Olá").await, LLM_APOLOGY);
    }

    #[tokio::test]
    async fn test_missing_response_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let agent = LlmAgent::new(&server.url()).unwrap();
        let err = agent.handle("Olá").await.unwrap_err();
        assert!(matches!(err, AgentError::MissingField("response")));
    }
}
