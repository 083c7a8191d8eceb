//! Agent module - conversational capabilities behind one contract
//!
//! An agent turns a line of user text into a line of reply text:
//! 1. `handle` does the work and may fail with an [`AgentError`]
//! 2. `process` wraps `handle`, logging failures and replacing them with the
//!    agent's apology, so callers always get text back

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AgentError, AgentResult};

pub mod llm;
pub mod weather;

pub use llm::LlmAgent;
pub use weather::{extract_city, WeatherAgent};

/// A conversational capability: text in, text out
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Produce a reply, or the reason none could be produced
    async fn handle(&self, input: &str) -> AgentResult<String>;

    /// User-facing text shown in place of a reply when `handle` fails
    fn apology(&self, error: &AgentError) -> String;

    /// Produce a reply. Never fails: errors become the agent's apology.
    async fn process(&self, input: &str) -> String {
        match self.handle(input).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(agent = self.name(), "Agent failed: {}", e);
                self.apology(&e)
            }
        }
    }
}

/// Which agent a message is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AgentKind {
    /// General chat with the local LLM
    #[default]
    Llm,
    /// Current weather for a city
    Weather,
}

impl AgentKind {
    /// Title shown for this agent
    pub fn title(&self) -> &'static str {
        match self {
            AgentKind::Llm => "Assistente IA",
            AgentKind::Weather => "Clima Assistant",
        }
    }

    /// Prompt prefix for the interactive session
    pub fn prompt_prefix(&self) -> &'static str {
        match self {
            AgentKind::Llm => "ia",
            AgentKind::Weather => "clima",
        }
    }
}

/// Both agents, built once and shared by reference
#[derive(Clone)]
pub struct Agents {
    pub llm: Arc<dyn Agent>,
    pub weather: Arc<dyn Agent>,
}

impl Agents {
    /// Build both agents against the proxy at `proxy_url`
    pub fn new(proxy_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            llm: Arc::new(LlmAgent::new(proxy_url)?),
            weather: Arc::new(WeatherAgent::new(proxy_url)?),
        })
    }

    /// Get the agent for a kind
    pub fn get(&self, kind: AgentKind) -> Arc<dyn Agent> {
        match kind {
            AgentKind::Llm => Arc::clone(&self.llm),
            AgentKind::Weather => Arc::clone(&self.weather),
        }
    }
}

/// Join a proxy base URL and an endpoint path
pub(crate) fn proxy_endpoint(base: &str, path: &str) -> Result<url::Url, url::ParseError> {
    url::Url::parse(&format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAgent;

    #[async_trait]
    impl Agent for FailingAgent {
        fn name(&self) -> &str {
            "failing"
        }

        async fn handle(&self, _input: &str) -> AgentResult<String> {
            Err(AgentError::Status("boom".to_string()))
        }

        fn apology(&self, error: &AgentError) -> String {
            format!("sorry: {}", error)
        }
    }

    #[tokio::test]
    async fn test_process_turns_errors_into_apology() {
        let agent = FailingAgent;
        assert_eq!(agent.process("anything").await, "sorry: boom");
    }

    #[test]
    fn test_proxy_endpoint_joins_paths() {
        let url = proxy_endpoint("http://localhost:3000/", "/api/chat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/chat");

        let url = proxy_endpoint("http://example.com/app", "api/weather").unwrap();
        assert_eq!(url.as_str(), "http://example.com/app/api/weather");

        assert!(proxy_endpoint("not a url", "api/chat").is_err());
    }

    #[test]
    fn test_agents_by_kind() {
        let agents = Agents::new("http://localhost:3000").unwrap();
        assert_eq!(agents.get(AgentKind::Llm).name(), "llm");
        assert_eq!(agents.get(AgentKind::Weather).name(), "weather");
        assert_eq!(AgentKind::default(), AgentKind::Llm);
    }
}
