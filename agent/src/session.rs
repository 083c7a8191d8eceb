//! Chat session
//!
//! Holds what a chat front end needs for one run: the message history, the
//! selected agent, the dispatcher and the model list fetched at startup.
//! Nothing here outlives the process.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, Agents};
use crate::dispatch::AgentDispatcher;
use crate::llm::{LlmService, ModelDescriptor, ServiceState};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One chat session
pub struct ChatSession {
    agents: Agents,
    selected: AgentKind,
    dispatcher: AgentDispatcher,
    messages: Arc<Mutex<Vec<Message>>>,
    llm: LlmService,
    models: Vec<ModelDescriptor>,
    selected_model: Option<String>,
    service_state: ServiceState,
}

impl ChatSession {
    /// Create a session routing to the LLM agent
    pub fn new(agents: Agents, llm: LlmService) -> Self {
        let messages: Arc<Mutex<Vec<Message>>> = Arc::new(Mutex::new(Vec::new()));
        let history = Arc::clone(&messages);

        let selected = AgentKind::default();
        let dispatcher = AgentDispatcher::new(agents.get(selected), move |reply| {
            history
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(Message::assistant(reply));
        });

        Self {
            agents,
            selected,
            dispatcher,
            messages,
            llm,
            models: Vec::new(),
            selected_model: None,
            service_state: ServiceState::Checking,
        }
    }

    /// Start with a specific agent
    pub fn with_agent(mut self, kind: AgentKind) -> Self {
        self.select_agent(kind);
        self
    }

    /// Check the LLM service and, when it is online, load the model list.
    ///
    /// The first model becomes the selected one.
    pub async fn initialize(&mut self) -> ServiceState {
        let status = self.llm.check_service().await;
        self.service_state = status.status;
        tracing::info!("LLM service {}: {}", self.llm.base_url(), status.message);

        if status.status == ServiceState::Online {
            let result = self.llm.list_models().await;
            match result.models {
                Some(models) if result.success => {
                    self.selected_model = models.first().map(|m| m.name.clone());
                    self.models = models;
                }
                _ => {
                    tracing::warn!(
                        "Could not load models: {}",
                        result.error.unwrap_or_default()
                    );
                }
            }
        }

        self.service_state
    }

    /// Submit user input.
    ///
    /// Blank input and input arriving while a reply is pending are ignored;
    /// returns whether the message was sent.
    pub async fn submit(&self, input: &str) -> bool {
        if input.trim().is_empty() || self.dispatcher.is_loading() {
            return false;
        }

        self.push(Message::user(input));
        self.dispatcher.send_message(input).await;
        true
    }

    /// Route later messages to another agent
    pub fn select_agent(&mut self, kind: AgentKind) {
        self.selected = kind;
        self.dispatcher.set_agent(self.agents.get(kind));
        tracing::debug!("Selected agent: {:?}", kind);
    }

    /// Get the selected agent kind
    pub fn selected_agent(&self) -> AgentKind {
        self.selected
    }

    /// Whether a reply is pending
    pub fn is_loading(&self) -> bool {
        self.dispatcher.is_loading()
    }

    /// Snapshot of the message history
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Most recent assistant message, if any
    pub fn last_reply(&self) -> Option<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.clone())
    }

    /// Forget the message history
    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Models fetched by `initialize`
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// Get the selected model name
    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    /// Select a model by name; returns false if it is not in the list
    pub fn select_model(&mut self, name: &str) -> bool {
        if self.models.iter().any(|m| m.name == name) {
            self.selected_model = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Get the LLM service state
    pub fn service_state(&self) -> ServiceState {
        self.service_state
    }

    fn push(&self, message: Message) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::weather::CITY_GUIDANCE;

    fn offline_session() -> ChatSession {
        // Nothing listens on port 1
        let agents = Agents::new("http://127.0.0.1:1").unwrap();
        let llm = LlmService::new("http://127.0.0.1:1").unwrap();
        ChatSession::new(agents, llm)
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let session = offline_session();
        assert!(!session.submit("   ").await);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_weather_guidance_round() {
        let session = offline_session().with_agent(AgentKind::Weather);
        assert_eq!(session.selected_agent(), AgentKind::Weather);

        assert!(session.submit("Olá").await);

        let messages = session.messages();
        assert_eq!(messages, vec![Message::user("Olá"), Message::assistant(CITY_GUIDANCE)]);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_unreachable_proxy_still_replies() {
        let session = offline_session();
        assert!(session.submit("Oi").await);

        assert_eq!(
            session.last_reply().as_deref(),
            Some(crate::agent::llm::LLM_APOLOGY)
        );
        session.clear();
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_offline() {
        let mut session = offline_session();
        assert_eq!(session.service_state(), ServiceState::Checking);

        assert_eq!(session.initialize().await, ServiceState::Offline);
        assert!(session.models().is_empty());
        assert!(session.selected_model().is_none());
    }

    #[tokio::test]
    async fn test_initialize_selects_first_model() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(
                r#"{"models": [
                    {"name": "llama3.1:8b", "size": 4661224676, "modified_at": "2024-07-23T10:15:02Z"},
                    {"name": "gemma2:2b", "size": 1629518495, "modified_at": "2024-08-01T09:00:00Z"}
                ]}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let agents = Agents::new(&server.url()).unwrap();
        let llm = LlmService::new(&server.url()).unwrap();
        let mut session = ChatSession::new(agents, llm);

        assert_eq!(session.initialize().await, ServiceState::Online);
        assert_eq!(session.models().len(), 2);
        assert_eq!(session.selected_model(), Some("llama3.1:8b"));

        assert!(session.select_model("gemma2:2b"));
        assert!(!session.select_model("mistral"));
        assert_eq!(session.selected_model(), Some("gemma2:2b"));
    }
}
