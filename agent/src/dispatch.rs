//! Agent dispatch
//!
//! Mediates between user input and the currently selected agent: tracks a
//! busy flag around each call and hands the reply to a callback.
//!
//! Overlapping `send_message` calls are neither queued nor rejected. Both run
//! to completion and both invoke the callback; the busy flag reflects whichever
//! call finished last.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use futures_util::FutureExt;

use crate::agent::Agent;

/// Reply delivered when an agent panics instead of answering
pub const DISPATCH_FAILURE: &str = "Desculpe, ocorreu um erro ao processar sua mensagem.";

/// Receives every reply produced by the dispatcher
pub type MessageCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Sets the busy flag on creation and clears it on drop
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Routes messages to the selected agent
pub struct AgentDispatcher {
    agent: RwLock<Arc<dyn Agent>>,
    on_message: MessageCallback,
    loading: AtomicBool,
}

impl AgentDispatcher {
    /// Create a dispatcher for `agent`, delivering replies to `on_message`
    pub fn new<F>(agent: Arc<dyn Agent>, on_message: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            agent: RwLock::new(agent),
            on_message: Arc::new(on_message),
            loading: AtomicBool::new(false),
        }
    }

    /// Whether a message is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Get the selected agent
    pub fn agent(&self) -> Arc<dyn Agent> {
        let agent = self.agent.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*agent)
    }

    /// Switch the agent used by later messages
    pub fn set_agent(&self, agent: Arc<dyn Agent>) {
        let mut current = self.agent.write().unwrap_or_else(|e| e.into_inner());
        *current = agent;
    }

    /// Run `message` through the selected agent and deliver the reply.
    ///
    /// The callback runs exactly once per call. The busy flag is cleared on
    /// every exit path, including a panicking agent.
    pub async fn send_message(&self, message: &str) {
        let _loading = LoadingGuard::start(&self.loading);
        let agent = self.agent();

        tracing::debug!(agent = agent.name(), "Dispatching message");

        let reply = match AssertUnwindSafe(agent.process(message)).catch_unwind().await {
            Ok(reply) => reply,
            Err(_) => {
                tracing::error!(agent = agent.name(), "Agent panicked while processing message");
                DISPATCH_FAILURE.to_string()
            }
        };

        (self.on_message)(reply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    use crate::error::{AgentError, AgentResult};

    struct EchoAgent;

    #[async_trait]
    impl Agent for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }

        async fn handle(&self, input: &str) -> AgentResult<String> {
            Ok(format!("echo: {}", input))
        }

        fn apology(&self, _error: &AgentError) -> String {
            "echo failed".to_string()
        }
    }

    struct FailingAgent;

    #[async_trait]
    impl Agent for FailingAgent {
        fn name(&self) -> &str {
            "failing"
        }

        async fn handle(&self, _input: &str) -> AgentResult<String> {
            Err(AgentError::Status("503".to_string()))
        }

        fn apology(&self, _error: &AgentError) -> String {
            "sorry".to_string()
        }
    }

    struct PanickingAgent;

    #[async_trait]
    impl Agent for PanickingAgent {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn handle(&self, _input: &str) -> AgentResult<String> {
            panic!("agent bug");
        }

        fn apology(&self, _error: &AgentError) -> String {
            unreachable!()
        }
    }

    /// Blocks inside `handle` until released
    struct GatedAgent {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl Agent for GatedAgent {
        fn name(&self) -> &str {
            "gated"
        }

        async fn handle(&self, input: &str) -> AgentResult<String> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(input.to_uppercase())
        }

        fn apology(&self, _error: &AgentError) -> String {
            String::new()
        }
    }

    fn recording_dispatcher(agent: Arc<dyn Agent>) -> (AgentDispatcher, Arc<Mutex<Vec<String>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let dispatcher = AgentDispatcher::new(agent, move |reply| {
            sink.lock().unwrap().push(reply);
        });
        (dispatcher, received)
    }

    #[tokio::test]
    async fn test_delivers_reply_once() {
        let (dispatcher, received) = recording_dispatcher(Arc::new(EchoAgent));
        assert!(!dispatcher.is_loading());

        dispatcher.send_message("oi").await;

        assert!(!dispatcher.is_loading());
        assert_eq!(*received.lock().unwrap(), vec!["echo: oi".to_string()]);
    }

    #[tokio::test]
    async fn test_agent_failure_delivers_apology() {
        let (dispatcher, received) = recording_dispatcher(Arc::new(FailingAgent));

        dispatcher.send_message("oi").await;

        assert!(!dispatcher.is_loading());
        assert_eq!(*received.lock().unwrap(), vec!["sorry".to_string()]);
    }

    #[tokio::test]
    async fn test_panicking_agent_reports_generic_error() {
        let (dispatcher, received) = recording_dispatcher(Arc::new(PanickingAgent));

        dispatcher.send_message("oi").await;

        assert!(!dispatcher.is_loading());
        assert_eq!(*received.lock().unwrap(), vec![DISPATCH_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let agent = GatedAgent {
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        };
        let (dispatcher, received) = recording_dispatcher(Arc::new(agent));
        let dispatcher = Arc::new(dispatcher);

        let task = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.send_message("clima").await })
        };

        entered.notified().await;
        assert!(dispatcher.is_loading());
        assert!(received.lock().unwrap().is_empty());

        release.notify_one();
        task.await.unwrap();

        assert!(!dispatcher.is_loading());
        assert_eq!(*received.lock().unwrap(), vec!["CLIMA".to_string()]);
    }

    #[tokio::test]
    async fn test_set_agent_switches_target() {
        let (dispatcher, received) = recording_dispatcher(Arc::new(EchoAgent));

        dispatcher.send_message("a").await;
        dispatcher.set_agent(Arc::new(FailingAgent));
        dispatcher.send_message("b").await;

        assert_eq!(dispatcher.agent().name(), "failing");
        assert_eq!(
            *received.lock().unwrap(),
            vec!["echo: a".to_string(), "sorry".to_string()]
        );
    }
}
