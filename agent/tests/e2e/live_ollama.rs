//! E2E test: direct generation and the chat proxy against a real model

use clima_agent::llm::LlmService;
use clima_agent::proxy::{ChatProxy, NO_RESPONSE_PLACEHOLDER};
use serde_json::{json, Map};

use super::prerequisites::{first_model, ollama_url};

#[tokio::test]
#[ignore = "requires Ollama"]
async fn test_query_model_reports_timing() {
    let model = first_model().await.expect("No model installed");
    let llm = LlmService::new(&ollama_url()).unwrap();

    let mut overrides = Map::new();
    overrides.insert("num_predict".to_string(), json!(16));
    let result = llm.query_model(&model, "Responda apenas: ok", overrides).await;

    println!("{:?}", result);
    assert!(result.success, "Generation failed: {:?}", result.error);
    assert!(result.processing_time_ms.is_some());
    assert_eq!(result.model.as_deref(), Some(model.as_str()));
}

#[tokio::test]
#[ignore = "requires Ollama"]
async fn test_chat_proxy_generates() {
    let model = first_model().await.expect("No model installed");
    let proxy = ChatProxy::new(&format!("{}/api/generate", ollama_url()), &model);

    let reply = proxy.generate("Diga olá em uma palavra.").await;

    println!("{:?}", reply);
    let reply = reply.expect("Proxy generation failed");
    assert!(!reply.is_empty());
    assert_ne!(reply, NO_RESPONSE_PLACEHOLDER);
}
