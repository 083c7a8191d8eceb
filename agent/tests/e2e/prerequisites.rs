//! Verify E2E test prerequisites before running tests

use clima_agent::llm::{LlmService, ServiceState};

/// Default Ollama URL
pub fn ollama_url() -> String {
    std::env::var("LLM_API_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

/// Check if Ollama is running and accessible
pub async fn check_ollama() -> bool {
    match LlmService::new(&ollama_url()) {
        Ok(llm) => llm.check_service().await.status == ServiceState::Online,
        Err(_) => false,
    }
}

/// First installed model, if any
pub async fn first_model() -> Option<String> {
    let llm = LlmService::new(&ollama_url()).ok()?;
    llm.fetch_models().await.ok()?.into_iter().next().map(|m| m.name)
}

#[tokio::test]
#[ignore = "prerequisites check - run first"]
async fn test_prerequisites() {
    println!("\n=== E2E Prerequisites Check ===\n");

    let ollama_ok = check_ollama().await;
    println!(
        "Ollama ({}): {}",
        ollama_url(),
        if ollama_ok { "✓ Running" } else { "✗ Not accessible" }
    );

    let model = first_model().await;
    println!(
        "Model: {}",
        model.as_deref().unwrap_or("✗ None installed (run: ollama pull llama3.1:8b)")
    );

    assert!(ollama_ok, "Ollama must be running");
    assert!(model.is_some(), "At least one model must be pulled");
}
