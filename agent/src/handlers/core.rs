//! Core command handlers - always available
//!
//! These handlers work without any feature flags.

use anyhow::Result;
use serde_json::{json, Map, Value};

use super::CommandContext;
use crate::agent::{Agent, AgentKind};
use crate::cli::Repl;
use crate::session::ChatSession;

/// Handle the `chat` command - single message through an agent
pub async fn chat(ctx: &CommandContext, message: &str, kind: AgentKind) -> Result<()> {
    let agents = ctx.agents()?;
    let response = agents.get(kind).process(message).await;
    println!("{}", response);
    Ok(())
}

/// Handle the `interactive` command - REPL over a chat session
pub async fn interactive(ctx: &CommandContext, kind: AgentKind) -> Result<()> {
    let mut session = ChatSession::new(ctx.agents()?, ctx.llm()?).with_agent(kind);
    session.initialize().await;

    if let Some(model) = &ctx.file_config.llm.model {
        if !session.select_model(model) {
            tracing::warn!("Configured model '{}' is not installed", model);
        }
    }

    Repl::new(&mut session).run().await
}

/// Handle the `models` command - list available models
pub async fn models(ctx: &CommandContext) -> Result<()> {
    let result = ctx.llm()?.list_models().await;
    if !result.success {
        anyhow::bail!(
            "Failed to list models: {}",
            result.error.unwrap_or_default()
        );
    }

    let models = result.models.unwrap_or_default();
    if models.is_empty() {
        println!("No models installed.");
        return Ok(());
    }

    let current = ctx.file_config.llm.model.as_deref();
    println!("Available models:");
    for m in models {
        let current_marker = if Some(m.name.as_str()) == current {
            " (current)"
        } else {
            ""
        };
        println!(
            "  {:<32} {:>8.1} GB  {}{}",
            m.name,
            m.size as f64 / 1e9,
            m.modified.format("%Y-%m-%d"),
            current_marker
        );
    }
    Ok(())
}

/// Handle the `generate` command - direct one-shot generation
pub async fn generate(
    ctx: &CommandContext,
    prompt: &str,
    model: Option<String>,
    temperature: Option<f64>,
    num_predict: Option<u64>,
) -> Result<()> {
    let llm = ctx.llm()?;

    // Priority: explicit > config > first installed model
    let model = match model.or_else(|| ctx.file_config.llm.model.clone()) {
        Some(model) => model,
        None => llm
            .fetch_models()
            .await?
            .into_iter()
            .next()
            .map(|m| m.name)
            .ok_or_else(|| anyhow::anyhow!("No models installed"))?,
    };

    let overrides = generation_options(temperature, num_predict);
    let result = llm.query_model(&model, prompt, overrides).await;

    if !result.success {
        anyhow::bail!("Generation failed: {}", result.error.unwrap_or_default());
    }

    println!("{}", result.response.unwrap_or_default());
    if ctx.is_verbose() {
        eprintln!(
            "[{} in {} ms]",
            model,
            result.processing_time_ms.unwrap_or_default()
        );
    }
    Ok(())
}

fn generation_options(temperature: Option<f64>, num_predict: Option<u64>) -> Map<String, Value> {
    let mut options = Map::new();
    if let Some(t) = temperature {
        options.insert("temperature".to_string(), json!(t));
    }
    if let Some(n) = num_predict {
        options.insert("num_predict".to_string(), json!(n));
    }
    options
}
