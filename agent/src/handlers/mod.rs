//! Command handlers module
//!
//! This module contains handler functions for CLI commands.
//! CommandContext carries the resolved settings shared across handlers.

use anyhow::Result;

use crate::agent::Agents;
use crate::config::ClimaConfig;
use crate::llm::LlmService;

// =============================================================================
// Always available - core handlers
// =============================================================================
pub mod core;
pub mod health;

pub use core::{chat, generate, interactive, models};
pub use health::run_health;

// =============================================================================
// Web feature handlers
// =============================================================================
#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "web")]
pub use web::run_web;

// =============================================================================
// CommandContext - resolved settings
// =============================================================================

/// Shared context for command handlers
pub struct CommandContext {
    /// Base URL for direct Ollama calls
    pub llm_url: String,
    /// Base URL agents use to reach the proxy
    pub proxy_url: String,
    pub verbose: u8,
    pub file_config: ClimaConfig,
}

impl CommandContext {
    /// Create a new CommandContext from CLI args and file config
    pub fn new(
        llm_url: Option<String>,
        proxy_url: Option<String>,
        verbose: u8,
        file_config: ClimaConfig,
    ) -> Self {
        // Resolve with priority: CLI/env > config file > defaults
        let llm_url = llm_url.unwrap_or_else(|| file_config.llm.url.clone());
        let proxy_url = proxy_url.unwrap_or_else(|| file_config.proxy.url.clone());

        Self {
            llm_url,
            proxy_url,
            verbose,
            file_config,
        }
    }

    /// Create a direct Ollama client for the context's URL
    pub fn llm(&self) -> Result<LlmService> {
        Ok(LlmService::new(&self.llm_url)?)
    }

    /// Build both agents against the context's proxy URL
    pub fn agents(&self) -> Result<Agents> {
        Agents::new(&self.proxy_url)
            .map_err(|e| anyhow::anyhow!("Invalid proxy URL '{}': {}", self.proxy_url, e))
    }

    /// Check if verbose mode is enabled (any -v flag)
    pub fn is_verbose(&self) -> bool {
        self.verbose >= 1
    }
}
