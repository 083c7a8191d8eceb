//! Configuration loading

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up on disk
pub const CONFIG_FILE_NAME: &str = ".clima-agent.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/clima-agent/
///
/// Returns the path if found, None otherwise.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        // Also check agent/ subdirectory (for workspace root detection)
        let agent_candidate = current.join("agent").join(filename);
        if agent_candidate.exists() {
            return Some(agent_candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("clima-agent").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

// ============================================================================
// File configuration (.clima-agent.toml)
// ============================================================================

/// Top-level configuration (from .clima-agent.toml)
#[derive(Debug, Default, Deserialize)]
pub struct ClimaConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Direct Ollama access (model listing, generation, health check)
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Ollama service
    #[serde(default = "default_llm_url")]
    pub url: String,
    /// Model used by `generate` when none is given
    #[serde(default)]
    pub model: Option<String>,
}

/// Proxy server section
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Port the proxy server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Generation endpoint the chat proxy forwards to
    #[serde(default = "default_generate_url")]
    pub generate_url: String,
    /// Fixed model identifier sent with every chat proxy request
    #[serde(default = "default_proxy_model")]
    pub model: String,
    /// Base URL agents use to reach the proxy
    #[serde(default = "default_proxy_url")]
    pub url: String,
}

/// Open-Meteo endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
}

// Default value functions
fn default_llm_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_generate_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_proxy_model() -> String {
    "ollama3.1".to_string()
}

fn default_proxy_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: None,
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            generate_url: default_generate_url(),
            model: default_proxy_model(),
            url: default_proxy_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
        }
    }
}

impl ClimaConfig {
    /// Load config from .clima-agent.toml
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd looking for .clima-agent.toml
    /// 2. Check ~/.config/clima-agent/.clima-agent.toml (global fallback)
    /// 3. Fall back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(CONFIG_FILE_NAME) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClimaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default direct LLM URL (for use elsewhere)
    pub fn default_llm_url() -> String {
        default_llm_url()
    }
}
