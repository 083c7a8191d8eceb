//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::agent::AgentKind;

#[derive(Parser)]
#[command(name = "clima-agent")]
#[command(about = "Chat with a local LLM or ask about the weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a config file (default: nearest .clima-agent.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ollama base URL for direct calls (default: from config or http://localhost:11434)
    #[arg(long, env = "LLM_API_URL", global = true)]
    pub llm_url: Option<String>,

    /// Base URL the agents use to reach the proxy
    #[arg(long, env = "CLIMA_PROXY_URL", global = true)]
    pub proxy_url: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server (/api/chat, /api/weather)
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: from config or 3000)
        #[arg(short, long)]
        port: Option<u16>,
        /// Generation endpoint the chat proxy forwards to
        #[arg(long, env = "CLIMA_GENERATE_URL")]
        generate_url: Option<String>,
        /// Model identifier sent with every chat request
        #[arg(short = 'm', long)]
        model: Option<String>,
    },
    /// Send one message through an agent
    Chat {
        /// Message to send
        message: String,
        /// Agent that handles the message
        #[arg(long, short, value_enum, default_value_t = AgentKind::Llm)]
        agent: AgentKind,
    },
    /// Interactive chat session
    Interactive {
        /// Agent selected at startup
        #[arg(long, short, value_enum, default_value_t = AgentKind::Llm)]
        agent: AgentKind,
    },
    /// List available models from Ollama
    Models,
    /// Check whether Ollama is reachable
    Health,
    /// Generate text directly with Ollama, bypassing the proxy
    Generate {
        /// Prompt to send
        prompt: String,
        /// Model to use (default: from config, else the first installed model)
        #[arg(short = 'm', long, env = "OLLAMA_MODEL")]
        model: Option<String>,
        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,
        /// Maximum number of tokens to generate
        #[arg(long)]
        num_predict: Option<u64>,
    },
}
