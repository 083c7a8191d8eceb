//! REPL (Read-Eval-Print Loop) for interactive CLI
//!
//! Reads lines from stdin, runs slash commands locally and sends everything
//! else through the session's selected agent.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::agent::AgentKind;
use crate::llm::ServiceState;
use crate::session::ChatSession;

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// Switch to an agent
    Agent(AgentKind),
    /// List models fetched at startup, or select one
    Models(Option<String>),
    /// Forget the message history
    Clear,
    /// Show available commands
    Help,
    /// Unrecognized command name
    Unknown(String),
}

impl SlashCommand {
    /// Check if input is a slash command
    pub fn is_command(input: &str) -> bool {
        input.starts_with('/')
    }

    /// Parse a slash command. Returns None when the input is not one.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if !Self::is_command(input) {
            return None;
        }

        let mut parts = input[1..].splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_lowercase();
        let arg = parts
            .next()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from);

        let command = match name.as_str() {
            "llm" | "ia" => SlashCommand::Agent(AgentKind::Llm),
            "weather" | "clima" => SlashCommand::Agent(AgentKind::Weather),
            "models" | "model" => SlashCommand::Models(arg),
            "clear" => SlashCommand::Clear,
            "help" | "?" => SlashCommand::Help,
            _ => SlashCommand::Unknown(name),
        };
        Some(command)
    }
}

const HELP: &str = "\
Commands:
  /llm             Talk to the LLM assistant
  /weather         Ask about the weather (e.g. \"clima em Recife\")
  /models [name]   List models, or select one
  /clear           Clear the conversation
  /help            Show this help
  quit, exit       Leave";

/// Interactive REPL over a chat session
pub struct Repl<'a> {
    session: &'a mut ChatSession,
}

impl<'a> Repl<'a> {
    /// Create a new REPL
    pub fn new(session: &'a mut ChatSession) -> Self {
        Self { session }
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("{}> ", self.session.selected_agent().prompt_prefix());
            stdout.flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                // EOF
                break;
            }
            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            if input == "quit" || input == "exit" {
                break;
            }

            match SlashCommand::parse(input) {
                Some(command) => println!("{}\n", self.handle_command(command)),
                None => self.handle_chat(input).await,
            }
        }

        Ok(())
    }

    fn print_banner(&self) {
        let state = self.session.service_state();
        println!(
            "{}. Type /help for commands, 'quit' to exit.",
            self.session.selected_agent().title()
        );
        println!("Ollama: {}", state.label());
        if state == ServiceState::Online {
            if let Some(model) = self.session.selected_model() {
                println!("Model: {}", model);
            }
        }
        println!();
    }

    /// Run a slash command and return the text to show
    fn handle_command(&mut self, command: SlashCommand) -> String {
        match command {
            SlashCommand::Agent(kind) => {
                self.session.select_agent(kind);
                format!("Switched to {}", kind.title())
            }
            SlashCommand::Models(None) => self.describe_models(),
            SlashCommand::Models(Some(name)) => {
                if self.session.select_model(&name) {
                    format!("Selected model: {}", name)
                } else {
                    format!("Unknown model: {}", name)
                }
            }
            SlashCommand::Clear => {
                self.session.clear();
                "History cleared.".to_string()
            }
            SlashCommand::Help => HELP.to_string(),
            SlashCommand::Unknown(name) => {
                format!("Unknown command: /{}. Type /help for commands.", name)
            }
        }
    }

    fn describe_models(&self) -> String {
        let models = self.session.models();
        if models.is_empty() {
            return format!(
                "No models loaded (Ollama {}).",
                self.session.service_state().label()
            );
        }

        let selected = self.session.selected_model();
        let mut out = String::from("Available models:");
        for m in models {
            let marker = if Some(m.name.as_str()) == selected {
                " (current)"
            } else {
                ""
            };
            out.push_str(&format!("\n  {}{}", m.name, marker));
        }
        out
    }

    async fn handle_chat(&mut self, input: &str) {
        if !self.session.submit(input).await {
            return;
        }
        if let Some(reply) = self.session.last_reply() {
            println!("\n{}\n", reply);
        }
    }
}
