//! CLI module
//!
//! This module provides:
//! - CLI argument definitions (args)
//! - REPL with slash commands for interactive mode (repl)

pub mod args;
pub mod repl;

pub use args::{Cli, Commands};
pub use repl::{Repl, SlashCommand};
