//! Chat backend routing messages to a local LLM or a weather agent

pub mod agent;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod proxy;
pub mod session;

#[cfg(feature = "web")]
pub mod web;
