//! E2E Tests against a live Ollama
//!
//! These tests require:
//! - Ollama running locally (default: http://localhost:11434)
//! - At least one model pulled
//!
//! Run with: cargo test --test e2e -- --include-ignored
//!
//! Test structure:
//! - prerequisites: Verify Ollama is reachable
//! - live_ollama: Direct client and chat proxy against the real service

#[path = "e2e/prerequisites.rs"]
mod prerequisites;

#[path = "e2e/live_ollama.rs"]
mod live_ollama;
