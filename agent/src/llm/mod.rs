//! Direct LLM access, bypassing the proxy

mod ollama;

pub use ollama::{
    ListModelsResult, LlmService, ModelDescriptor, QueryResponse, ServiceState, ServiceStatus,
    REQUEST_TIMEOUT,
};
