//! Error types for the proxy and agent layers
//!
//! Proxy handlers fail with [`ProxyError`], which maps onto an HTTP status and
//! a JSON `{ error }` body. Agents fail with [`AgentError`], which never leaves
//! the agent: it is turned into an apology string at the `process` boundary.

use thiserror::Error;

/// Errors raised while relaying a request to a third-party service
#[derive(Error, Debug)]
pub enum ProxyError {
    /// A required request field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The upstream answered with a non-success status
    #[error("{service} error: {status_text} - {body}")]
    Upstream {
        /// Which upstream failed (e.g. "Ollama API")
        service: &'static str,
        /// Canonical reason phrase of the upstream status
        status_text: String,
        /// Raw error body returned by the upstream
        body: String,
    },

    /// Geocoding returned zero matches
    #[error("Location not found: {0}")]
    NotFound(String),

    /// Network failure reaching an upstream
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream body was not the JSON we expected
    #[error("invalid upstream JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The incoming request body could not be decoded
    #[error("invalid request body: {0}")]
    InvalidRequest(String),
}

impl ProxyError {
    /// Short machine-readable tag, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Validation(_) => "validation",
            ProxyError::Upstream { .. } => "upstream",
            ProxyError::NotFound(_) => "not_found",
            ProxyError::Transport(_) => "transport",
            ProxyError::Parse(_) => "parse",
            ProxyError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// HTTP status the handler answers with.
    ///
    /// Only validation failures are client errors. A location that cannot be
    /// geocoded is still reported as 500.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Build an upstream error from a failed response, consuming its body
    pub async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status();
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        let body = response.text().await.unwrap_or_default();
        ProxyError::Upstream {
            service,
            status_text,
            body,
        }
    }
}

/// Result type alias for proxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors raised inside an agent before they are turned into reply text
#[derive(Error, Debug)]
pub enum AgentError {
    /// The proxy could not be reached, or its body could not be decoded
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy answered with a non-success status and no usable message
    #[error("{0}")]
    Status(String),

    /// The proxy reported an error message of its own
    #[error("{0}")]
    Proxy(String),

    /// A success body lacked an expected field
    #[error("missing field in proxy response: {0}")]
    MissingField(&'static str),
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors from the direct Ollama client
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network failure, timeout, or undecodable body
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Ollama answered with an error message
    #[error("{0}")]
    Api(String),

    /// The body did not have the expected shape
    #[error("Formato de resposta inesperado")]
    UnexpectedFormat,
}
