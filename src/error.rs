//! Unified error types for the chatguard crate.
//!
//! The error hierarchy separates three concerns:
//! - [`ProviderError`] - failures at the chat-completions provider boundary
//! - [`ToolError`] - failures while dispatching or executing a tool call
//! - [`Error`] - the top-level error returned from a chat turn

use std::fmt;

/// Result type alias for chatguard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the chatguard crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Startup configuration error (missing credential, missing guardrails file).
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat-completions provider error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Tool dispatch or execution error.
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// The tool-resolution loop ran out of steps without a final answer.
    #[error("guard loop exceeded: no final answer after {max_steps} steps")]
    GuardLoopExceeded {
        /// The configured step limit.
        max_steps: usize,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a guard loop exceeded error.
    #[must_use]
    pub const fn guard_loop_exceeded(max_steps: usize) -> Self {
        Self::GuardLoopExceeded { max_steps }
    }
}

/// Error type for chat-completions provider operations.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ProviderError {
    /// The error kind.
    pub kind: ProviderErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional error code from the provider (HTTP status, API code).
    pub code: Option<String>,
}

/// Categories of provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderErrorKind {
    /// Network or connection error.
    Network,
    /// Non-success HTTP status.
    HttpStatus,
    /// The response body did not match the expected shape.
    ResponseFormat,
}

impl ProviderError {
    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Network,
            message: message.into(),
            code: None,
        }
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::HttpStatus,
            message: format!("HTTP {status}: {}", body.into()),
            code: Some(status.to_string()),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::ResponseFormat,
            message: message.into(),
            code: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code: {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("request timed out")
        } else if err.is_connect() {
            Self::network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::response_format(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error type for tool dispatch and execution failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// The tool-call arguments were not valid JSON or did not match the schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// I/O error inside a tool (e.g. the violation log write failed).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}
