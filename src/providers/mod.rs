//! Chat-completions providers.
//!
//! [`ChatModel`] is the seam between the orchestrator and the external model:
//! one request carrying the transcript and the tool schema, one response
//! discriminated by finish reason. The orchestrator only ever holds a trait
//! object, so tests substitute a scripted fake for the real client.

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::{Message, ToolCall};
use crate::tool::ToolDefinition;

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FinishReason {
    /// Normal completion carrying final text content.
    Stop,
    /// The response carries tool invocations to dispatch.
    ToolCalls,
    /// Generation hit the token limit.
    Length,
    /// The provider filtered the content.
    ContentFilter,
    /// Any reason this crate does not recognize.
    #[serde(other)]
    Other,
}

/// One completed model response: the assistant message plus the reason the
/// model stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// The assistant message to append to the transcript.
    pub message: Message,
    /// The provider's finish reason.
    pub finish_reason: FinishReason,
}

impl ChatCompletion {
    /// Create a completion from a message and finish reason.
    #[must_use]
    pub const fn new(message: Message, finish_reason: FinishReason) -> Self {
        Self {
            message,
            finish_reason,
        }
    }

    /// Tool calls carried by the response, if any.
    #[must_use]
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.message.tool_calls.as_deref()
    }

    /// Whether this response is a tool-call round: the finish reason says so
    /// and at least one call is actually present.
    #[must_use]
    pub fn is_tool_call_round(&self) -> bool {
        self.finish_reason == FinishReason::ToolCalls && self.message.has_tool_calls()
    }

    /// Text content of the response, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.text()
    }
}

/// A chat-completions model the orchestrator can query.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier (e.g. "gemini-2.5-flash").
    fn model_id(&self) -> &str;

    /// Send the transcript plus the tool schema and return the completion.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on transport failure, non-success status,
    /// or an unparseable response body.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatCompletion, ProviderError>;
}
