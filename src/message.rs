//! Transcript message types.
//!
//! [`Message`] serializes directly to the OpenAI chat-completions wire shape,
//! so a `Vec<Message>` can be dropped straight into a request body. A chat
//! turn's transcript is an append-only sequence of these, in the order
//! `system`, history, `user`, then alternating assistant tool-call rounds and
//! their `tool` results.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The role of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (guardrails + behavior).
    System,
    /// End-user input.
    User,
    /// Model output, possibly carrying tool calls.
    Assistant,
    /// Result of a dispatched tool call.
    Tool,
}

/// The function portion of a tool call: name plus JSON-encoded arguments.
///
/// `arguments` is kept as the raw string the provider emitted; decoding is
/// deferred to dispatch so a malformed payload is reported against the
/// specific call that carried it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The declared tool name.
    pub name: String,
    /// JSON-encoded argument object.
    pub arguments: String,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier; the matching tool-result message
    /// must echo it back.
    pub id: String,
    /// Call type discriminator, always `"function"`.
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    /// The requested function and its arguments.
    pub function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_owned()
}

impl ToolCall {
    /// Create a new tool call with JSON-encoded arguments.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// The requested tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode the JSON-encoded arguments into a typed value.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the argument string
    /// is not valid JSON or does not match `T`.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.function.arguments)
    }
}

/// A single role-tagged transcript message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The message role.
    pub role: Role,
    /// Text content. Absent on assistant messages that only carry tool calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls requested by the model (assistant messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Identifier of the call this message answers (tool messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message with plain text content.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a tool-result message answering the given call identifier.
    #[must_use]
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }

    /// Text content of the message, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether the message carries at least one tool call.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|tc| !tc.is_empty())
    }
}
