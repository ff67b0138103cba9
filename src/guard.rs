//! The conversation orchestrator.
//!
//! [`ChatGuard`] drives one chat turn through its tool-resolution loop:
//!
//! 1. Build the transcript: system prompt (guardrails + instructions),
//!    the caller-supplied history, then the new user message.
//! 2. Send the transcript plus the registry's tool schema to the model.
//! 3. If the response is a tool-call round, append the assistant message,
//!    dispatch every call in order, append one `tool` result per call tagged
//!    with its call id, and loop back to step 2.
//! 4. Otherwise the response content is the final answer.
//!
//! The loop is bounded: a model that keeps requesting tools past
//! [`ChatGuard::max_steps`] gets [`Error::GuardLoopExceeded`] instead of
//! spinning forever.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{Error, Result, ToolError};
use crate::message::{Message, ToolCall};
use crate::providers::ChatModel;
use crate::tool::ToolRegistry;

/// Default bound on tool-resolution loop iterations per chat turn.
pub const DEFAULT_MAX_STEPS: usize = 8;

/// Conversational guardrail orchestrator.
///
/// Owns the guardrails document, the model client, and the tool registry,
/// all injected at construction so tests can substitute fakes for each.
pub struct ChatGuard {
    model: Arc<dyn ChatModel>,
    guardrails: String,
    tools: ToolRegistry,
    max_steps: usize,
}

impl std::fmt::Debug for ChatGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatGuard")
            .field("model", &self.model.model_id())
            .field("guardrails_len", &self.guardrails.len())
            .field("tools", &self.tools)
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

impl ChatGuard {
    /// Create an orchestrator from a model client, the guardrails document,
    /// and the tool registry.
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        guardrails: impl Into<String>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            model,
            guardrails: guardrails.into(),
            tools,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Override the tool-resolution loop bound. Clamped to at least one step.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// The configured loop bound.
    #[must_use]
    pub const fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// The system prompt: behavior instructions plus the guardrails document
    /// embedded verbatim.
    #[must_use]
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(
            "You are a chatbot that is responsible for guarding the chat against \
             violations of the guardrails. You are given a summary of the guardrails \
             and the user's question. You are to respond to the user's question and \
             check if it violates the guardrails. If it does, you are to use the \
             log_violation tool to log the violation. If it does not, you are to \
             respond to the user's question with relevant answer from your knowledge.",
        );
        prompt.push_str("\n\n## Guardrails:\n");
        prompt.push_str(&self.guardrails);
        prompt.push_str(
            "\n\nWith this context, please chat with the user, always keeping in mind \
             the guardrails.",
        );
        prompt
    }

    /// Run one chat turn to completion.
    ///
    /// `history` is the prior turns' transcript owned by the caller; this
    /// method never mutates it, only the turn-local copy.
    ///
    /// # Errors
    ///
    /// Propagates provider and tool failures, and returns
    /// [`Error::GuardLoopExceeded`] when the model keeps requesting tools
    /// past the configured step bound.
    pub async fn chat(&self, message: &str, history: &[Message]) -> Result<String> {
        let mut transcript = Vec::with_capacity(history.len() + 2);
        transcript.push(Message::system(self.system_prompt()));
        transcript.extend_from_slice(history);
        transcript.push(Message::user(message));

        let definitions = self.tools.definitions();

        for step in 1..=self.max_steps {
            debug!(step, transcript = transcript.len(), "Requesting completion");
            let completion = self.model.complete(&transcript, &definitions).await?;

            if !completion.is_tool_call_round() {
                return Ok(completion.text().unwrap_or_default().to_owned());
            }

            let calls = completion
                .tool_calls()
                .map(<[ToolCall]>::to_vec)
                .unwrap_or_default();
            transcript.push(completion.message);

            // Every emitted call gets exactly one tool-result message,
            // tagged with its call id, before the next request goes out.
            for call in &calls {
                let result = self.dispatch(call).await?;
                transcript.push(Message::tool(&call.id, serde_json::to_string(&result)?));
            }
        }

        warn!(max_steps = self.max_steps, "Tool-resolution loop exhausted");
        Err(Error::guard_loop_exceeded(self.max_steps))
    }

    /// Dispatch a single tool call through the registry.
    ///
    /// An unknown tool name degrades to an empty result object rather than
    /// failing the turn. Malformed arguments and tool failures are errors
    /// that abort the turn.
    async fn dispatch(&self, call: &ToolCall) -> Result<Value> {
        let Some(tool) = self.tools.get(call.name()) else {
            warn!(tool = call.name(), id = %call.id, "Unknown tool requested");
            return Ok(json!({}));
        };

        let arguments: Value = call
            .parse_arguments()
            .map_err(|e| ToolError::invalid_arguments(format!("{}: {e}", call.name())))?;

        debug!(tool = call.name(), id = %call.id, "Dispatching tool call");
        let result = tool.call(arguments).await?;
        Ok(result)
    }
}
