//! Chatguard is a small conversational guardrail wrapper: it forwards chat
//! messages to an OpenAI-compatible chat-completions provider, asks the model
//! to judge each question against a configured guardrails document, and gives
//! it one tool - `log_violation` - that appends a timestamped record to an
//! append-only file.
//!
//! # Architecture
//!
//! - [`guard::ChatGuard`] - the conversation orchestrator: builds the system
//!   prompt, runs the bounded tool-resolution loop, returns the final answer.
//! - [`violations`] - the violation log and the `log_violation` tool.
//! - [`providers`] - the [`providers::ChatModel`] seam and the Gemini client.
//! - [`tool`] - tool declarations and the explicit name-to-handler registry.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chatguard::{ChatGuard, GuardConfig, LogViolation, ToolRegistry, ViolationLog};
//!
//! let config = GuardConfig::from_env()?;
//! let guardrails = config.load_guardrails()?;
//! let tools = ToolRegistry::new()
//!     .with(LogViolation::new(ViolationLog::new(&config.violations_path)));
//!
//! let guard = ChatGuard::new(Arc::new(config.client()), guardrails, tools)
//!     .with_max_steps(config.max_steps);
//! let answer = guard.chat("What drug treats migraines?", &[]).await?;
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod message;
pub mod providers;
pub mod tool;
pub mod violations;

pub use config::GuardConfig;
pub use error::{Error, ProviderError, Result, ToolError};
pub use guard::ChatGuard;
pub use message::{Message, Role, ToolCall};
pub use providers::{ChatCompletion, ChatModel, FinishReason};
pub use tool::{Tool, ToolDefinition, ToolRegistry};
pub use violations::{LogViolation, ViolationLog};
