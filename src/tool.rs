//! Tool definitions and the explicit tool registry.
//!
//! The [`Tool`] trait defines the interface for handlers the model can invoke
//! via tool calls. Implementations are collected in a [`ToolRegistry`], an
//! explicit name-to-handler map built once at startup and injected into the
//! orchestrator, so the tool set is statically enumerable and testable in
//! isolation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ToolError;

/// Declaration of a tool: name, description, and JSON-schema parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name the model uses to invoke it.
    pub name: String,
    /// Natural-language description shown to the model.
    pub description: String,
    /// JSON schema describing the argument object.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Wrap the definition in the wire envelope the chat-completions API
    /// expects: `{"type": "function", "function": {...}}`.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// A handler the model can invoke through the tool-call protocol.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool name, matching [`ToolDefinition::name`].
    fn name(&self) -> &str;

    /// The tool's declaration sent with every request.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with decoded JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] when the arguments do not match the tool's
    /// schema or execution fails.
    async fn call(&self, arguments: Value) -> Result<Value, ToolError>;
}

/// A heap-allocated tool handler.
pub type BoxedTool = Box<dyn Tool>;

/// Explicit mapping from tool name to handler.
///
/// Ordered by name so [`ToolRegistry::definitions`] is deterministic.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, BoxedTool>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its declared name, replacing any previous
    /// handler with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_owned(), Box::new(tool));
    }

    /// Register a tool, builder-style.
    #[must_use]
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(Box::as_ref)
    }

    /// Whether a tool with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Declarations for every registered tool.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
