//! Startup configuration.
//!
//! Everything the orchestrator needs is resolved here, once, and passed in
//! by constructor: the credential, the guardrails document, and the
//! violation log path. Nothing reads the environment after startup.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::providers::gemini::{self, GeminiClient};

/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Environment variable overriding the model identifier.
pub const MODEL_ENV: &str = "CHATGUARD_MODEL";

/// Resolved startup configuration for the guardrail chatbot.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Provider API credential.
    pub api_key: String,
    /// Chat-completions base URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Path to the plain-text guardrails document.
    pub guardrails_path: PathBuf,
    /// Path to the append-only violation log.
    pub violations_path: PathBuf,
    /// Bound on tool-resolution loop iterations per turn.
    pub max_steps: usize,
}

impl GuardConfig {
    /// Create a configuration with the given credential and defaults for
    /// everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: gemini::GEMINI_OPENAI_BASE_URL.to_owned(),
            model: gemini::DEFAULT_MODEL.to_owned(),
            guardrails_path: PathBuf::from("guardrails.txt"),
            violations_path: PathBuf::from("violations.txt"),
            max_steps: crate::guard::DEFAULT_MAX_STEPS,
        }
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `GOOGLE_API_KEY` (required), `GEMINI_BASE_URL` and
    /// `CHATGUARD_MODEL` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the credential is absent.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(gemini::API_KEY_ENV).map_err(|_| {
            Error::config(format!(
                "{} environment variable not set",
                gemini::API_KEY_ENV
            ))
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = model;
        }
        Ok(config)
    }

    /// Set the guardrails document path.
    #[must_use]
    pub fn guardrails_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.guardrails_path = path.into();
        self
    }

    /// Set the violation log path.
    #[must_use]
    pub fn violations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.violations_path = path.into();
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the loop bound.
    #[must_use]
    pub const fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Read the guardrails document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the path when the file cannot be
    /// read, so a missing document fails at startup.
    pub fn load_guardrails(&self) -> Result<String> {
        read_guardrails(&self.guardrails_path)
    }

    /// Build the provider client from this configuration.
    #[must_use]
    pub fn client(&self) -> GeminiClient {
        GeminiClient::builder()
            .api_key(&self.api_key)
            .base_url(&self.base_url)
            .model(&self.model)
            .build()
    }
}

/// Read a guardrails document from disk, mapping failure to a configuration
/// error that names the path.
pub fn read_guardrails(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("cannot read guardrails file {}: {e}", path.display())))
}
