//! Gemini client via Google's OpenAI-compatibility endpoint.
//!
//! Speaks the standard chat-completions protocol: a `messages` array, a
//! `tools` array of function declarations, and a response discriminated by
//! `finish_reason`. Because the endpoint is OpenAI-compatible, pointing
//! [`GeminiClientBuilder::base_url`] at any other compatible server works
//! unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Error, ProviderError};
use crate::message::Message;
use crate::providers::{ChatCompletion, ChatModel, FinishReason};
use crate::tool::ToolDefinition;

/// Default base URL for Gemini's OpenAI-compatibility layer.
pub const GEMINI_OPENAI_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Arc<str>,
    base_url: Arc<str>,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client with the given API key and default endpoint/model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    /// Create a client from the `GOOGLE_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the variable is unset, so a missing
    /// credential fails at startup rather than on the first request.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::config(format!("{API_KEY_ENV} environment variable not set")))?;
        Ok(Self::new(api_key))
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn build_request_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if !tools.is_empty() {
            let wire: Vec<Value> = tools.iter().map(ToolDefinition::to_wire).collect();
            body["tools"] = Value::Array(wire);
        }
        body
    }

    fn parse_response(response: WireResponse) -> Result<ChatCompletion, ProviderError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::response_format("response carried no choices"))?;
        Ok(ChatCompletion::new(choice.message, choice.finish_reason))
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    finish_reason: FinishReason,
    message: Message,
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatCompletion, ProviderError> {
        let body = self.build_request_body(messages, tools);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model, messages = messages.len(), "Sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .headers(self.auth_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::http_status(status, error_text));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::response_format(e.to_string()))?;
        Self::parse_response(wire)
    }
}

/// Builder for [`GeminiClient`].
#[derive(Debug, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

impl GeminiClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL (any OpenAI-compatible server).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the request timeout in seconds. Default is no timeout.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Panics
    ///
    /// Panics if the API key is not set or the HTTP client fails to build.
    #[must_use]
    pub fn build(self) -> GeminiClient {
        let api_key = self.api_key.expect("API key is required");
        let base_url = self
            .base_url
            .unwrap_or_else(|| GEMINI_OPENAI_BASE_URL.to_owned());
        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }
        let http_client = builder.build().expect("Failed to build HTTP client");

        GeminiClient {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn test_builder_defaults() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.base_url(), GEMINI_OPENAI_BASE_URL);
        assert_eq!(client.model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn test_builder_overrides() {
        let client = GeminiClient::builder()
            .api_key("test-key")
            .base_url("http://localhost:8080/v1")
            .model("gemini-2.5-pro")
            .timeout_secs(30)
            .build();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(client.model_id(), "gemini-2.5-pro");
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new("super-secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiClient::new("k");
        let messages = vec![Message::system("rules"), Message::user("hi")];
        let tools = vec![ToolDefinition {
            name: "log_violation".to_owned(),
            description: "log it".to_owned(),
            parameters: json!({"type": "object"}),
        }];

        let body = client.build_request_body(&messages, &tools);
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["tools"][0]["function"]["name"], "log_violation");
    }

    #[test]
    fn test_request_body_omits_empty_tools() {
        let client = GeminiClient::new("k");
        let body = client.build_request_body(&[Message::user("hi")], &[]);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "log_violation",
                            "arguments": "{\"question_text\":\"bad\"}"
                        }
                    }]
                }
            }]
        }))
        .unwrap();

        let completion = GeminiClient::parse_response(wire).unwrap();
        assert!(completion.is_tool_call_round());
        assert_eq!(completion.tool_calls().unwrap()[0].name(), "log_violation");
    }

    #[test]
    fn test_parse_final_response() {
        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": "I can't help with that."}
            }]
        }))
        .unwrap();

        let completion = GeminiClient::parse_response(wire).unwrap();
        assert_eq!(completion.finish_reason, FinishReason::Stop);
        assert_eq!(completion.text(), Some("I can't help with that."));
        assert_eq!(completion.message.role, Role::Assistant);
    }

    #[test]
    fn test_parse_empty_choices_is_error() {
        let wire = WireResponse { choices: vec![] };
        assert!(GeminiClient::parse_response(wire).is_err());
    }
}
