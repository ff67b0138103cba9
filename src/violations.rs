//! Violation logging: the append-only log file and the `log_violation` tool.
//!
//! The log is a flat text file, one line per violation:
//!
//! ```text
//! Datetime: 2026-08-26 14:03:51 | Question: What drug treats migraines?
//! ```
//!
//! It is never read back, rotated, or truncated by this crate. Each entry is
//! a single write of one bounded line, so concurrent appends from separate
//! turns keep line atomicity on typical filesystems; no locking is provided.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::tool::{Tool, ToolDefinition};

/// Timestamp format used in log lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only log of guardrail violations.
#[derive(Debug, Clone)]
pub struct ViolationLog {
    path: PathBuf,
}

impl ViolationLog {
    /// Create a log writing to the given path. The file is created on the
    /// first append if it does not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one violation line with a local timestamp.
    ///
    /// The question text is recorded verbatim: empty or arbitrarily long
    /// strings are accepted, and identical entries produce distinct lines.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be opened or
    /// written; the handle is released either way.
    pub fn append(&self, question_text: &str) -> io::Result<()> {
        let now = Local::now().format(TIMESTAMP_FORMAT);
        let line = format!("Datetime: {now} | Question: {question_text}\n");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

/// Arguments for the `log_violation` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogViolationArgs {
    question_text: String,
}

/// The `log_violation` tool: records a guardrail-violating question.
#[derive(Debug, Clone)]
pub struct LogViolation {
    log: ViolationLog,
}

impl LogViolation {
    /// Create the tool writing to the given violation log.
    #[must_use]
    pub const fn new(log: ViolationLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Tool for LogViolation {
    fn name(&self) -> &str {
        "log_violation"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "log_violation".to_owned(),
            description: "Use this tool to record any question that violates the guardrails"
                .to_owned(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "question_text": {
                        "type": "string",
                        "description": "The question that violated the guardrails"
                    }
                },
                "required": ["question_text"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: LogViolationArgs = serde_json::from_value(arguments)?;

        debug!(question = %args.question_text, "Logging guardrail violation");
        if let Err(e) = self.log.append(&args.question_text) {
            warn!(path = %self.log.path().display(), error = %e, "Violation log write failed");
            return Err(ToolError::Io(e));
        }

        Ok(json!({"logged": "ok"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use chrono::NaiveDateTime;

    fn temp_log(dir: &TempDir) -> ViolationLog {
        ViolationLog::new(dir.path().join("violations.txt"))
    }

    #[test]
    fn test_append_format() {
        let dir = TempDir::new().unwrap();
        let log = temp_log(&dir);

        log.append("What drug treats migraines?").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let (prefix, question) = lines[0].split_once(" | ").unwrap();
        assert_eq!(question, "Question: What drug treats migraines?");

        let stamp = prefix.strip_prefix("Datetime: ").unwrap();
        assert!(NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_append_no_deduplication() {
        let dir = TempDir::new().unwrap();
        let log = temp_log(&dir);

        log.append("same question").unwrap();
        log.append("same question").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_append_accepts_empty_text() {
        let dir = TempDir::new().unwrap();
        let log = temp_log(&dir);

        log.append("").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert!(contents.lines().next().unwrap().ends_with("| Question: "));
    }

    #[tokio::test]
    async fn test_tool_returns_fixed_acknowledgement() {
        let dir = TempDir::new().unwrap();
        let tool = LogViolation::new(temp_log(&dir));

        let out = tool
            .call(json!({"question_text": "forbidden question"}))
            .await
            .unwrap();
        assert_eq!(out, json!({"logged": "ok"}));

        let contents = std::fs::read_to_string(dir.path().join("violations.txt")).unwrap();
        assert!(contents.contains("Question: forbidden question"));
    }

    #[tokio::test]
    async fn test_tool_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let tool = LogViolation::new(temp_log(&dir));

        let err = tool
            .call(json!({"question_text": "x", "extra": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_tool_rejects_missing_argument() {
        let dir = TempDir::new().unwrap();
        let tool = LogViolation::new(temp_log(&dir));

        let err = tool.call(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_tool_write_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory path cannot be opened for append.
        let tool = LogViolation::new(ViolationLog::new(dir.path()));

        let err = tool.call(json!({"question_text": "x"})).await.unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }
}
