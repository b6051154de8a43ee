use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape used across the engine and exposed to callers.
///
/// Fatal conditions carry stable codes (`SCHEMA_*`, `CONFIG_*`, `INGEST_*`) so callers can
/// branch on them without string-matching messages. Per-record anomalies are never errors;
/// they surface as `ValidationWarning` values in `BatchDiagnostics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl EngineError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for EngineError {}
