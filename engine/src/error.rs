//! Engine error types

use shared::SharedError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Timed out after {}ms waiting for {what}{}", .after.as_millis(), observation_suffix(.last_observation))]
    Timeout {
        what: String,
        after: Duration,
        last_observation: Option<String>,
    },

    #[error("Malformed {document}: {reason}")]
    MalformedDocument { document: String, reason: String },

    #[error("Transport failure in {adapter}: {message}")]
    Transport { adapter: String, message: String },

    #[error("Assertion failed at {path}: expected {expected}, got {actual}")]
    AssertionFailure {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn transport(adapter: &str, message: impl Into<String>) -> Self {
        EngineError::Transport {
            adapter: adapter.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(document: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedDocument {
            document: document.to_string(),
            reason: reason.into(),
        }
    }

    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        EngineError::Timeout {
            what: what.into(),
            after,
            last_observation: None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::Timeout { .. })
    }

    /// Render/parse faults, including invalid descriptors
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedDocument { .. } | EngineError::Shared(_) | EngineError::Json(_)
        )
    }
}

fn observation_suffix(last_observation: &Option<String>) -> String {
    match last_observation {
        Some(observation) => format!(" (last observation: {observation})"),
        None => String::new(),
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
