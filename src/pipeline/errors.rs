//! Poem-level failure records.
//!
//! A [`PoemFailure`] explains why one poem was skipped. It carries a stable
//! [`ErrorCode`], a JSON pointer `path` into the input record, a
//! human-readable `message`, and an optional `hint`. Failures never abort a
//! batch; they are collected into the run report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error_code::ErrorCode;

/// Why a poem could not be annotated.
///
/// # Display format
///
/// ```text
/// [empty_line] sonnet-18 /stanzas/0/2: line has no words
/// ```
///
/// # JSON format
///
/// ```json
/// {
///   "poem_id": "sonnet-18",
///   "code": "empty_line",
///   "path": "/stanzas/0/2",
///   "message": "line has no words"
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}] {poem_id} {path}: {message}")]
pub struct PoemFailure {
    /// Identifier of the failed poem (file stem when the record is unreadable)
    pub poem_id: String,

    /// Stable error code for programmatic matching.
    pub code: ErrorCode,

    /// JSON pointer into the input record; `""` for the whole record.
    pub path: String,

    /// Human-readable description of the problem.
    pub message: String,

    /// Optional suggestion for how to fix the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl PoemFailure {
    pub fn new(
        poem_id: impl Into<String>,
        code: ErrorCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            poem_id: poem_id.into(),
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a hint suggesting how to fix the problem.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
