//! Stable error codes for poem-level diagnostics.
//!
//! Codes serialize as snake_case strings and never change meaning, so run
//! reports can be filtered and aggregated programmatically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable category of a validation finding or poem failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The poem has no stanzas
    EmptyPoem,
    /// A stanza has no lines
    EmptyStanza,
    /// A line contains no words
    EmptyLine,
    /// A line exceeds `batch.max_line_chars` (warning)
    LineTooLong,
    /// A line arrived without normalized text and was normalized here (warning)
    MissingNormalized,
    /// The input record could not be parsed
    InvalidRecord,
    /// Reading the input or writing the output failed
    IoFailed,
    /// Any other failure while annotating
    AnnotationFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyPoem => "empty_poem",
            ErrorCode::EmptyStanza => "empty_stanza",
            ErrorCode::EmptyLine => "empty_line",
            ErrorCode::LineTooLong => "line_too_long",
            ErrorCode::MissingNormalized => "missing_normalized",
            ErrorCode::InvalidRecord => "invalid_record",
            ErrorCode::IoFailed => "io_failed",
            ErrorCode::AnnotationFailed => "annotation_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for code in [
            ErrorCode::EmptyPoem,
            ErrorCode::EmptyStanza,
            ErrorCode::EmptyLine,
            ErrorCode::LineTooLong,
            ErrorCode::MissingNormalized,
            ErrorCode::InvalidRecord,
            ErrorCode::IoFailed,
            ErrorCode::AnnotationFailed,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{code}\""));
        }
    }
}
