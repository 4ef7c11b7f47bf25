//! Error types for verse_annotate
//!
//! This module defines the crate-wide error type. Recoverable per-word
//! problems (lookup misses, synthesizer failures) never surface here; they
//! are folded into degraded annotations instead.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Main error type for verse_annotate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotateError {
    /// Input is empty or contains nothing to annotate
    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A pronunciation source (dictionary or override table) could not be parsed
    #[error("Lexicon error at line {line}: {message}")]
    Lexicon { line: usize, message: String },

    /// Reading or writing a file failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnnotateError {
    /// Create an empty input error
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a lexicon parse error for a 1-based source line
    pub fn lexicon(line: usize, message: impl Into<String>) -> Self {
        Self::Lexicon {
            line,
            message: message.into(),
        }
    }

    /// Create an I/O error tagged with the offending path
    pub fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error came from a malformed lexicon source
    pub fn is_lexicon_error(&self) -> bool {
        matches!(self, Self::Lexicon { .. })
    }
}

impl From<serde_json::Error> for AnnotateError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Failure of the fallback grapheme-to-phoneme synthesizer.
///
/// Every variant is recovered locally by the resolver: the word is marked
/// unresolved and annotation continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The word has no letters the synthesizer can pronounce
    #[error("no pronounceable graphemes in {word:?}")]
    NoGraphemes { word: String },

    /// The per-word time allowance ran out
    #[error("synthesis of {word:?} exceeded its time budget")]
    DeadlineExceeded { word: String },

    /// Any other synthesizer-specific failure
    #[error("synthesis failed: {0}")]
    Failed(String),
}
