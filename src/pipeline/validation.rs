//! Validation engine for input poems.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`NormalizedPoem`] and collects every diagnostic into a
//! [`ValidationReport`]. It never short-circuits on the first error, so a
//! skipped poem's report lists all of its problems at once.
//!
//! # Quick start
//!
//! ```rust
//! use verse_annotate::pipeline::validation::ValidationEngine;
//! use verse_annotate::pipeline::NormalizedPoem;
//!
//! let poem = NormalizedPoem::from_text("p1", &[Vec::<&str>::new()]);
//! let report = ValidationEngine::with_defaults().validate(&poem);
//! assert!(report.has_errors());
//! ```

use serde::Serialize;

use super::artifacts::NormalizedPoem;
use super::error_code::ErrorCode;
use super::errors::PoemFailure;
use crate::nlp::VerseTokenizer;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding: an error or warning attached to a
/// [`PoemFailure`] that carries the code, path, message, and hint.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: PoemFailure,
}

impl ValidationDiagnostic {
    pub fn error(err: PoemFailure) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: PoemFailure) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &PoemFailure> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &PoemFailure> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`NormalizedPoem`] and returns
/// zero or more diagnostics.
///
/// Rules are stateless and `Send + Sync` so one engine can serve every
/// worker of a parallel batch.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"non_empty_line"`).
    fn name(&self) -> &str;

    /// Inspect `poem` and return any findings.
    fn validate(&self, poem: &NormalizedPoem) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a poem and collects all
/// diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(NonEmptyPoemRule));
        engine.add_rule(Box::new(NonEmptyStanzaRule));
        engine.add_rule(Box::new(NonEmptyLineRule));
        engine.add_rule(Box::new(NormalizedTextRule));
        engine
    }

    /// Default rules plus a long-line warning when `max_line_chars > 0`.
    pub fn with_line_limit(max_line_chars: usize) -> Self {
        let mut engine = Self::with_defaults();
        if max_line_chars > 0 {
            engine.add_rule(Box::new(LineLengthRule {
                max_chars: max_line_chars,
            }));
        }
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `poem` and return the collected report.
    pub fn validate(&self, poem: &NormalizedPoem) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(poem));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. a poem needs stanzas ────────────────────────────────────────────────

struct NonEmptyPoemRule;

impl ValidationRule for NonEmptyPoemRule {
    fn name(&self) -> &str {
        "non_empty_poem"
    }

    fn validate(&self, poem: &NormalizedPoem) -> Vec<ValidationDiagnostic> {
        if poem.stanzas.is_empty() {
            vec![ValidationDiagnostic::error(PoemFailure::new(
                &poem.id,
                ErrorCode::EmptyPoem,
                "/stanzas",
                "poem has no stanzas",
            ))]
        } else {
            vec![]
        }
    }
}

// ─── 2. every stanza needs lines ────────────────────────────────────────────

struct NonEmptyStanzaRule;

impl ValidationRule for NonEmptyStanzaRule {
    fn name(&self) -> &str {
        "non_empty_stanza"
    }

    fn validate(&self, poem: &NormalizedPoem) -> Vec<ValidationDiagnostic> {
        poem.stanzas
            .iter()
            .enumerate()
            .filter(|(_, lines)| lines.is_empty())
            .map(|(s, _)| {
                ValidationDiagnostic::error(
                    PoemFailure::new(
                        &poem.id,
                        ErrorCode::EmptyStanza,
                        format!("/stanzas/{s}"),
                        "stanza has no lines",
                    )
                    .with_hint("Remove the empty stanza or merge it with its neighbour"),
                )
            })
            .collect()
    }
}

// ─── 3. every line needs words ──────────────────────────────────────────────

struct NonEmptyLineRule;

impl ValidationRule for NonEmptyLineRule {
    fn name(&self) -> &str {
        "non_empty_line"
    }

    fn validate(&self, poem: &NormalizedPoem) -> Vec<ValidationDiagnostic> {
        let tokenizer = VerseTokenizer::new();
        let mut out = Vec::new();
        for (s, stanza) in poem.stanzas.iter().enumerate() {
            for (l, line) in stanza.iter().enumerate() {
                if tokenizer.tokenize(&line.text()).is_empty() {
                    out.push(ValidationDiagnostic::error(PoemFailure::new(
                        &poem.id,
                        ErrorCode::EmptyLine,
                        format!("/stanzas/{s}/{l}"),
                        format!("line has no words: {:?}", line.raw),
                    )));
                }
            }
        }
        out
    }
}

// ─── 4. normalized text should be present (warning) ─────────────────────────

struct NormalizedTextRule;

impl ValidationRule for NormalizedTextRule {
    fn name(&self) -> &str {
        "normalized_text"
    }

    fn validate(&self, poem: &NormalizedPoem) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        for (s, stanza) in poem.stanzas.iter().enumerate() {
            for (l, line) in stanza.iter().enumerate() {
                if line.normalized.is_none() {
                    out.push(ValidationDiagnostic::warning(PoemFailure::new(
                        &poem.id,
                        ErrorCode::MissingNormalized,
                        format!("/stanzas/{s}/{l}/normalized"),
                        "normalized text missing; normalized from raw",
                    )));
                }
            }
        }
        out
    }
}

// ─── 5. overlong lines (warning) ────────────────────────────────────────────

struct LineLengthRule {
    max_chars: usize,
}

impl ValidationRule for LineLengthRule {
    fn name(&self) -> &str {
        "line_length"
    }

    fn validate(&self, poem: &NormalizedPoem) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        for (s, stanza) in poem.stanzas.iter().enumerate() {
            for (l, line) in stanza.iter().enumerate() {
                let chars = line.text().chars().count();
                if chars > self.max_chars {
                    out.push(ValidationDiagnostic::warning(
                        PoemFailure::new(
                            &poem.id,
                            ErrorCode::LineTooLong,
                            format!("/stanzas/{s}/{l}"),
                            format!("line has {chars} characters (limit {})", self.max_chars),
                        )
                        .with_hint("Check whether two verse lines were merged during extraction"),
                    ));
                }
            }
        }
        out
    }
}
