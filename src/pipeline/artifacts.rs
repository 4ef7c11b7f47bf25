//! Records flowing into and out of the annotation pipeline.
//!
//! [`NormalizedPoem`] is the upstream contract: plain line text grouped into
//! stanzas. [`AnnotatedPoem`] is the downstream contract consumed by
//! persistence and reporting: every field is always populated, with explicit
//! `degraded` flags and confidences instead of absent values.
//!
//! Serialized maps are `BTreeMap`s so the same input always produces
//! byte-identical JSON.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::PoemFailure;
use crate::nlp::normalize_line;
use crate::prosody::{Caesura, EndStop};
use crate::types::PronunciationSource;

// ============================================================================
// Input
// ============================================================================

/// One line as delivered by the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLine {
    /// Line text exactly as it appears in the source
    pub raw: String,
    /// Canonicalized text; filled by [`normalize_line`] when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
}

impl InputLine {
    /// A line with both raw and normalized text.
    pub fn new(raw: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            normalized: Some(normalized.into()),
        }
    }

    /// A line with raw text only.
    pub fn raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            normalized: None,
        }
    }

    /// The text to annotate.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.normalized {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(normalize_line(&self.raw)),
        }
    }
}

/// A poem ready for annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPoem {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub stanzas: Vec<Vec<InputLine>>,
}

impl NormalizedPoem {
    pub fn new(id: impl Into<String>, stanzas: Vec<Vec<InputLine>>) -> Self {
        Self {
            id: id.into(),
            author: None,
            title: None,
            stanzas,
        }
    }

    /// Build a poem from already-normalized stanza text.
    pub fn from_text<S: AsRef<str>>(id: impl Into<String>, stanzas: &[Vec<S>]) -> Self {
        let stanzas = stanzas
            .iter()
            .map(|lines| {
                lines
                    .iter()
                    .map(|l| InputLine::new(l.as_ref(), l.as_ref()))
                    .collect()
            })
            .collect();
        Self::new(id, stanzas)
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn line_count(&self) -> usize {
        self.stanzas.iter().map(Vec::len).sum()
    }
}

// ============================================================================
// Output
// ============================================================================

/// Pronunciation record for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPhonology {
    /// Surface form
    pub word: String,
    /// Candidate pronunciations, canonical first
    pub arpabet: Vec<String>,
    /// Source of the canonical pronunciation
    pub source: PronunciationSource,
}

/// A fully annotated line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedLine {
    pub stanza_index: usize,
    pub line_index: usize,
    /// Source text, unchanged
    pub raw: String,
    /// Text the analysis ran on
    pub normalized: String,
    pub phonology: Vec<WordPhonology>,
    /// One ARPAbet stress digit per syllable
    pub stress_pattern: String,
    pub syllables: usize,
    /// Template label, `irregular`, or `unknown`
    pub meter: String,
    pub meter_score: f64,
    pub meter_confidence: f64,
    /// Final word of the line
    pub rhyme_word: String,
    /// Rhyme-bearing phonemes of the final word, `?` when unknown
    pub rhyme_unit: String,
    pub rhyme_group: String,
    pub end_stopped: bool,
    pub end_stop: EndStop,
    pub enjambment: bool,
    pub caesura: Option<Caesura>,
    /// Some word came from a fallback source or could not be pronounced
    pub degraded: bool,
}

/// A fully annotated stanza.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedStanza {
    pub stanza_index: usize,
    pub stanza_type: String,
    pub rhyme_scheme: Vec<String>,
    pub rhyme_pairs: Vec<(usize, usize)>,
    pub lines: Vec<AnnotatedLine>,
}

/// A fully annotated poem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPoem {
    pub id: String,
    pub author: Option<String>,
    pub title: Option<String>,
    /// Most frequent line meter
    pub meter_type: String,
    /// Word count per canonical pronunciation source
    pub annotation_sources: BTreeMap<PronunciationSource, usize>,
    pub stanzas: Vec<AnnotatedStanza>,
    /// Non-fatal validation findings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PoemFailure>,
}

impl AnnotatedPoem {
    /// Every line, in order.
    pub fn lines(&self) -> impl Iterator<Item = &AnnotatedLine> {
        self.stanzas.iter().flat_map(|s| s.lines.iter())
    }

    /// Every word record, in order.
    pub fn words(&self) -> impl Iterator<Item = &WordPhonology> {
        self.lines().flat_map(|l| l.phonology.iter())
    }

    pub fn degraded_lines(&self) -> usize {
        self.lines().filter(|l| l.degraded).count()
    }
}
