//! # verse_annotate
//!
//! Phonological, metrical, and structural annotation of historical English
//! verse.
//!
//! Given normalized lines grouped into stanzas, the engine derives per-word
//! pronunciations, stress patterns, meter, rhyme groups, end-stopping,
//! caesura, and enjambment.
//!
//! ## Features
//!
//! - **Layered pronunciation sources**: a CMU-format dictionary, a manual
//!   override table for archaic forms, verse morphology (`lov'd`, `heav'n`),
//!   and a time-bounded rule-based fallback
//! - **Explicit degradation**: every field is always populated; lines that
//!   relied on a fallback carry `degraded = true` and lowered confidence
//! - **Poem-parallel batches** over one shared, immutable lexicon snapshot
//! - **Deterministic output**: the same input and lexicon always produce
//!   byte-identical JSON
//!
//! ## Example
//!
//! ```rust
//! use verse_annotate::{Annotator, AnnotatorConfig, Lexicon, NormalizedPoem, PronouncingDictionary};
//!
//! let dict = PronouncingDictionary::parse("DAY  D EY1\nAWAY  AH0 W EY1\n").unwrap();
//! let annotator = Annotator::new(Lexicon::with_builtin_overrides(dict), AnnotatorConfig::default()).unwrap();
//!
//! let poem = NormalizedPoem::from_text("p", &[vec!["Day", "Away."]]);
//! let out = annotator.annotate_poem(&poem).unwrap();
//! assert_eq!(out.stanzas[0].rhyme_scheme, vec!["A", "A"]);
//! ```

pub mod corpus;
pub mod errors;
pub mod nlp;
pub mod phonetics;
pub mod pipeline;
pub mod prosody;
pub mod types;

// Re-export commonly used types
pub use errors::{AnnotateError, Result, SynthesisError};
pub use types::{
    AnnotatorConfig, BatchConfig, BoundaryConfig, MeterConfig, PronunciationSource,
    ResolverConfig, Stress, StressConfig, WordStatus,
};

// Re-export main functionality
pub use corpus::{annotate_corpus, CorpusOptions};
pub use nlp::{normalize_key, normalize_line, VerseTokenizer};
pub use phonetics::{
    Lexicon, OverrideTable, PhoneticResolver, PronouncingDictionary, Pronunciation,
    ResolvedWord, RuleSynthesizer, Synthesizer,
};
pub use pipeline::{
    AnnotatedLine, AnnotatedPoem, AnnotatedStanza, Annotator, BatchOutcome, ErrorCode, InputLine,
    NormalizedPoem, PoemFailure, RunReport, ValidationEngine, ValidationReport,
};
pub use prosody::{BoundaryAnalyzer, MeterClassifier, StressPatternBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
