//! Annotation runner: orchestrates the analyzers over poems and batches.
//!
//! An [`Annotator`] owns one instance of every analyzer plus the validation
//! engine. [`Annotator::annotate_poem`] runs the stages in data-flow order:
//!
//! 1. validate the input record
//! 2. resolve every word of a line
//! 3. build the stress pattern and classify meter
//! 4. classify end-stopping and caesura from the text alone
//! 5. once every line of a stanza is resolved, cluster rhymes
//! 6. assemble the output record
//!
//! [`Annotator::annotate_batch`] fans poems out over rayon. Poems share
//! nothing but the read-only [`Lexicon`] snapshot, and results come back in
//! input order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use super::artifacts::{
    AnnotatedLine, AnnotatedPoem, AnnotatedStanza, InputLine, NormalizedPoem, WordPhonology,
};
use super::errors::PoemFailure;
use super::report::RunReport;
use super::validation::{ValidationEngine, ValidationReport};
use crate::errors::Result;
use crate::nlp::{VerseTokenizer, WordToken};
use crate::phonetics::{Lexicon, PhoneticResolver, ResolvedWord, Synthesizer};
use crate::prosody::{
    analyze_rhymes, dominant_meter, is_enjambed, stanza_type, BoundaryAnalyzer, LineBoundary,
    MeterClassifier, MeterMatch, RhymeUnit, StressPattern, StressPatternBuilder,
};
use crate::types::AnnotatorConfig;

// ---------------------------------------------------------------------------
// Tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for one annotation stage until the end of the
/// enclosing block.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("annotate_stage", stage = $name).entered();
    };
}

pub const STAGE_VALIDATE: &str = "validate";
pub const STAGE_RESOLVE: &str = "resolve";
pub const STAGE_METER: &str = "meter";
pub const STAGE_BOUNDARY: &str = "boundary";
pub const STAGE_RHYME: &str = "rhyme";
pub const STAGE_ASSEMBLE: &str = "assemble";

// ============================================================================
// Annotator
// ============================================================================

/// The annotation engine.
///
/// Cheap to share across threads: every field is immutable after
/// construction and the lexicon is reference counted.
pub struct Annotator {
    config: AnnotatorConfig,
    tokenizer: VerseTokenizer,
    resolver: PhoneticResolver,
    stress: StressPatternBuilder,
    meter: MeterClassifier,
    boundary: BoundaryAnalyzer,
    validator: ValidationEngine,
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .field("rules", &self.validator.rule_names())
            .finish_non_exhaustive()
    }
}

/// Per-line intermediate results, held until the stanza's rhyme barrier.
struct LineWork<'a> {
    input: &'a InputLine,
    text: String,
    tokens: Vec<WordToken>,
    words: Vec<ResolvedWord>,
    pattern: StressPattern,
    meter: MeterMatch,
    boundary: LineBoundary,
}

impl Annotator {
    /// Build an annotator over `lexicon`. Fails only on an invalid config.
    pub fn new(lexicon: Lexicon, config: AnnotatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: VerseTokenizer::new(),
            resolver: PhoneticResolver::new(lexicon, config.resolver.clone()),
            stress: StressPatternBuilder::new(config.stress.clone()),
            meter: MeterClassifier::new(config.meter.clone()),
            boundary: BoundaryAnalyzer::new(config.boundary.clone()),
            validator: ValidationEngine::with_line_limit(config.batch.max_line_chars),
            config,
        })
    }

    /// Replace the fallback synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.resolver = self.resolver.with_synthesizer(synthesizer);
        self
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PhoneticResolver {
        &self.resolver
    }

    /// Run only the validation rules.
    pub fn validate(&self, poem: &NormalizedPoem) -> ValidationReport {
        self.validator.validate(poem)
    }

    /// Annotate one poem.
    ///
    /// Returns the first validation error when the record is malformed.
    /// Lookup misses and synthesizer failures never fail a poem; they show
    /// up as `degraded` lines instead.
    pub fn annotate_poem(&self, poem: &NormalizedPoem) -> std::result::Result<AnnotatedPoem, PoemFailure> {
        let _poem_span = tracing::info_span!("poem", poem_id = %poem.id).entered();

        let warnings = {
            trace_stage!(STAGE_VALIDATE);
            let report = self.validator.validate(poem);
            if let Some(error) = report.errors().next() {
                return Err(error.clone());
            }
            report.warnings().cloned().collect::<Vec<_>>()
        };

        let stanzas: Vec<AnnotatedStanza> = poem
            .stanzas
            .iter()
            .enumerate()
            .map(|(index, lines)| self.annotate_stanza(index, lines))
            .collect();

        trace_stage!(STAGE_ASSEMBLE);
        let mut annotation_sources = BTreeMap::new();
        for line in stanzas.iter().flat_map(|s| s.lines.iter()) {
            for word in &line.phonology {
                *annotation_sources.entry(word.source).or_insert(0) += 1;
            }
        }
        let meter_type = dominant_meter(
            stanzas
                .iter()
                .flat_map(|s| s.lines.iter())
                .map(|l| l.meter.as_str()),
        );

        Ok(AnnotatedPoem {
            id: poem.id.clone(),
            author: poem.author.clone(),
            title: poem.title.clone(),
            meter_type,
            annotation_sources,
            stanzas,
            warnings,
        })
    }

    fn annotate_stanza(&self, stanza_index: usize, lines: &[InputLine]) -> AnnotatedStanza {
        let work: Vec<LineWork<'_>> = lines.iter().map(|line| self.analyze_line(line)).collect();

        // Every line is resolved by now.
        let (units, analysis) = {
            trace_stage!(STAGE_RHYME);
            let units: Vec<RhymeUnit> = work
                .iter()
                .map(|w| w.words.last().map_or(RhymeUnit::Placeholder, RhymeUnit::from_final_word))
                .collect();
            let analysis = analyze_rhymes(&units);
            (units, analysis)
        };

        trace_stage!(STAGE_ASSEMBLE);
        let last = work.len().saturating_sub(1);
        let annotated: Vec<AnnotatedLine> = work
            .into_iter()
            .zip(units)
            .zip(analysis.scheme.iter())
            .enumerate()
            .map(|(line_index, ((w, unit), group))| AnnotatedLine {
                stanza_index,
                line_index,
                raw: w.input.raw.clone(),
                phonology: w
                    .words
                    .iter()
                    .map(|word| WordPhonology {
                        word: word.surface().to_string(),
                        arpabet: word.arpabet(),
                        source: word.source(),
                    })
                    .collect(),
                stress_pattern: w.pattern.as_digits(),
                syllables: w.pattern.len(),
                meter: w.meter.label,
                meter_score: w.meter.score,
                meter_confidence: w.meter.confidence,
                rhyme_word: w.tokens.last().map(|t| t.text.clone()).unwrap_or_default(),
                rhyme_unit: unit.to_string(),
                rhyme_group: group.clone(),
                end_stopped: w.boundary.end_stopped,
                end_stop: w.boundary.end_stop,
                enjambment: is_enjambed(w.boundary.end_stopped, line_index == last),
                caesura: w.boundary.caesura,
                degraded: w.pattern.is_degraded(),
                normalized: w.text,
            })
            .collect();

        AnnotatedStanza {
            stanza_index,
            stanza_type: stanza_type(&analysis.scheme),
            rhyme_scheme: analysis.scheme,
            rhyme_pairs: analysis.pairs,
            lines: annotated,
        }
    }

    fn analyze_line<'a>(&self, input: &'a InputLine) -> LineWork<'a> {
        let text = input.text().into_owned();
        let tokens = self.tokenizer.tokenize(&text);

        let words: Vec<ResolvedWord> = {
            trace_stage!(STAGE_RESOLVE);
            tokens.iter().map(|t| self.resolver.resolve(&t.text)).collect()
        };

        let (pattern, meter) = {
            trace_stage!(STAGE_METER);
            let pattern = self.stress.build(&words);
            let meter = self.meter.classify(&pattern);
            (pattern, meter)
        };

        let boundary = {
            trace_stage!(STAGE_BOUNDARY);
            self.boundary.analyze(&text, &tokens)
        };

        LineWork {
            input,
            text,
            tokens,
            words,
            pattern,
            meter,
            boundary,
        }
    }

    /// Annotate many poems in parallel.
    ///
    /// Malformed poems are skipped and listed in the report; the run itself
    /// fails only if the thread pool cannot be built.
    pub fn annotate_batch(&self, poems: &[NormalizedPoem]) -> Result<BatchOutcome> {
        let _span = tracing::info_span!("annotate_batch", poems = poems.len()).entered();

        let results: Vec<std::result::Result<AnnotatedPoem, PoemFailure>> = self
            .config
            .batch
            .scoped(|| poems.par_iter().map(|poem| self.annotate_poem(poem)).collect())?;

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Ok(poem) => {
                    outcome.report.record_poem(&poem);
                    outcome.poems.push(poem);
                }
                Err(failure) => {
                    tracing::warn!(
                        poem_id = %failure.poem_id,
                        code = %failure.code,
                        path = %failure.path,
                        "skipping poem: {}",
                        failure.message
                    );
                    outcome.report.record_failure(failure);
                }
            }
        }

        let report = &outcome.report;
        tracing::info!(
            annotated = report.poems_annotated,
            skipped = report.poems_skipped,
            lines = report.lines,
            degraded_lines = report.degraded_lines,
            unresolved_words = report.unresolved_words,
            "batch complete"
        );
        Ok(outcome)
    }
}

/// Annotated poems of a batch, in input order, plus the run report.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub poems: Vec<AnnotatedPoem>,
    pub report: RunReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonetics::PronouncingDictionary;
    use crate::pipeline::error_code::ErrorCode;
    use crate::prosody::{EndStop, IRREGULAR};
    use crate::types::PronunciationSource;

    const DICT: &str = "\
SHALL  SH AE1 L
I  AY1
COMPARE  K AH0 M P EH1 R
THEE  DH IY1
TO  T UW1
A  AH0
SUMMER'S  S AH1 M ER0 Z
DAY  D EY1
AWAY  AH0 W EY1
THOU  DH AW1
ART  AA1 R T
FAIR  F EH1 R
";

    fn annotator(config: AnnotatorConfig) -> Annotator {
        let dict = PronouncingDictionary::parse(DICT).unwrap();
        Annotator::new(Lexicon::with_builtin_overrides(dict), config).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let dict = PronouncingDictionary::parse(DICT).unwrap();
        let result = Annotator::new(
            Lexicon::with_builtin_overrides(dict),
            AnnotatorConfig::new().with_min_score(0.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_annotates_pentameter_line() {
        let poem = NormalizedPoem::from_text("s18", &[vec!["Shall I compare thee to a summer's day?"]]);
        let out = annotator(AnnotatorConfig::default()).annotate_poem(&poem).unwrap();

        let line = &out.stanzas[0].lines[0];
        assert_eq!(line.stress_pattern, "0001000101");
        assert_eq!(line.syllables, 10);
        assert_eq!(line.meter, "iambic_pentameter");
        assert!((line.meter_score - 0.8).abs() < 1e-10);
        assert_eq!(line.end_stop, EndStop::Hard);
        assert!(line.end_stopped);
        assert!(!line.enjambment);
        assert_eq!(line.caesura, None);
        assert_eq!(line.rhyme_word, "day");
        assert_eq!(line.rhyme_unit, "EY1");
        assert!(!line.degraded);
        assert_eq!(out.meter_type, "iambic_pentameter");
        assert_eq!(out.annotation_sources[&PronunciationSource::PrimaryDictionary], 8);
        assert_eq!(out.stanzas[0].stanza_type, "monostich");
    }

    #[test]
    fn test_rhyme_and_enjambment_within_stanza() {
        let poem = NormalizedPoem::from_text("p", &[vec!["Thou art a summer's day", "Away"]]);
        let out = annotator(AnnotatorConfig::default()).annotate_poem(&poem).unwrap();

        let stanza = &out.stanzas[0];
        assert_eq!(stanza.rhyme_scheme, vec!["A", "A"]);
        assert_eq!(stanza.rhyme_pairs, vec![(0, 1)]);
        assert_eq!(stanza.stanza_type, "couplet");
        // No closing punctuation: the first line runs on, the last never does.
        assert!(stanza.lines[0].enjambment);
        assert!(!stanza.lines[1].enjambment);
    }

    #[test]
    fn test_synthesized_word_degrades_line() {
        let poem = NormalizedPoem::from_text("p", &[vec!["Thou'rt fair"]]);
        let out = annotator(AnnotatorConfig::default()).annotate_poem(&poem).unwrap();

        let line = &out.stanzas[0].lines[0];
        assert!(line.degraded);
        assert_eq!(line.phonology[0].source, PronunciationSource::RuleSynthesized);
        assert!(line.meter_confidence <= line.meter_score * 0.5 + 1e-10);
        assert_eq!(out.annotation_sources[&PronunciationSource::RuleSynthesized], 1);
    }

    #[test]
    fn test_unresolved_word_without_synthesizer() {
        let poem = NormalizedPoem::from_text("p", &[vec!["Xyzzy day"]]);
        let out = annotator(AnnotatorConfig::default().with_synthesizer(false))
            .annotate_poem(&poem)
            .unwrap();

        let line = &out.stanzas[0].lines[0];
        assert!(line.degraded);
        assert_eq!(line.phonology[0].source, PronunciationSource::Unresolved);
        assert_eq!(line.phonology[0].arpabet.len(), 1);
        assert_eq!(line.stress_pattern, "1");
    }

    #[test]
    fn test_unresolved_final_word_is_rhyme_placeholder() {
        let poem = NormalizedPoem::from_text("p", &[vec!["Xyzzy", "Xyzzy"]]);
        let out = annotator(AnnotatorConfig::default().with_synthesizer(false))
            .annotate_poem(&poem)
            .unwrap();

        let stanza = &out.stanzas[0];
        assert_eq!(stanza.rhyme_scheme, vec!["A", "B"]);
        assert!(stanza.rhyme_pairs.is_empty());
        assert_eq!(stanza.lines[0].rhyme_unit, "?");
        assert_eq!(stanza.lines[0].meter, "unknown");
        assert_eq!(out.meter_type, IRREGULAR);
    }

    #[test]
    fn test_malformed_poem_fails_with_path() {
        let poem = NormalizedPoem::from_text("bad", &[vec!["Shall I", "..."]]);
        let err = annotator(AnnotatorConfig::default()).annotate_poem(&poem).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyLine);
        assert_eq!(err.path, "/stanzas/0/1");
        assert_eq!(err.poem_id, "bad");
    }

    #[test]
    fn test_warnings_are_carried() {
        let poem = NormalizedPoem::new("p", vec![vec![InputLine::raw("Shall  I")]]);
        let out = annotator(AnnotatorConfig::default()).annotate_poem(&poem).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].code, ErrorCode::MissingNormalized);
        assert_eq!(out.stanzas[0].lines[0].normalized, "Shall I");
        assert_eq!(out.stanzas[0].lines[0].raw, "Shall  I");
    }

    #[test]
    fn test_batch_preserves_order_and_skips() {
        let poems = vec![
            NormalizedPoem::from_text("one", &[vec!["Thou art fair"]]),
            NormalizedPoem::new("empty", vec![]),
            NormalizedPoem::from_text("two", &[vec!["Away"]]),
        ];
        let annotator = annotator(AnnotatorConfig::default().with_max_threads(2));
        let outcome = annotator.annotate_batch(&poems).unwrap();

        let ids: Vec<&str> = outcome.poems.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two"]);
        assert_eq!(outcome.report.poems_total, 3);
        assert_eq!(outcome.report.poems_skipped, 1);
        assert_eq!(outcome.report.failures[0].poem_id, "empty");
        assert_eq!(outcome.report.lines, 2);
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let poem = NormalizedPoem::from_text(
            "p",
            &[vec!["Shall I compare thee to a summer's day?", "Thou art fair, away"]],
        );
        let annotator = annotator(AnnotatorConfig::default());
        let first = serde_json::to_string(&annotator.annotate_poem(&poem).unwrap()).unwrap();
        let second = serde_json::to_string(&annotator.annotate_poem(&poem).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
