//! Per-run statistics.
//!
//! A [`RunReport`] aggregates coverage and degradation counts over every
//! poem in a batch, plus the list of poems that were skipped and why. It is
//! the only place failures surface: a run never aborts on a bad poem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::artifacts::AnnotatedPoem;
use super::errors::PoemFailure;
use crate::prosody::IRREGULAR;
use crate::types::PronunciationSource;

/// Aggregated counts for one annotation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub poems_total: usize,
    pub poems_annotated: usize,
    pub poems_skipped: usize,
    /// Outputs that already existed and were left alone
    pub poems_already_done: usize,
    pub lines: usize,
    pub degraded_lines: usize,
    pub unresolved_words: usize,
    pub synthesized_words: usize,
    /// Words pronounced through verse morphology (`lov'd`, `heav'n`)
    pub derived_words: usize,
    pub irregular_lines: usize,
    pub end_stopped_lines: usize,
    pub enjambed_lines: usize,
    pub caesura_lines: usize,
    /// Validation warnings across all annotated poems
    pub warnings: usize,
    /// Line count per meter label
    pub meters: BTreeMap<String, usize>,
    /// Stanza count per stanza type
    pub stanza_types: BTreeMap<String, usize>,
    /// Why each skipped poem was skipped
    pub failures: Vec<PoemFailure>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one annotated poem into the totals.
    pub fn record_poem(&mut self, poem: &AnnotatedPoem) {
        self.poems_total += 1;
        self.poems_annotated += 1;
        self.warnings += poem.warnings.len();

        for stanza in &poem.stanzas {
            *self.stanza_types.entry(stanza.stanza_type.clone()).or_default() += 1;
        }

        for line in poem.lines() {
            self.lines += 1;
            self.degraded_lines += usize::from(line.degraded);
            self.irregular_lines += usize::from(line.meter == IRREGULAR);
            self.end_stopped_lines += usize::from(line.end_stopped);
            self.enjambed_lines += usize::from(line.enjambment);
            self.caesura_lines += usize::from(line.caesura.is_some());
            *self.meters.entry(line.meter.clone()).or_default() += 1;
        }

        for word in poem.words() {
            match word.source {
                PronunciationSource::Unresolved => self.unresolved_words += 1,
                PronunciationSource::RuleSynthesized => self.synthesized_words += 1,
                PronunciationSource::DerivedMorphology => self.derived_words += 1,
                _ => {}
            }
        }
    }

    /// Record a skipped poem.
    pub fn record_failure(&mut self, failure: PoemFailure) {
        self.poems_total += 1;
        self.poems_skipped += 1;
        self.failures.push(failure);
    }

    /// Record a poem whose output already exists.
    pub fn record_existing(&mut self) {
        self.poems_total += 1;
        self.poems_already_done += 1;
    }

    /// Fraction of lines flagged degraded, 0 for an empty run.
    pub fn degraded_ratio(&self) -> f64 {
        if self.lines == 0 {
            0.0
        } else {
            self.degraded_lines as f64 / self.lines as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::artifacts::{AnnotatedLine, AnnotatedStanza, WordPhonology};
    use crate::pipeline::error_code::ErrorCode;
    use crate::prosody::{Caesura, EndStop};

    fn line(meter: &str, degraded: bool, end_stopped: bool, source: PronunciationSource) -> AnnotatedLine {
        AnnotatedLine {
            stanza_index: 0,
            line_index: 0,
            raw: "x".into(),
            normalized: "x".into(),
            phonology: vec![WordPhonology {
                word: "x".into(),
                arpabet: vec![],
                source,
            }],
            stress_pattern: "1".into(),
            syllables: 1,
            meter: meter.into(),
            meter_score: 1.0,
            meter_confidence: 1.0,
            rhyme_word: "x".into(),
            rhyme_unit: "?".into(),
            rhyme_group: "A".into(),
            end_stopped,
            end_stop: if end_stopped { EndStop::Hard } else { EndStop::None },
            enjambment: !end_stopped,
            caesura: Some(Caesura {
                char_offset: 0,
                word_offset: 0,
            }),
            degraded,
        }
    }

    #[test]
    fn test_record_poem() {
        let poem = AnnotatedPoem {
            id: "p".into(),
            author: None,
            title: None,
            meter_type: "iambic_pentameter".into(),
            annotation_sources: BTreeMap::new(),
            stanzas: vec![AnnotatedStanza {
                stanza_index: 0,
                stanza_type: "couplet".into(),
                rhyme_scheme: vec!["A".into(), "B".into(), "C".into()],
                rhyme_pairs: vec![],
                lines: vec![
                    line("iambic_pentameter", false, true, PronunciationSource::PrimaryDictionary),
                    line(IRREGULAR, true, false, PronunciationSource::RuleSynthesized),
                    line("iambic_pentameter", false, true, PronunciationSource::DerivedMorphology),
                ],
            }],
            warnings: vec![],
        };

        let mut report = RunReport::new();
        report.record_poem(&poem);
        assert_eq!(report.poems_annotated, 1);
        assert_eq!(report.lines, 3);
        assert_eq!(report.degraded_lines, 1);
        assert_eq!(report.irregular_lines, 1);
        assert_eq!(report.synthesized_words, 1);
        assert_eq!(report.derived_words, 1);
        assert_eq!(report.end_stopped_lines, 2);
        assert_eq!(report.enjambed_lines, 1);
        assert_eq!(report.caesura_lines, 3);
        assert_eq!(report.meters["iambic_pentameter"], 2);
        assert_eq!(report.stanza_types["couplet"], 1);
        assert!((report.degraded_ratio() - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_record_failure() {
        let mut report = RunReport::new();
        report.record_failure(PoemFailure::new("p", ErrorCode::EmptyPoem, "/stanzas", "poem has no stanzas"));
        report.record_existing();
        assert_eq!(report.poems_total, 2);
        assert_eq!(report.poems_skipped, 1);
        assert_eq!(report.poems_already_done, 1);
        assert_eq!(report.degraded_ratio(), 0.0);
        assert_eq!(report.failures[0].code, ErrorCode::EmptyPoem);
    }
}
