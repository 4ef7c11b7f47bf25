//! Core types for verse_annotate
//!
//! This module defines the small value types shared by every stage (stress
//! levels, pronunciation sources, word status) and the annotator
//! configuration.

use crate::errors::{AnnotateError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Stress
// ============================================================================

/// Lexical stress level of a vowel nucleus, as encoded by ARPAbet digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stress {
    /// Digit `0`
    Unstressed,
    /// Digit `1`
    Primary,
    /// Digit `2`
    Secondary,
}

impl Stress {
    /// Parse an ARPAbet stress digit.
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Stress::Unstressed),
            '1' => Some(Stress::Primary),
            '2' => Some(Stress::Secondary),
            _ => None,
        }
    }

    /// The ARPAbet digit for this level.
    pub fn as_digit(self) -> char {
        match self {
            Stress::Unstressed => '0',
            Stress::Primary => '1',
            Stress::Secondary => '2',
        }
    }

    /// Binary metrical reading of this level.
    ///
    /// Secondary stress counts as stressed only when `secondary_as_stressed`
    /// is set.
    pub fn is_metrically_stressed(self, secondary_as_stressed: bool) -> bool {
        match self {
            Stress::Primary => true,
            Stress::Secondary => secondary_as_stressed,
            Stress::Unstressed => false,
        }
    }
}

// ============================================================================
// Pronunciation source
// ============================================================================

/// Where a pronunciation candidate came from.
///
/// The declaration order is the selection priority: when a word carries
/// candidates from several sources, the earliest source wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronunciationSource {
    /// The primary pronunciation dictionary
    PrimaryDictionary,
    /// The curated manual-override table
    ManualOverride,
    /// Derived from dictionary entries by verse morphology (`lov'd`, `lovèd`)
    DerivedMorphology,
    /// The rule-based grapheme-to-phoneme fallback
    RuleSynthesized,
    /// Placeholder for a word no source could pronounce
    Unresolved,
}

impl PronunciationSource {
    /// Selection rank; lower wins.
    pub fn priority(self) -> u8 {
        match self {
            PronunciationSource::PrimaryDictionary => 0,
            PronunciationSource::ManualOverride => 1,
            PronunciationSource::DerivedMorphology => 2,
            PronunciationSource::RuleSynthesized => 3,
            PronunciationSource::Unresolved => 4,
        }
    }

    /// Stable snake_case name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            PronunciationSource::PrimaryDictionary => "primary_dictionary",
            PronunciationSource::ManualOverride => "manual_override",
            PronunciationSource::DerivedMorphology => "derived_morphology",
            PronunciationSource::RuleSynthesized => "rule_synthesized",
            PronunciationSource::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for PronunciationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence of a word's phonology after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
    /// Pronounced from the dictionary, the override table, or a form
    /// derived from dictionary entries
    Resolved,
    /// Pronounced only by the fallback synthesizer
    Degraded,
    /// No source produced a pronunciation
    Unresolved,
}

impl WordStatus {
    pub fn from_source(source: PronunciationSource) -> Self {
        match source {
            PronunciationSource::PrimaryDictionary
            | PronunciationSource::ManualOverride
            | PronunciationSource::DerivedMorphology => WordStatus::Resolved,
            PronunciationSource::RuleSynthesized => WordStatus::Degraded,
            PronunciationSource::Unresolved => WordStatus::Unresolved,
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, WordStatus::Resolved)
    }

    /// Whether this word lowers the confidence of its line.
    pub fn is_degraded(self) -> bool {
        !matches!(self, WordStatus::Resolved)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Phonetic resolver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fall back to the rule-based synthesizer for unknown words
    pub enable_synthesizer: bool,
    /// Per-word time allowance for the synthesizer, in milliseconds
    pub synthesizer_budget_ms: u64,
    /// Treat a fully spelled `-ed` ending as its own syllable (`lovèd`)
    pub syllabic_ed: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enable_synthesizer: true,
            synthesizer_budget_ms: 2_000,
            syllabic_ed: true,
        }
    }
}

impl ResolverConfig {
    pub fn synthesizer_budget(&self) -> Duration {
        Duration::from_millis(self.synthesizer_budget_ms)
    }
}

/// Stress pattern builder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Demote monosyllabic function words to unstressed
    pub demote_function_words: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            demote_function_words: true,
        }
    }
}

/// Meter classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Minimum template score for a named meter; below it the line is irregular
    pub min_score: f64,
    /// Multiplier applied to the confidence of degraded lines
    pub degraded_confidence_factor: f64,
    /// Whether secondary stress reads as a metrical beat
    pub secondary_as_stressed: bool,
    /// Longest line, in feet, that templates are generated for
    pub max_feet: usize,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            min_score: 0.75,
            degraded_confidence_factor: 0.5,
            secondary_as_stressed: true,
            max_feet: 8,
        }
    }
}

/// Punctuation / boundary analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Fraction of the line excluded at each edge when looking for a caesura
    pub caesura_margin: f64,
    /// A trailing comma (a soft stop) counts as end-stopping
    pub comma_is_end_stop: bool,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            caesura_margin: 0.25,
            comma_is_end_stop: true,
        }
    }
}

/// Batch execution settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Rayon worker threads (`None` = global pool)
    pub max_threads: Option<usize>,
    /// Warn about lines longer than this many characters (0 = off)
    pub max_line_chars: usize,
}

impl BatchConfig {
    /// Execute `f` within a scoped rayon pool when a thread limit is set.
    pub fn scoped<R: Send>(&self, f: impl FnOnce() -> R + Send) -> Result<R> {
        match self.max_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| AnnotateError::internal(e.to_string()))?;
                Ok(pool.install(f))
            }
            None => Ok(f()),
        }
    }
}

/// Configuration for the annotation engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub resolver: ResolverConfig,
    pub stress: StressConfig,
    pub meter: MeterConfig,
    pub boundary: BoundaryConfig,
    pub batch: BatchConfig,
}

impl AnnotatorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.meter.min_score > 0.0 && self.meter.min_score <= 1.0) {
            return Err(AnnotateError::invalid_config(format!(
                "meter.min_score must be in (0, 1], got {}",
                self.meter.min_score
            )));
        }

        if !(0.0..=1.0).contains(&self.meter.degraded_confidence_factor) {
            return Err(AnnotateError::invalid_config(format!(
                "meter.degraded_confidence_factor must be between 0 and 1, got {}",
                self.meter.degraded_confidence_factor
            )));
        }

        if self.meter.max_feet == 0 {
            return Err(AnnotateError::invalid_config("meter.max_feet must be > 0"));
        }

        if !(0.0..0.5).contains(&self.boundary.caesura_margin) {
            return Err(AnnotateError::invalid_config(format!(
                "boundary.caesura_margin must be in [0, 0.5), got {}",
                self.boundary.caesura_margin
            )));
        }

        if self.resolver.enable_synthesizer && self.resolver.synthesizer_budget_ms == 0 {
            return Err(AnnotateError::invalid_config(
                "resolver.synthesizer_budget_ms must be > 0 when the synthesizer is enabled",
            ));
        }

        if self.batch.max_threads == Some(0) {
            return Err(AnnotateError::invalid_config("batch.max_threads must be > 0"));
        }

        Ok(())
    }

    /// Builder method: set the minimum meter template score
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.meter.min_score = min_score;
        self
    }

    /// Builder method: set the confidence multiplier for degraded lines
    pub fn with_degraded_confidence_factor(mut self, factor: f64) -> Self {
        self.meter.degraded_confidence_factor = factor;
        self
    }

    /// Builder method: set the caesura edge margin
    pub fn with_caesura_margin(mut self, margin: f64) -> Self {
        self.boundary.caesura_margin = margin;
        self
    }

    /// Builder method: whether a trailing comma end-stops a line
    pub fn with_comma_is_end_stop(mut self, enabled: bool) -> Self {
        self.boundary.comma_is_end_stop = enabled;
        self
    }

    /// Builder method: enable or disable the fallback synthesizer
    pub fn with_synthesizer(mut self, enabled: bool) -> Self {
        self.resolver.enable_synthesizer = enabled;
        self
    }

    /// Builder method: set the per-word synthesizer budget
    pub fn with_synthesizer_budget(mut self, budget: Duration) -> Self {
        self.resolver.synthesizer_budget_ms = budget.as_millis() as u64;
        self
    }

    /// Builder method: toggle syllabic `-ed`
    pub fn with_syllabic_ed(mut self, enabled: bool) -> Self {
        self.resolver.syllabic_ed = enabled;
        self
    }

    /// Builder method: toggle function-word demotion
    pub fn with_demote_function_words(mut self, enabled: bool) -> Self {
        self.stress.demote_function_words = enabled;
        self
    }

    /// Builder method: set the batch thread limit
    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.batch.max_threads = Some(threads);
        self
    }

    /// Builder method: set the long-line warning threshold
    pub fn with_max_line_chars(mut self, chars: usize) -> Self {
        self.batch.max_line_chars = chars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_digits() {
        for digit in ['0', '1', '2'] {
            let stress = Stress::from_digit(digit).unwrap();
            assert_eq!(stress.as_digit(), digit);
        }
        assert_eq!(Stress::from_digit('3'), None);
    }

    #[test]
    fn test_secondary_stress_reading() {
        assert!(Stress::Secondary.is_metrically_stressed(true));
        assert!(!Stress::Secondary.is_metrically_stressed(false));
        assert!(Stress::Primary.is_metrically_stressed(false));
        assert!(!Stress::Unstressed.is_metrically_stressed(true));
    }

    #[test]
    fn test_source_priority_matches_declaration_order() {
        let mut sources = vec![
            PronunciationSource::Unresolved,
            PronunciationSource::RuleSynthesized,
            PronunciationSource::DerivedMorphology,
            PronunciationSource::PrimaryDictionary,
            PronunciationSource::ManualOverride,
        ];
        sources.sort();
        let ranks: Vec<u8> = sources.iter().map(|s| s.priority()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_source_serde_names() {
        let json = serde_json::to_string(&PronunciationSource::RuleSynthesized).unwrap();
        assert_eq!(json, r#""rule_synthesized""#);
        assert_eq!(PronunciationSource::PrimaryDictionary.to_string(), "primary_dictionary");
        assert_eq!(PronunciationSource::DerivedMorphology.to_string(), "derived_morphology");
    }

    #[test]
    fn test_word_status_from_source() {
        assert_eq!(
            WordStatus::from_source(PronunciationSource::ManualOverride),
            WordStatus::Resolved
        );
        assert!(WordStatus::from_source(PronunciationSource::DerivedMorphology).is_resolved());
        assert!(WordStatus::from_source(PronunciationSource::RuleSynthesized).is_degraded());
        assert!(WordStatus::from_source(PronunciationSource::Unresolved).is_degraded());
    }

    #[test]
    fn test_config_validation() {
        let config = AnnotatorConfig::default();
        assert!(config.validate().is_ok());

        assert!(AnnotatorConfig::default().with_min_score(0.0).validate().is_err());
        assert!(AnnotatorConfig::default().with_min_score(1.5).validate().is_err());
        assert!(AnnotatorConfig::default()
            .with_caesura_margin(0.5)
            .validate()
            .is_err());
        assert!(AnnotatorConfig::default()
            .with_degraded_confidence_factor(-0.1)
            .validate()
            .is_err());
        assert!(AnnotatorConfig::default().with_max_threads(0).validate().is_err());
        assert!(AnnotatorConfig::default()
            .with_synthesizer_budget(Duration::ZERO)
            .validate()
            .is_err());
        // A zero budget is fine once the synthesizer is off.
        assert!(AnnotatorConfig::default()
            .with_synthesizer_budget(Duration::ZERO)
            .with_synthesizer(false)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg = AnnotatorConfig::from_json(r#"{"meter": {"min_score": 0.8}}"#).unwrap();
        assert!((cfg.meter.min_score - 0.8).abs() < 1e-12);
        assert!((cfg.meter.degraded_confidence_factor - 0.5).abs() < 1e-12);
        assert!(cfg.boundary.comma_is_end_stop);
        assert!(cfg.resolver.syllabic_ed);
    }

    #[test]
    fn test_config_from_json_rejects_invalid() {
        let err = AnnotatorConfig::from_json(r#"{"boundary": {"caesura_margin": 0.9}}"#).unwrap_err();
        assert!(matches!(err, AnnotateError::InvalidConfig { .. }));
    }

    #[test]
    fn test_batch_scoped_pool() {
        let batch = BatchConfig {
            max_threads: Some(2),
            max_line_chars: 0,
        };
        let threads = batch.scoped(rayon::current_num_threads).unwrap();
        assert_eq!(threads, 2);
    }
}
