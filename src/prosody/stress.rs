//! Stress pattern construction
//!
//! Concatenates the per-syllable stress of every word's canonical
//! pronunciation into one sequence for the line. Elided spellings already
//! carry their shortened pronunciations, so the syllable count here is the
//! metrical one.

use crate::nlp::is_function_word;
use crate::phonetics::ResolvedWord;
use crate::types::{Stress, StressConfig};

/// One stress level per syllable across a line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StressPattern {
    stresses: Vec<Stress>,
    degraded: bool,
}

impl StressPattern {
    pub fn new(stresses: Vec<Stress>, degraded: bool) -> Self {
        Self { stresses, degraded }
    }

    /// Parse a digit string such as `"0101"`. Non-digit characters are an
    /// error (`None`).
    pub fn from_digits(digits: &str, degraded: bool) -> Option<Self> {
        digits
            .chars()
            .map(Stress::from_digit)
            .collect::<Option<Vec<_>>>()
            .map(|stresses| Self::new(stresses, degraded))
    }

    pub fn stresses(&self) -> &[Stress] {
        &self.stresses
    }

    /// Number of syllables
    pub fn len(&self) -> usize {
        self.stresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stresses.is_empty()
    }

    /// Whether any word behind this pattern came from a fallback source or
    /// contributed no syllables.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// ARPAbet digits, one per syllable (`"0101010101"`).
    pub fn as_digits(&self) -> String {
        self.stresses.iter().map(|s| s.as_digit()).collect()
    }

    /// Binary metrical reading: `true` for a beat.
    pub fn beats(&self, secondary_as_stressed: bool) -> Vec<bool> {
        self.stresses
            .iter()
            .map(|s| s.is_metrically_stressed(secondary_as_stressed))
            .collect()
    }
}

/// Builds a line's [`StressPattern`] from its resolved words.
#[derive(Debug, Clone, Default)]
pub struct StressPatternBuilder {
    config: StressConfig,
}

impl StressPatternBuilder {
    pub fn new(config: StressConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, words: &[ResolvedWord]) -> StressPattern {
        let mut stresses = Vec::new();
        let mut degraded = false;

        for word in words {
            let syllables = word.syllable_count();
            if word.status().is_degraded() {
                degraded = true;
            }
            // A resolved clitic like th' legitimately has no nucleus.
            if syllables == 0 && !(word.status().is_resolved() && word.key().contains('\'')) {
                degraded = true;
            }

            let demote = self.config.demote_function_words
                && syllables == 1
                && is_function_word(word.key());

            stresses.extend(word.pronunciation().stresses().map(|stress| {
                if demote {
                    Stress::Unstressed
                } else {
                    stress
                }
            }));
        }

        StressPattern::new(stresses, degraded)
    }
}
