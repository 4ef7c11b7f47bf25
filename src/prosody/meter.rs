//! Meter classification
//!
//! A line's binary beat sequence is scored against every template in an
//! ordered table of accentual-syllabic meters. The score is the number of
//! positions where observed and template beats agree, divided by the longer
//! of the two sequences, so both extra and missing syllables cost.
//!
//! The best template wins if it reaches `min_score`; ties go to a template
//! whose length equals the observed syllable count, then to the earlier
//! table entry. Iambic meters come first in the table.

use serde::{Deserialize, Serialize};

use super::stress::StressPattern;
use crate::types::MeterConfig;

/// Label for a line whose best template misses the threshold.
pub const IRREGULAR: &str = "irregular";

/// Label for a line with no syllables to scan.
pub const UNKNOWN: &str = "unknown";

/// Two scores within this epsilon are considered tied.
const SCORE_EPSILON: f64 = 1e-10;

const LINE_LENGTHS: &[&str] = &[
    "monometer",
    "dimeter",
    "trimeter",
    "tetrameter",
    "pentameter",
    "hexameter",
    "heptameter",
    "octameter",
];

// ============================================================================
// Feet and templates
// ============================================================================

/// Metrical foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Foot {
    /// da-DUM
    Iamb,
    /// DUM-da
    Trochee,
    /// da-da-DUM
    Anapest,
    /// DUM-da-da
    Dactyl,
}

impl Foot {
    pub const ALL: [Foot; 4] = [Foot::Iamb, Foot::Trochee, Foot::Anapest, Foot::Dactyl];

    pub fn beats(self) -> &'static [bool] {
        match self {
            Foot::Iamb => &[false, true],
            Foot::Trochee => &[true, false],
            Foot::Anapest => &[false, false, true],
            Foot::Dactyl => &[true, false, false],
        }
    }

    pub fn adjective(self) -> &'static str {
        match self {
            Foot::Iamb => "iambic",
            Foot::Trochee => "trochaic",
            Foot::Anapest => "anapestic",
            Foot::Dactyl => "dactylic",
        }
    }

    /// Unstressed syllables a catalectic line of this foot may drop.
    fn catalexis(self) -> &'static [usize] {
        match self {
            Foot::Trochee => &[1],
            Foot::Dactyl => &[1, 2],
            Foot::Iamb | Foot::Anapest => &[],
        }
    }
}

/// One canonical line shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterTemplate {
    pub foot: Foot,
    pub feet: usize,
    /// Syllables dropped from the end (0 = acatalectic)
    pub truncated: usize,
    pub beats: Vec<bool>,
}

impl MeterTemplate {
    pub fn new(foot: Foot, feet: usize, truncated: usize) -> Self {
        let mut beats: Vec<bool> = foot.beats().repeat(feet);
        beats.truncate(beats.len().saturating_sub(truncated));
        Self {
            foot,
            feet,
            truncated,
            beats,
        }
    }

    pub fn syllables(&self) -> usize {
        self.beats.len()
    }

    /// `iambic_pentameter`, `trochaic_tetrameter_catalectic`.
    pub fn label(&self) -> String {
        let length = match LINE_LENGTHS.get(self.feet.wrapping_sub(1)) {
            Some(name) => (*name).to_string(),
            None => format!("{}_foot", self.feet),
        };
        let mut label = format!("{}_{}", self.foot.adjective(), length);
        if self.truncated > 0 {
            label.push_str("_catalectic");
        }
        label
    }

    /// Fraction of positions that agree, over the longer sequence.
    pub fn score(&self, observed: &[bool]) -> f64 {
        let denominator = self.beats.len().max(observed.len());
        if denominator == 0 {
            return 0.0;
        }
        let matches = self
            .beats
            .iter()
            .zip(observed)
            .filter(|(expected, actual)| expected == actual)
            .count();
        matches as f64 / denominator as f64
    }
}

/// The ordered template table for lines of up to `max_feet` feet.
pub fn template_table(max_feet: usize) -> Vec<MeterTemplate> {
    let mut table = Vec::new();
    for foot in Foot::ALL {
        for feet in 1..=max_feet {
            table.push(MeterTemplate::new(foot, feet, 0));
            for &dropped in foot.catalexis() {
                table.push(MeterTemplate::new(foot, feet, dropped));
            }
        }
    }
    // A one-foot catalectic dactyl is a bare stress, identical to a trochaic
    // or iambic fragment already in the table.
    table.retain(|t| t.syllables() >= 2);
    table
}

// ============================================================================
// Classification
// ============================================================================

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterMatch {
    /// Template label, `irregular`, or `unknown`
    pub label: String,
    /// Best template score in `[0, 1]`
    pub score: f64,
    /// Score, lowered for degraded lines
    pub confidence: f64,
    /// Observed syllables
    pub syllables: usize,
    /// Best template even when below threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest: Option<String>,
    pub degraded: bool,
}

impl MeterMatch {
    pub fn is_irregular(&self) -> bool {
        self.label == IRREGULAR
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN
    }
}

/// Matches stress patterns against the template table.
#[derive(Debug, Clone)]
pub struct MeterClassifier {
    config: MeterConfig,
    templates: Vec<MeterTemplate>,
}

impl MeterClassifier {
    pub fn new(config: MeterConfig) -> Self {
        let templates = template_table(config.max_feet);
        Self { config, templates }
    }

    pub fn templates(&self) -> &[MeterTemplate] {
        &self.templates
    }

    pub fn classify(&self, pattern: &StressPattern) -> MeterMatch {
        let degraded = pattern.is_degraded();
        let syllables = pattern.len();

        if pattern.is_empty() {
            return MeterMatch {
                label: UNKNOWN.to_string(),
                score: 0.0,
                confidence: 0.0,
                syllables,
                nearest: None,
                degraded,
            };
        }

        let observed = pattern.beats(self.config.secondary_as_stressed);
        let best = self.best_template(&observed);

        let (label, score, nearest) = match best {
            Some((template, score)) if score + SCORE_EPSILON >= self.config.min_score => {
                (template.label(), score, None)
            }
            Some((template, score)) => (IRREGULAR.to_string(), score, Some(template.label())),
            None => (IRREGULAR.to_string(), 0.0, None),
        };

        let confidence = if degraded {
            score * self.config.degraded_confidence_factor
        } else {
            score
        };

        MeterMatch {
            label,
            score,
            confidence,
            syllables,
            nearest,
            degraded,
        }
    }

    fn best_template(&self, observed: &[bool]) -> Option<(&MeterTemplate, f64)> {
        let mut best: Option<(&MeterTemplate, f64)> = None;
        for template in &self.templates {
            let score = template.score(observed);
            let replace = match best {
                None => true,
                Some((current, current_score)) => {
                    let diff = score - current_score;
                    if diff.abs() > SCORE_EPSILON {
                        diff > 0.0
                    } else {
                        template.syllables() == observed.len()
                            && current.syllables() != observed.len()
                    }
                }
            };
            if replace {
                best = Some((template, score));
            }
        }
        best
    }
}

impl Default for MeterClassifier {
    fn default() -> Self {
        Self::new(MeterConfig::default())
    }
}

/// The most frequent named meter among `labels`, ties to the first seen;
/// `irregular` when no line has one.
pub fn dominant_meter<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        if label == IRREGULAR || label == UNKNOWN {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((label, n));
        }
    }
    best.map_or_else(|| IRREGULAR.to_string(), |(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(digits: &str) -> MeterMatch {
        MeterClassifier::default().classify(&StressPattern::from_digits(digits, false).unwrap())
    }

    #[test]
    fn test_template_labels() {
        assert_eq!(MeterTemplate::new(Foot::Iamb, 5, 0).label(), "iambic_pentameter");
        assert_eq!(
            MeterTemplate::new(Foot::Trochee, 4, 1).label(),
            "trochaic_tetrameter_catalectic"
        );
        assert_eq!(MeterTemplate::new(Foot::Anapest, 9, 0).label(), "anapestic_9_foot");
        assert_eq!(MeterTemplate::new(Foot::Dactyl, 2, 2).syllables(), 4);
    }

    #[test]
    fn test_exact_iambic_pentameter() {
        let m = classify("0101010101");
        assert_eq!(m.label, "iambic_pentameter");
        assert!((m.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(m.syllables, 10);
    }

    #[test]
    fn test_tolerant_match() {
        // Shall I compare thee to a summer's day?
        let m = classify("0001000101");
        assert_eq!(m.label, "iambic_pentameter");
        assert!((m.score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_catalectic_trochaic() {
        // Tyger Tyger, burning bright
        let m = classify("1010101");
        assert_eq!(m.label, "trochaic_tetrameter_catalectic");
    }

    #[test]
    fn test_extra_syllable_costs() {
        let m = classify("010101011");
        assert_eq!(m.label, "iambic_tetrameter");
        assert!((m.score - 8.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_irregular_below_threshold() {
        let m = classify("1100110011");
        assert!(m.is_irregular());
        assert!(m.nearest.is_some());
        assert_eq!(m.syllables, 10);
    }

    #[test]
    fn test_empty_pattern_is_unknown() {
        let m = MeterClassifier::default().classify(&StressPattern::new(Vec::new(), true));
        assert!(m.is_unknown());
        assert_eq!(m.confidence, 0.0);
    }

    #[test]
    fn test_degraded_lowers_confidence() {
        let pattern = StressPattern::from_digits("0101010101", true).unwrap();
        let m = MeterClassifier::default().classify(&pattern);
        assert_eq!(m.label, "iambic_pentameter");
        assert!(m.degraded);
        assert!((m.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_secondary_stress_reading() {
        let pattern = StressPattern::from_digits("0102", false).unwrap();
        let strict = MeterClassifier::new(MeterConfig {
            secondary_as_stressed: false,
            ..MeterConfig::default()
        });
        assert_eq!(MeterClassifier::default().classify(&pattern).label, "iambic_dimeter");
        assert_ne!(strict.classify(&pattern).score, 1.0);
    }

    #[test]
    fn test_table_has_no_degenerate_templates() {
        let table = template_table(8);
        assert!(table.iter().all(|t| t.syllables() >= 2));
        assert_eq!(table[0].label(), "iambic_monometer");
    }

    #[test]
    fn test_dominant_meter() {
        let labels = ["iambic_pentameter", "irregular", "iambic_tetrameter", "iambic_pentameter"];
        assert_eq!(dominant_meter(labels), "iambic_pentameter");
        assert_eq!(dominant_meter(["a_meter", "b_meter"]), "a_meter");
        assert_eq!(dominant_meter(["irregular", "unknown"]), IRREGULAR);
    }
}
