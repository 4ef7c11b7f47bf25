//! Prosodic analysis: stress, meter, rhyme, line boundaries, and stanza form.

pub mod boundary;
pub mod meter;
pub mod rhyme;
pub mod stanza;
pub mod stress;

pub use boundary::{is_enjambed, BoundaryAnalyzer, Caesura, EndStop, LineBoundary};
pub use meter::{dominant_meter, Foot, MeterClassifier, MeterMatch, MeterTemplate, IRREGULAR, UNKNOWN};
pub use rhyme::{analyze_rhymes, rhyme_label, RhymeAnalysis, RhymeUnit};
pub use stanza::stanza_type;
pub use stress::{StressPattern, StressPatternBuilder};
