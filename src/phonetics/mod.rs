//! Phonetic resolution: ARPAbet types, pronunciation sources, and the
//! resolver that reconciles them.

pub mod arpabet;
pub mod dictionary;
pub mod g2p;
pub mod lexicon;
pub mod morphology;
pub mod overrides;
pub mod resolver;

pub use arpabet::{Phoneme, Pronunciation};
pub use dictionary::PronouncingDictionary;
pub use g2p::{RuleSynthesizer, Synthesizer};
pub use lexicon::Lexicon;
pub use overrides::OverrideTable;
pub use resolver::{select_candidate, Candidate, PhoneticResolver, ResolvedWord};
