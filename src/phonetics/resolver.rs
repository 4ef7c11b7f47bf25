//! Phonetic resolution
//!
//! Maps a surface word to tagged pronunciation candidates. Sources are tried
//! in a fixed order and the first that yields anything wins:
//!
//! 1. the primary dictionary, by exact key
//! 2. the manual override table
//! 3. dictionary-derived verse morphology ([`morphology::derive`]), tagged
//!    `derived_morphology`
//! 4. the fallback synthesizer, within its time budget
//! 5. an empty placeholder tagged `unresolved`
//!
//! Selecting the canonical candidate is a separate pure function
//! ([`select_candidate`]) so the policy never depends on resolver state.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::arpabet::Pronunciation;
use super::g2p::{RuleSynthesizer, Synthesizer};
use super::lexicon::Lexicon;
use super::morphology;
use crate::errors::SynthesisError;
use crate::nlp::normalize_key;
use crate::types::{PronunciationSource, ResolverConfig, WordStatus};

// ============================================================================
// Candidates
// ============================================================================

/// A pronunciation tagged with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub pronunciation: Pronunciation,
    pub source: PronunciationSource,
}

impl Candidate {
    pub fn new(pronunciation: Pronunciation, source: PronunciationSource) -> Self {
        Self {
            pronunciation,
            source,
        }
    }

    /// The degraded-marker placeholder for a word nothing could pronounce.
    pub fn unresolved() -> Self {
        Self::new(Pronunciation::empty(), PronunciationSource::Unresolved)
    }
}

/// Index of the canonical candidate: lowest source priority, then earliest.
pub fn select_candidate(candidates: &[Candidate]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by_key(|(index, candidate)| (candidate.source.priority(), *index))
        .map(|(index, _)| index)
}

/// One word after resolution. Always carries at least one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWord {
    surface: String,
    key: String,
    candidates: Vec<Candidate>,
    selected: usize,
}

impl ResolvedWord {
    /// Build a resolved word; an empty candidate list becomes the
    /// unresolved placeholder.
    pub fn new(surface: impl Into<String>, key: impl Into<String>, mut candidates: Vec<Candidate>) -> Self {
        if candidates.is_empty() {
            candidates.push(Candidate::unresolved());
        }
        let selected = select_candidate(&candidates).unwrap_or(0);
        Self {
            surface: surface.into(),
            key: key.into(),
            candidates,
            selected,
        }
    }

    /// The word as it appears in the line
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// The normalized lookup key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The candidate chosen by [`select_candidate`].
    pub fn canonical(&self) -> &Candidate {
        &self.candidates[self.selected]
    }

    pub fn pronunciation(&self) -> &Pronunciation {
        &self.canonical().pronunciation
    }

    pub fn source(&self) -> PronunciationSource {
        self.canonical().source
    }

    pub fn status(&self) -> WordStatus {
        WordStatus::from_source(self.source())
    }

    /// Syllables contributed by the canonical pronunciation.
    pub fn syllable_count(&self) -> usize {
        self.pronunciation().syllable_count()
    }

    /// Candidate pronunciations as ARPAbet strings, canonical first.
    pub fn arpabet(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.candidates.len());
        out.push(self.pronunciation().to_string());
        out.extend(
            self.candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != self.selected)
                .map(|(_, c)| c.pronunciation.to_string()),
        );
        out
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves surface words against a shared [`Lexicon`] snapshot.
///
/// Resolution of one word never depends on any other word: the resolver
/// holds no mutable state.
#[derive(Clone)]
pub struct PhoneticResolver {
    lexicon: Lexicon,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    config: ResolverConfig,
}

impl fmt::Debug for PhoneticResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneticResolver")
            .field("lexicon", &self.lexicon)
            .field("synthesizer", &self.synthesizer.as_ref().map(|s| s.name()))
            .field("config", &self.config)
            .finish()
    }
}

impl PhoneticResolver {
    /// A resolver using the built-in [`RuleSynthesizer`] when the config
    /// enables synthesis.
    pub fn new(lexicon: Lexicon, config: ResolverConfig) -> Self {
        let synthesizer: Option<Arc<dyn Synthesizer>> = if config.enable_synthesizer {
            Some(Arc::new(RuleSynthesizer::new()))
        } else {
            None
        };
        Self {
            lexicon,
            synthesizer,
            config,
        }
    }

    /// Replace the fallback synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one surface word.
    pub fn resolve(&self, surface: &str) -> ResolvedWord {
        let key = normalize_key(surface);
        let candidates = self.candidates_for(&key);
        ResolvedWord::new(surface, key, candidates)
    }

    fn candidates_for(&self, key: &str) -> Vec<Candidate> {
        if key.is_empty() {
            return vec![Candidate::unresolved()];
        }
        let dictionary = self.lexicon.dictionary();

        if let Some(prons) = dictionary.lookup(key) {
            let mut out: Vec<Candidate> = prons
                .iter()
                .cloned()
                .map(|p| Candidate::new(p, PronunciationSource::PrimaryDictionary))
                .collect();
            // The syllabic reading is an alternative; the dictionary's first
            // entry stays canonical.
            if self.config.syllabic_ed {
                if let Some(variant) = prons
                    .first()
                    .and_then(|first| morphology::syllabic_ed(key, first, dictionary))
                {
                    out.push(Candidate::new(variant, PronunciationSource::DerivedMorphology));
                }
            }
            return out;
        }

        if let Some(prons) = self.lexicon.overrides().lookup(key) {
            return prons
                .iter()
                .cloned()
                .map(|p| Candidate::new(p, PronunciationSource::ManualOverride))
                .collect();
        }

        if let Some(derivation) = morphology::derive(key, dictionary) {
            tracing::debug!(key, rule = derivation.rule.as_str(), "derived pronunciation");
            return derivation
                .pronunciations
                .into_iter()
                .map(|p| Candidate::new(p, PronunciationSource::DerivedMorphology))
                .collect();
        }

        if let Some(synthesizer) = &self.synthesizer {
            match self.synthesize(synthesizer, key) {
                Ok(pronunciation) => {
                    tracing::debug!(key, pronunciation = %pronunciation, "synthesized pronunciation");
                    return vec![Candidate::new(
                        pronunciation,
                        PronunciationSource::RuleSynthesized,
                    )];
                }
                Err(err @ SynthesisError::DeadlineExceeded { .. }) => {
                    tracing::warn!(key, error = %err, "synthesizer timed out");
                }
                Err(err) => {
                    tracing::debug!(key, error = %err, "synthesizer failed");
                }
            }
        }

        vec![Candidate::unresolved()]
    }

    /// Run the synthesizer under the per-word budget.
    ///
    /// The call runs on a detached thread so a synthesizer that ignores its
    /// deadline cannot hold up the caller; once the budget lapses the word is
    /// a timeout and whatever the thread produces later is dropped.
    fn synthesize(
        &self,
        synthesizer: &Arc<dyn Synthesizer>,
        key: &str,
    ) -> Result<Pronunciation, SynthesisError> {
        let budget = self.config.synthesizer_budget();
        let deadline = Instant::now() + budget;
        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(synthesizer);
        let word = key.to_string();

        thread::Builder::new()
            .name("verse-synth".to_string())
            .spawn(move || {
                // The receiver is gone if the budget already lapsed.
                let _ = tx.send(worker.synthesize(&word, deadline));
            })
            .map_err(|err| SynthesisError::Failed(format!("cannot start synthesizer: {err}")))?;

        let pronunciation = match rx.recv_timeout(budget) {
            Ok(result) => result?,
            Err(RecvTimeoutError::Timeout) => {
                return Err(SynthesisError::DeadlineExceeded {
                    word: key.to_string(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(SynthesisError::Failed(format!(
                    "synthesizer stopped without a result for {key:?}"
                )));
            }
        };
        if pronunciation.is_empty() {
            return Err(SynthesisError::Failed(format!(
                "empty pronunciation for {key:?}"
            )));
        }
        Ok(pronunciation)
    }
}
