//! ARPAbet phonemes and pronunciations.
//!
//! A [`Pronunciation`] is an ordered phoneme sequence in the CMU inventory
//! (39 symbols). Vowels carry a stress digit; consonants never do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Stress;

/// The 15 ARPAbet vowel nuclei.
pub const VOWELS: &[&str] = &[
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// The 24 ARPAbet consonants.
pub const CONSONANTS: &[&str] = &[
    "B", "CH", "D", "DH", "F", "G", "HH", "JH", "K", "L", "M", "N", "NG", "P", "R", "S", "SH",
    "T", "TH", "V", "W", "Y", "Z", "ZH",
];

/// Consonants that devoice a following `-ed`/`-s` suffix.
const VOICELESS: &[&str] = &["P", "T", "K", "F", "TH", "S", "SH", "CH", "HH"];

/// Sibilants that force a syllabic `-s` suffix (`IH0 Z`).
const SIBILANTS: &[&str] = &["S", "Z", "SH", "ZH", "CH", "JH"];

/// A symbol that is not in the ARPAbet inventory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid ARPAbet symbol {0:?}")]
pub struct InvalidPhoneme(pub String);

/// One ARPAbet phoneme, with a stress level when it is a vowel nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phoneme {
    symbol: &'static str,
    stress: Option<Stress>,
}

impl Phoneme {
    /// Look up `symbol` in the inventory. Vowels default to unstressed.
    pub fn new(symbol: &str, stress: Option<Stress>) -> Result<Self, InvalidPhoneme> {
        if let Some(vowel) = VOWELS.iter().find(|v| **v == symbol) {
            return Ok(Self {
                symbol: *vowel,
                stress: Some(stress.unwrap_or(Stress::Unstressed)),
            });
        }
        match CONSONANTS.iter().find(|c| **c == symbol) {
            Some(consonant) if stress.is_none() => Ok(Self {
                symbol: *consonant,
                stress: None,
            }),
            _ => Err(InvalidPhoneme(symbol.to_string())),
        }
    }

    /// A vowel nucleus with the given stress.
    pub fn vowel(symbol: &str, stress: Stress) -> Result<Self, InvalidPhoneme> {
        let phoneme = Self::new(symbol, Some(stress))?;
        if phoneme.is_vowel() {
            Ok(phoneme)
        } else {
            Err(InvalidPhoneme(symbol.to_string()))
        }
    }

    /// A consonant.
    pub fn consonant(symbol: &str) -> Result<Self, InvalidPhoneme> {
        Self::new(symbol, None)
    }

    /// The bare symbol, without stress digit.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn stress(&self) -> Option<Stress> {
        self.stress
    }

    pub fn is_vowel(&self) -> bool {
        self.stress.is_some()
    }

    pub fn is_voiceless(&self) -> bool {
        VOICELESS.contains(&self.symbol)
    }

    pub fn is_sibilant(&self) -> bool {
        SIBILANTS.contains(&self.symbol)
    }

    /// Copy of this phoneme with a different stress (no-op on consonants).
    pub fn with_stress(self, stress: Stress) -> Self {
        if self.is_vowel() {
            Self {
                stress: Some(stress),
                ..self
            }
        } else {
            self
        }
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stress {
            Some(stress) => write!(f, "{}{}", self.symbol, stress.as_digit()),
            None => f.write_str(self.symbol),
        }
    }
}

impl FromStr for Phoneme {
    type Err = InvalidPhoneme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.chars().last().and_then(Stress::from_digit) {
            Some(stress) => Self::new(&upper[..upper.len() - 1], Some(stress)),
            None => Self::new(&upper, None),
        }
    }
}

/// An ordered phoneme sequence for one word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pronunciation {
    phonemes: Vec<Phoneme>,
}

impl Pronunciation {
    pub fn new(phonemes: Vec<Phoneme>) -> Self {
        Self { phonemes }
    }

    /// The empty placeholder used for unresolved words.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    /// Number of vowel nuclei.
    pub fn syllable_count(&self) -> usize {
        self.phonemes.iter().filter(|p| p.is_vowel()).count()
    }

    /// Stress level of each vowel nucleus, in order.
    pub fn stresses(&self) -> impl Iterator<Item = Stress> + '_ {
        self.phonemes.iter().filter_map(|p| p.stress())
    }

    pub fn last(&self) -> Option<&Phoneme> {
        self.phonemes.last()
    }

    /// The rhyme-bearing tail: from the last stressed nucleus (primary or
    /// secondary) to the end, falling back to the last nucleus.
    pub fn rhyme_tail(&self) -> Option<&[Phoneme]> {
        let start = self
            .phonemes
            .iter()
            .rposition(|p| matches!(p.stress(), Some(Stress::Primary | Stress::Secondary)))
            .or_else(|| self.phonemes.iter().rposition(|p| p.is_vowel()))?;
        Some(&self.phonemes[start..])
    }

    /// Append a phoneme, returning the extended pronunciation.
    pub fn with_appended(mut self, extra: impl IntoIterator<Item = Phoneme>) -> Self {
        self.phonemes.extend(extra);
        self
    }

    /// Whether `self` equals `prefix` followed by exactly the phonemes in `rest`.
    pub fn is_prefix_plus(&self, prefix: &Pronunciation, rest: &[Phoneme]) -> bool {
        self.phonemes.len() == prefix.phonemes.len() + rest.len()
            && self.phonemes.starts_with(&prefix.phonemes)
            && self.phonemes.ends_with(rest)
    }

    /// Remove the phoneme at `index`, returning the shortened pronunciation.
    pub fn without(mut self, index: usize) -> Self {
        if index < self.phonemes.len() {
            self.phonemes.remove(index);
        }
        self
    }

    /// Replace the phoneme at `index`.
    pub fn replacing(mut self, index: usize, phonemes: &[Phoneme]) -> Self {
        if index < self.phonemes.len() {
            self.phonemes.splice(index..=index, phonemes.iter().copied());
        }
        self
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phoneme) in self.phonemes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{phoneme}")?;
        }
        Ok(())
    }
}

impl FromStr for Pronunciation {
    type Err = InvalidPhoneme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(Phoneme::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl TryFrom<String> for Pronunciation {
    type Error = InvalidPhoneme;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pronunciation> for String {
    fn from(value: Pronunciation) -> Self {
        value.to_string()
    }
}

/// Test helper: parse a known-valid pronunciation literal.
#[cfg(test)]
pub(crate) fn pron(s: &str) -> Pronunciation {
    s.parse().unwrap()
}
