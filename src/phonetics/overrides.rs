//! Manual override table for archaic, dialectal, and elided forms.
//!
//! Overrides are consulted after the primary dictionary misses. The table
//! ships with a built-in set of common early-modern contractions and can be
//! extended from a JSON file:
//!
//! ```json
//! { "o'er": "OW1 R", "ta'en": ["T EY1 N"] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::arpabet::Pronunciation;
use crate::errors::{AnnotateError, Result};

/// Curated forms every run starts with.
const BUILTIN: &[(&str, &str)] = &[
    ("'em", "AH0 M"),
    ("'gainst", "G EH1 N S T"),
    ("'tis", "T IH1 Z"),
    ("'twas", "T W AH1 Z"),
    ("'twere", "T W ER1"),
    ("'twill", "T W IH1 L"),
    ("do't", "D UW1 T"),
    ("e'en", "IY1 N"),
    ("e'er", "EH1 R"),
    ("ev'ry", "EH1 V R IY0"),
    ("howe'er", "HH AW2 EH1 R"),
    ("i'", "IH0"),
    ("is't", "IH1 Z T"),
    ("ne'er", "N EH1 R"),
    ("o'", "AH0"),
    ("o'er", "OW1 R"),
    ("on't", "AA1 N T"),
    ("ta'en", "T EY1 N"),
    ("th'", "DH"),
    ("whate'er", "W AH2 T EH1 R"),
    ("whene'er", "W EH2 N EH1 R"),
    ("where'er", "W EH2 R EH1 R"),
];

/// JSON value shape: one pronunciation or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Curated word → pronunciation table.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: BTreeMap<String, Vec<Pronunciation>>,
}

impl OverrideTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in early-modern contractions.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (word, phones) in BUILTIN {
            if let Ok(pronunciation) = phones.parse() {
                table.entries.insert((*word).to_string(), vec![pronunciation]);
            }
        }
        table
    }

    /// Parse a JSON override map.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, OneOrMany> = serde_json::from_str(json)?;
        let mut table = Self::new();

        for (word, value) in raw {
            let phones = match value {
                OneOrMany::One(p) => vec![p],
                OneOrMany::Many(ps) => ps,
            };
            let prons = phones
                .iter()
                .map(|p| p.parse::<Pronunciation>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| AnnotateError::serialization(format!("override {word:?}: {e}")))?;
            if prons.is_empty() {
                return Err(AnnotateError::serialization(format!(
                    "override {word:?} has no pronunciations"
                )));
            }
            table.entries.insert(word.to_lowercase(), prons);
        }

        Ok(table)
    }

    /// Read and parse a JSON override file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnnotateError::io(path, &e))?;
        Self::from_json(&text)
    }

    /// Layer `self` over `base`: entries in `self` replace those in `base`.
    pub fn layered_over(self, mut base: OverrideTable) -> Self {
        base.entries.extend(self.entries);
        base
    }

    pub fn lookup(&self, key: &str) -> Option<&[Pronunciation]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
