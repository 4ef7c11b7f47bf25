//! Primary pronunciation dictionary.
//!
//! Reads the CMU Pronouncing Dictionary text format:
//!
//! ```text
//! ;;; comment
//! LOVED  L AH1 V D
//! THE  DH AH0
//! THE(2)  DH AH1
//! ```
//!
//! Entries are keyed by lowercase spelling; alternates (`WORD(2)`) keep file
//! order, so the first pronunciation listed is the first returned.

use std::path::Path;

use rustc_hash::FxHashMap;

use super::arpabet::Pronunciation;
use crate::errors::{AnnotateError, Result};

/// Word → pronunciations, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    entries: FxHashMap<String, Vec<Pronunciation>>,
}

impl PronouncingDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse dictionary text. Malformed lines are errors carrying the
    /// 1-based line number.
    pub fn parse(text: &str) -> Result<Self> {
        let mut dict = Self::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = match raw_line.find('#') {
                Some(pos) => &raw_line[..pos],
                None => raw_line,
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut parts = line.split_whitespace();
            let headword = parts.next().unwrap_or_default();
            let phones: Vec<&str> = parts.collect();
            if phones.is_empty() {
                return Err(AnnotateError::lexicon(
                    idx + 1,
                    format!("entry {headword:?} has no phonemes"),
                ));
            }

            let pronunciation: Pronunciation = phones
                .join(" ")
                .parse()
                .map_err(|e| AnnotateError::lexicon(idx + 1, format!("{e}")))?;

            dict.insert(strip_variant(headword), pronunciation);
        }

        Ok(dict)
    }

    /// Read and parse a dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnnotateError::io(path, &e))?;
        Self::parse(&text)
    }

    /// Add one pronunciation for `word`, after any existing ones.
    pub fn insert(&mut self, word: &str, pronunciation: Pronunciation) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(pronunciation);
    }

    /// All pronunciations for a lowercase key, in dictionary order.
    pub fn lookup(&self, key: &str) -> Option<&[Pronunciation]> {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .filter(|prons| !prons.is_empty())
    }

    /// The first pronunciation for a key.
    pub fn first(&self, key: &str) -> Option<&Pronunciation> {
        self.lookup(key).and_then(|prons| prons.first())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of distinct headwords
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `WORD(2)` → `WORD`.
fn strip_variant(headword: &str) -> &str {
    match headword.find('(') {
        Some(pos) if headword.ends_with(')') && pos > 0 => &headword[..pos],
        _ => headword,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = ";;; sample\n\
        THE  DH AH0\n\
        THE(2)  DH AH1\n\
        LOVED  L AH1 V D\n\
        \n\
        day D EY1 # lowercase headwords, trailing comment\n";

    #[test]
    fn test_parse_sample() {
        let dict = PronouncingDictionary::parse(SAMPLE).unwrap();
        assert_eq!(dict.len(), 3);

        let the = dict.lookup("the").unwrap();
        assert_eq!(the.len(), 2);
        assert_eq!(the[0].to_string(), "DH AH0");
        assert_eq!(the[1].to_string(), "DH AH1");
        assert_eq!(dict.first("day").unwrap().to_string(), "D EY1");
    }

    #[test]
    fn test_lookup_is_by_lowercase_key() {
        let dict = PronouncingDictionary::parse(SAMPLE).unwrap();
        assert!(dict.contains("loved"));
        assert!(!dict.contains("LOVED"));
        assert!(dict.lookup("absent").is_none());
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let err = PronouncingDictionary::parse("DAY  D EY1\nNIGHT  N QQ1 T\n").unwrap_err();
        assert_eq!(
            err,
            AnnotateError::lexicon(2, "invalid ARPAbet symbol \"QQ\"")
        );

        let err = PronouncingDictionary::parse("LONELY\n").unwrap_err();
        assert!(err.is_lexicon_error());
    }

    #[test]
    fn test_strip_variant() {
        assert_eq!(strip_variant("THE(2)"), "THE");
        assert_eq!(strip_variant("THE"), "THE");
        assert_eq!(strip_variant("(PAREN"), "(PAREN");
    }

    #[test]
    fn test_load_missing_file() {
        let err = PronouncingDictionary::load("/nonexistent/cmudict.dict").unwrap_err();
        assert!(matches!(err, AnnotateError::Io { .. }));
    }
}
