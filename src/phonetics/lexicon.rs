//! The read-only pronunciation snapshot shared by every worker in a run.

use std::path::Path;
use std::sync::Arc;

use super::dictionary::PronouncingDictionary;
use super::overrides::OverrideTable;
use crate::errors::Result;

/// Primary dictionary plus manual overrides, loaded once per run.
///
/// Cloning is cheap: both tables sit behind one `Arc` and are never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct Lexicon {
    inner: Arc<LexiconData>,
}

#[derive(Debug)]
struct LexiconData {
    dictionary: PronouncingDictionary,
    overrides: OverrideTable,
}

impl Lexicon {
    pub fn new(dictionary: PronouncingDictionary, overrides: OverrideTable) -> Self {
        Self {
            inner: Arc::new(LexiconData {
                dictionary,
                overrides,
            }),
        }
    }

    /// A dictionary with the built-in overrides.
    pub fn with_builtin_overrides(dictionary: PronouncingDictionary) -> Self {
        Self::new(dictionary, OverrideTable::builtin())
    }

    /// Load a CMU-format dictionary and an optional JSON override file,
    /// layered over the built-in overrides.
    pub fn load(dictionary: Option<&Path>, overrides: Option<&Path>) -> Result<Self> {
        let dictionary = match dictionary {
            Some(path) => PronouncingDictionary::load(path)?,
            None => PronouncingDictionary::new(),
        };
        let overrides = match overrides {
            Some(path) => OverrideTable::load(path)?.layered_over(OverrideTable::builtin()),
            None => OverrideTable::builtin(),
        };

        tracing::info!(
            dictionary_entries = dictionary.len(),
            override_entries = overrides.len(),
            "lexicon loaded"
        );
        Ok(Self::new(dictionary, overrides))
    }

    pub fn dictionary(&self) -> &PronouncingDictionary {
        &self.inner.dictionary
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.inner.overrides
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::with_builtin_overrides(PronouncingDictionary::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_snapshot() {
        let lexicon = Lexicon::with_builtin_overrides(
            PronouncingDictionary::parse("DAY  D EY1\n").unwrap(),
        );
        let other = lexicon.clone();
        assert!(Arc::ptr_eq(&lexicon.inner, &other.inner));
        assert!(other.dictionary().contains("day"));
        assert!(other.overrides().lookup("o'er").is_some());
    }

    #[test]
    fn test_load_without_files() {
        let lexicon = Lexicon::load(None, None).unwrap();
        assert!(lexicon.dictionary().is_empty());
        assert!(!lexicon.overrides().is_empty());
    }

    #[test]
    fn test_lexicon_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Lexicon>();
    }
}
