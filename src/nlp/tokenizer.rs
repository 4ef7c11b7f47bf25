//! Unicode-aware verse tokenization
//!
//! Words are found with UAX #29 word segmentation and then widened over
//! adjacent apostrophes, because in verse the apostrophe is phonologically
//! significant: `'tis`, `lov'd`, `th'`, `mistress'`.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A word found in a line of verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    /// The surface form, apostrophes included
    pub text: String,
    /// Character offset (start) in the line
    pub start: usize,
    /// Character offset (end, exclusive) in the line
    pub end: usize,
    /// Word index within the line
    pub index: usize,
}

impl WordToken {
    /// Whether the surface form carries an apostrophe anywhere.
    pub fn is_contracted(&self) -> bool {
        self.text.chars().any(is_apostrophe)
    }
}

/// True for the straight and typographic apostrophes.
pub fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '\u{02BC}')
}

/// A Unicode-aware tokenizer for single lines of verse
#[derive(Debug, Clone, Default)]
pub struct VerseTokenizer;

impl VerseTokenizer {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Self
    }

    /// Split a line into words with character offsets.
    ///
    /// Segments without any alphanumeric character (punctuation, symbols)
    /// are dropped.
    pub fn tokenize(&self, line: &str) -> Vec<WordToken> {
        let byte_to_char = char_index_map(line);
        let chars: Vec<char> = line.chars().collect();
        let mut words = Vec::new();

        for (byte_start, word) in line.unicode_word_indices() {
            if !word.chars().any(|c| c.is_alphanumeric()) {
                continue;
            }

            let mut start = byte_to_char[byte_start];
            let mut end = byte_to_char[byte_start + word.len()];

            // Leading apostrophe marks aphaeresis ('tis, 'gainst).
            if start > 0 && is_apostrophe(chars[start - 1]) {
                let before = if start >= 2 { Some(chars[start - 2]) } else { None };
                if before.map_or(true, |c| !c.is_alphanumeric()) {
                    start -= 1;
                }
            }
            // Trailing apostrophe marks apocope or a plural possessive (th', mistress').
            if end < chars.len() && is_apostrophe(chars[end]) {
                let after = chars.get(end + 1);
                if after.map_or(true, |c| !c.is_alphanumeric()) {
                    end += 1;
                }
            }

            let index = words.len();
            words.push(WordToken {
                text: chars[start..end].iter().collect(),
                start,
                end,
                index,
            });
        }

        words
    }
}

/// Map every byte offset on a char boundary (and the end) to a char offset.
fn char_index_map(line: &str) -> Vec<usize> {
    let mut map = vec![0; line.len() + 1];
    let mut count = 0;
    for (byte, c) in line.char_indices() {
        for slot in map.iter_mut().skip(byte).take(c.len_utf8()) {
            *slot = count;
        }
        count += 1;
    }
    map[line.len()] = count;
    map
}

/// Check whether a lowercase word is a function word.
///
/// Monosyllabic function words rarely carry a metrical beat, even though
/// pronunciation dictionaries mark every monosyllable with primary stress.
pub fn is_function_word(lower: &str) -> bool {
    matches!(
        lower,
        // Determiners
        "a" | "an" | "the" | "th'" | "this" | "that" | "these" | "those" | "my" | "thy"
            | "your" | "his" | "her" | "its" | "our" | "their" | "mine" | "thine" | "some"
            | "each" | "no"
            // Conjunctions
            | "and" | "or" | "but" | "nor" | "so" | "yet" | "if" | "as" | "than" | "though"
            | "when" | "while" | "since" | "lest" | "till" | "for"
            // Prepositions
            | "of" | "to" | "in" | "on" | "with" | "at" | "from" | "by" | "o'er" | "through"
            | "up" | "out" | "i'" | "on't" | "'gainst"
            // Pronouns
            | "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "us"
            | "them" | "thee" | "thou" | "ye" | "who" | "whom" | "which"
            // Auxiliaries and copulas
            | "is" | "am" | "are" | "was" | "were" | "be" | "been" | "art" | "hath" | "has"
            | "had" | "have" | "do" | "does" | "did" | "doth" | "shall" | "will" | "should"
            | "would" | "can" | "could" | "may" | "might" | "must"
            // Particles
            | "not" | "'tis" | "'twas"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        VerseTokenizer::new()
            .tokenize(line)
            .into_iter()
            .map(|w| w.text)
            .collect()
    }

    #[test]
    fn test_basic_tokenization() {
        assert_eq!(
            texts("Shall I compare thee to a summer's day?"),
            vec!["Shall", "I", "compare", "thee", "to", "a", "summer's", "day"]
        );
    }

    #[test]
    fn test_internal_apostrophes_kept() {
        assert_eq!(texts("I lov'd thee, thou'rt fair"), vec!["I", "lov'd", "thee", "thou'rt", "fair"]);
        assert_eq!(texts("O'er the hills"), vec!["O'er", "the", "hills"]);
    }

    #[test]
    fn test_edge_apostrophes() {
        assert_eq!(texts("'Tis th' eternal"), vec!["'Tis", "th'", "eternal"]);
        assert_eq!(texts("My mistress' eyes"), vec!["My", "mistress'", "eyes"]);
    }

    #[test]
    fn test_opening_quote_is_kept_as_prefix() {
        // Indistinguishable from aphaeresis here; the resolver retries without it.
        assert_eq!(texts("he cried 'away!'"), vec!["he", "cried", "'away"]);
    }

    #[test]
    fn test_curly_apostrophe() {
        assert_eq!(texts("lov\u{2019}d well"), vec!["lov\u{2019}d", "well"]);
    }

    #[test]
    fn test_hyphenated_words_split() {
        assert_eq!(texts("sun-bright morning"), vec!["sun", "bright", "morning"]);
    }

    #[test]
    fn test_char_offsets() {
        let words = VerseTokenizer::new().tokenize("Fair — and bright");
        assert_eq!(words.len(), 3);
        assert_eq!((words[0].start, words[0].end), (0, 4));
        // The em dash is a single character.
        assert_eq!((words[1].start, words[1].end), (7, 10));
        assert_eq!(words[2].index, 2);
    }

    #[test]
    fn test_punctuation_only() {
        assert!(VerseTokenizer::new().tokenize("— ; !").is_empty());
        assert!(VerseTokenizer::new().tokenize("").is_empty());
    }

    #[test]
    fn test_contracted_flag() {
        let words = VerseTokenizer::new().tokenize("walk'd home");
        assert!(words[0].is_contracted());
        assert!(!words[1].is_contracted());
    }

    #[test]
    fn test_function_words() {
        assert!(is_function_word("the"));
        assert!(is_function_word("thee"));
        assert!(is_function_word("shall"));
        assert!(!is_function_word("sun"));
        assert!(!is_function_word("compare"));
    }
}
