//! Grapheme-to-phoneme fallback synthesis
//!
//! Words missing from every curated source are handed to a [`Synthesizer`].
//! The built-in [`RuleSynthesizer`] is a small letter-to-sound rule set:
//! greedy longest-match over a grapheme table, a magic-`e` rule, an `-ed`
//! suffix rule, and a stress heuristic. Its guesses are tagged
//! `rule_synthesized` and mark the word degraded.

use std::time::Instant;

use super::arpabet::{Phoneme, Pronunciation};
use crate::errors::SynthesisError;
use crate::types::Stress;

/// A best-guess pronunciation source for out-of-vocabulary words.
///
/// Implementations should give up once `deadline` has passed and return
/// [`SynthesisError::DeadlineExceeded`]. The resolver runs each call on its
/// own thread and stops waiting at the deadline either way; any error or a
/// late result is a lookup miss.
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, word: &str, deadline: Instant) -> Result<Pronunciation, SynthesisError>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "synthesizer"
    }
}

// ============================================================================
// Rule tables
// ============================================================================

/// Multi-letter graphemes, longest first within each starting letter.
const GRAPHEMES: &[(&str, &str)] = &[
    ("tion", "SH AH N"),
    ("eigh", "EY"),
    ("ough", "AO"),
    ("igh", "AY"),
    ("tch", "CH"),
    ("ck", "K"),
    ("ch", "CH"),
    ("sh", "SH"),
    ("th", "TH"),
    ("ph", "F"),
    ("wh", "W"),
    ("ng", "NG"),
    ("qu", "K W"),
    ("gh", ""),
    ("ee", "IY"),
    ("ea", "IY"),
    ("oo", "UW"),
    ("ou", "AW"),
    ("ow", "AW"),
    ("oi", "OY"),
    ("oy", "OY"),
    ("ai", "EY"),
    ("ay", "EY"),
    ("au", "AO"),
    ("aw", "AO"),
    ("oa", "OW"),
    ("ie", "IY"),
    ("ar", "AA R"),
    ("er", "ER"),
    ("ir", "ER"),
    ("ur", "ER"),
    ("or", "AO R"),
];

/// Silent first letters of word-initial clusters.
const SILENT_ONSETS: &[&str] = &["kn", "wr", "gn"];

/// Prefixes that usually leave the stress to the next syllable.
const UNSTRESSED_PREFIXES: &[&str] = &["be", "de", "re", "a"];

fn is_vowel_letter(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn short_vowel(c: char) -> &'static str {
    match c {
        'a' => "AE",
        'e' => "EH",
        'i' => "IH",
        'o' => "AA",
        _ => "AH",
    }
}

fn long_vowel(c: char) -> &'static str {
    match c {
        'a' => "EY",
        'e' => "IY",
        'i' => "AY",
        'o' => "OW",
        _ => "UW",
    }
}

fn consonant_letter(c: char, next: Option<char>) -> &'static str {
    match c {
        'b' => "B",
        'c' if matches!(next, Some('e' | 'i' | 'y')) => "S",
        'c' | 'k' | 'q' => "K",
        'd' => "D",
        'f' => "F",
        'g' => "G",
        'h' => "HH",
        'j' => "JH",
        'l' => "L",
        'm' => "M",
        'n' => "N",
        'p' => "P",
        'r' => "R",
        's' => "S",
        't' => "T",
        'v' => "V",
        'w' => "W",
        'x' => "K S",
        'z' => "Z",
        _ => "",
    }
}

// ============================================================================
// RuleSynthesizer
// ============================================================================

/// Letter-to-sound rules for English spelling.
#[derive(Debug, Clone, Default)]
pub struct RuleSynthesizer;

impl RuleSynthesizer {
    pub fn new() -> Self {
        Self
    }

    fn spell_out(
        &self,
        letters: &[char],
        deadline: Instant,
        word: &str,
    ) -> Result<Vec<Phoneme>, SynthesisError> {
        let mut out: Vec<Phoneme> = Vec::new();
        let len = letters.len();
        let mut i = 0;

        if len > 2 {
            let onset: String = letters[..2].iter().collect();
            if SILENT_ONSETS.contains(&onset.as_str()) {
                i = 1;
            }
        }

        while i < len {
            if Instant::now() >= deadline {
                return Err(SynthesisError::DeadlineExceeded {
                    word: word.to_string(),
                });
            }

            let rest: String = letters[i..].iter().collect();
            if let Some((grapheme, phones)) =
                GRAPHEMES.iter().find(|(g, _)| rest.starts_with(g))
            {
                push_phones(&mut out, phones)?;
                i += grapheme.chars().count();
                continue;
            }

            let c = letters[i];
            let next = letters.get(i + 1).copied();
            let is_last = i + 1 == len;

            if is_vowel_letter(c) {
                let has_nucleus = out.iter().any(Phoneme::is_vowel);
                if c == 'e' && is_last && has_nucleus {
                    // silent final e
                } else if magic_e(letters, i) {
                    push_phones(&mut out, long_vowel(c))?;
                } else {
                    push_phones(&mut out, short_vowel(c))?;
                }
            } else if c == 'y' {
                let before_vowel = next.is_some_and(is_vowel_letter);
                if i == 0 || before_vowel {
                    push_phones(&mut out, "Y")?;
                } else if is_last && out.iter().filter(|p| p.is_vowel()).count() == 0 {
                    push_phones(&mut out, "AY")?;
                } else {
                    push_phones(&mut out, "IY")?;
                }
            } else if i > 0 && letters[i - 1] == c {
                // doubled consonant
            } else if c == 's' && is_last && out.last().is_some_and(|p| !p.is_voiceless()) {
                push_phones(&mut out, "Z")?;
            } else if c == 'h' && !next.is_some_and(is_vowel_letter) {
                // silent h after a vowel or before a consonant
            } else {
                push_phones(&mut out, consonant_letter(c, next))?;
            }
            i += 1;
        }

        Ok(out)
    }
}

/// `v C e#` or `v C e[ds]#`: the vowel at `i` is long.
fn magic_e(letters: &[char], i: usize) -> bool {
    let len = letters.len();
    let consonant = match letters.get(i + 1) {
        Some(&c) => c,
        None => return false,
    };
    if is_vowel_letter(consonant) || matches!(consonant, 'r' | 'w' | 'x' | 'y') {
        return false;
    }
    if letters.get(i + 2) != Some(&'e') {
        return false;
    }
    i + 3 == len || (i + 4 == len && matches!(letters[len - 1], 'd' | 's'))
}

fn push_phones(out: &mut Vec<Phoneme>, phones: &str) -> Result<(), SynthesisError> {
    for symbol in phones.split_whitespace() {
        let phoneme = Phoneme::new(symbol, None)
            .map_err(|e| SynthesisError::Failed(e.to_string()))?;
        out.push(phoneme);
    }
    Ok(())
}

/// Primary stress on the first syllable, or on the second after an
/// unstressed prefix; everything else unstressed.
fn assign_stress(letters: &str, phonemes: &mut [Phoneme]) {
    let nuclei: Vec<usize> = phonemes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_vowel())
        .map(|(i, _)| i)
        .collect();

    let stressed = match nuclei.len() {
        0 => return,
        1 => 0,
        _ => {
            let prefixed = UNSTRESSED_PREFIXES.iter().any(|prefix| {
                letters.len() > prefix.len() + 2
                    && letters.starts_with(prefix)
                    && !letters[prefix.len()..].starts_with(|c: char| is_vowel_letter(c))
            });
            usize::from(prefixed)
        }
    };

    for (n, &idx) in nuclei.iter().enumerate() {
        let stress = if n == stressed {
            Stress::Primary
        } else {
            Stress::Unstressed
        };
        phonemes[idx] = phonemes[idx].with_stress(stress);
    }
}

impl Synthesizer for RuleSynthesizer {
    fn synthesize(&self, word: &str, deadline: Instant) -> Result<Pronunciation, SynthesisError> {
        let letters: String = word
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        if letters.is_empty() {
            return Err(SynthesisError::NoGraphemes {
                word: word.to_string(),
            });
        }

        // Regular past tense: synthesize the stem, then attach -ed.
        let (stem, past) = match letters.strip_suffix("ed") {
            Some(stem) if stem.len() >= 3 && stem.chars().any(is_vowel_letter) => (stem, true),
            _ => (letters.as_str(), false),
        };

        let chars: Vec<char> = stem.chars().collect();
        let mut phonemes = self.spell_out(&chars, deadline, word)?;

        if past {
            let suffix = match phonemes.last().map(Phoneme::symbol) {
                Some("T") | Some("D") => "IH D",
                _ if phonemes.last().is_some_and(Phoneme::is_voiceless) => "T",
                _ => "D",
            };
            push_phones(&mut phonemes, suffix)?;
        }

        if phonemes.is_empty() {
            return Err(SynthesisError::Failed(format!(
                "no phonemes produced for {word:?}"
            )));
        }

        assign_stress(stem, &mut phonemes);
        Ok(Pronunciation::new(phonemes))
    }

    fn name(&self) -> &str {
        "rule_g2p"
    }
}
