//! Verse morphology: pronunciations derived from dictionary forms.
//!
//! Poetic spelling marks elision with an apostrophe (`lov'd`, `heav'n`,
//! `know'st`). None of these are dictionary headwords, but each is a
//! regular transformation of one, so their pronunciations are derived from
//! the dictionary rather than guessed by the synthesizer.

use super::arpabet::{Phoneme, Pronunciation};
use super::dictionary::PronouncingDictionary;
use crate::nlp::key_variants;
use crate::types::Stress;

/// Which derivation produced a pronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphRule {
    /// Edge apostrophes removed (`mistress'`, `'mid`)
    BareSpelling,
    /// `'d` / `'t` past tense (`lov'd`, `curs't`)
    PastElision,
    /// `'st` second person singular (`know'st`)
    SecondPerson,
    /// `'s` possessive or contraction (`beauty's`)
    Possessive,
    /// Dropped internal vowel (`heav'n`, `pow'r`)
    InternalElision,
    /// All apostrophes removed
    ApostropheStripped,
}

impl MorphRule {
    pub fn as_str(self) -> &'static str {
        match self {
            MorphRule::BareSpelling => "bare_spelling",
            MorphRule::PastElision => "past_elision",
            MorphRule::SecondPerson => "second_person",
            MorphRule::Possessive => "possessive",
            MorphRule::InternalElision => "internal_elision",
            MorphRule::ApostropheStripped => "apostrophe_stripped",
        }
    }
}

/// Pronunciations derived for a key, with the rule that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub rule: MorphRule,
    pub pronunciations: Vec<Pronunciation>,
}

/// Try every derivation rule in order; the first that applies wins.
pub fn derive(key: &str, dict: &PronouncingDictionary) -> Option<Derivation> {
    let rules: [(MorphRule, fn(&str, &PronouncingDictionary) -> Option<Vec<Pronunciation>>); 6] = [
        (MorphRule::BareSpelling, bare_spelling),
        (MorphRule::PastElision, past_elision),
        (MorphRule::SecondPerson, second_person),
        (MorphRule::Possessive, possessive),
        (MorphRule::InternalElision, internal_elision),
        (MorphRule::ApostropheStripped, apostrophe_stripped),
    ];

    rules.iter().find_map(|(rule, apply)| {
        apply(key, dict)
            .filter(|prons| !prons.is_empty())
            .map(|pronunciations| Derivation {
                rule: *rule,
                pronunciations,
            })
    })
}

/// Syllabic reading of a spelled-out `-ed` past form.
///
/// When the dictionary gives `loved` as `love` + D, the historical reading
/// `lovèd` is `love` + AH0 D. Returns `None` when `pronunciation` is not a
/// bare-dental extension of a dictionary stem, or when the stem already ends
/// in an unstressed syllable (`wander`, `open`), which never takes the
/// extra beat.
pub fn syllabic_ed(
    key: &str,
    pronunciation: &Pronunciation,
    dict: &PronouncingDictionary,
) -> Option<Pronunciation> {
    if !key.ends_with("ed") {
        return None;
    }

    let mut stems = Vec::with_capacity(2);
    // loved -> love, but not feed -> fee
    if let Some(stem) = key.strip_suffix('d') {
        let mut rev = stem.chars().rev();
        if rev.next() == Some('e') && rev.next().is_some_and(|c| !is_vowel_letter(c)) {
            stems.push(stem);
        }
    }
    // walked -> walk
    if let Some(stem) = key.strip_suffix("ed").filter(|s| !s.is_empty()) {
        stems.push(stem);
    }

    let d = consonant("D")?;
    let t = consonant("T")?;
    let schwa = Phoneme::vowel("AH", Stress::Unstressed).ok()?;

    stems
        .into_iter()
        .filter_map(|stem| dict.lookup(stem))
        .flatten()
        .find(|stem_pron| {
            (pronunciation.is_prefix_plus(stem_pron, &[d])
                || pronunciation.is_prefix_plus(stem_pron, &[t]))
                && !ends_unstressed(stem_pron)
        })
        .map(|stem_pron| stem_pron.clone().with_appended([schwa, d]))
}

// ============================================================================
// Rules
// ============================================================================

fn bare_spelling(key: &str, dict: &PronouncingDictionary) -> Option<Vec<Pronunciation>> {
    key_variants(key)
        .iter()
        .skip(1)
        .find_map(|variant| dict.lookup(variant))
        .map(<[Pronunciation]>::to_vec)
}

fn past_elision(key: &str, dict: &PronouncingDictionary) -> Option<Vec<Pronunciation>> {
    let (base, devoiced) = match key.strip_suffix("'d") {
        Some(base) => (base, false),
        None => (key.strip_suffix("'t")?, true),
    };
    let last = base.chars().last()?;
    // see't is "see it", not "seed"
    if devoiced && is_vowel_letter(last) {
        return None;
    }

    for full in [format!("{base}ed"), format!("{base}d")] {
        if let Some(prons) = dict.lookup(&full) {
            let elided: Vec<Pronunciation> = prons
                .iter()
                .filter(|p| ends_in_bare_dental(p))
                .cloned()
                .collect();
            if !elided.is_empty() {
                return Some(elided);
            }
        }
    }

    let stem = [base.to_string(), format!("{base}e")]
        .into_iter()
        .find_map(|stem| dict.first(&stem))?;
    let voiceless = devoiced || stem.last().is_some_and(Phoneme::is_voiceless);
    let dental = consonant(if voiceless { "T" } else { "D" })?;
    Some(vec![stem.clone().with_appended([dental])])
}

fn second_person(key: &str, dict: &PronouncingDictionary) -> Option<Vec<Pronunciation>> {
    let base = key.strip_suffix("'st")?;
    if base.is_empty() {
        return None;
    }
    let stem = [base.to_string(), format!("{base}e")]
        .into_iter()
        .find_map(|stem| dict.first(&stem))?;
    Some(vec![stem
        .clone()
        .with_appended([consonant("S")?, consonant("T")?])])
}

fn possessive(key: &str, dict: &PronouncingDictionary) -> Option<Vec<Pronunciation>> {
    let base = key.strip_suffix("'s").filter(|b| !b.is_empty())?;
    dict.lookup(base)?
        .iter()
        .map(|p| {
            let suffix = match p.last() {
                Some(last) if last.is_sibilant() => {
                    vec![Phoneme::vowel("IH", Stress::Unstressed).ok()?, consonant("Z")?]
                }
                Some(last) if last.is_voiceless() => vec![consonant("S")?],
                _ => vec![consonant("Z")?],
            };
            Some(p.clone().with_appended(suffix))
        })
        .collect()
}

fn internal_elision(key: &str, dict: &PronouncingDictionary) -> Option<Vec<Pronunciation>> {
    let pos = key.find('\'')?;
    let (head, tail) = (&key[..pos], &key[pos + 1..]);
    if head.is_empty() || tail.is_empty() || tail.contains('\'') {
        return None;
    }

    ["e", "o", "i", "a", "u"].iter().find_map(|vowel| {
        let prons = dict.lookup(&format!("{head}{vowel}{tail}"))?;
        let reduced: Vec<Pronunciation> = prons.iter().filter_map(drop_unstressed_nucleus).collect();
        (!reduced.is_empty()).then_some(reduced)
    })
}

fn apostrophe_stripped(key: &str, dict: &PronouncingDictionary) -> Option<Vec<Pronunciation>> {
    if !key.contains('\'') {
        return None;
    }
    let stripped: String = key.chars().filter(|c| *c != '\'').collect();
    dict.lookup(&stripped).map(<[Pronunciation]>::to_vec)
}

// ============================================================================
// Helpers
// ============================================================================

fn is_vowel_letter(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn consonant(symbol: &str) -> Option<Phoneme> {
    Phoneme::consonant(symbol).ok()
}

/// The last nucleus is unstressed, syllabic consonants (`AH0 N`) included.
fn ends_unstressed(p: &Pronunciation) -> bool {
    p.phonemes()
        .iter()
        .rev()
        .find(|ph| ph.is_vowel())
        .is_some_and(|ph| ph.stress() == Some(Stress::Unstressed))
}

/// Ends in D or T directly after a non-vowel (`L AH1 V D`, not `W AA1 N T IH0 D`).
fn ends_in_bare_dental(p: &Pronunciation) -> bool {
    match p.phonemes() {
        [.., before, last] => matches!(last.symbol(), "D" | "T") && !before.is_vowel(),
        _ => false,
    }
}

/// Remove the unstressed nucleus that elision drops: the first one after the
/// first stressed nucleus. A syllabic `ER` leaves its `R` behind.
fn drop_unstressed_nucleus(p: &Pronunciation) -> Option<Pronunciation> {
    if p.syllable_count() < 2 {
        return None;
    }
    let phonemes = p.phonemes();
    let is_unstressed = |ph: &Phoneme| ph.stress() == Some(Stress::Unstressed);

    let after_stress = phonemes
        .iter()
        .position(|ph| matches!(ph.stress(), Some(Stress::Primary | Stress::Secondary)))
        .map_or(0, |i| i + 1);
    let index = phonemes
        .iter()
        .skip(after_stress)
        .position(is_unstressed)
        .map(|i| i + after_stress)
        .or_else(|| phonemes.iter().position(is_unstressed))?;

    if phonemes[index].symbol() == "ER" {
        Some(p.clone().replacing(index, &[consonant("R")?]))
    } else {
        Some(p.clone().without(index))
    }
}
