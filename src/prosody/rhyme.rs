//! Rhyme analysis
//!
//! Each line's rhyme unit is the tail of its final word's pronunciation,
//! from the last stressed nucleus onward. Two units rhyme when their
//! phoneme symbols are identical once stress digits are ignored.
//!
//! Labels are assigned by an explicit fold over the stanza's lines that
//! carries an ordered `(unit, label)` table: a line takes the label of the
//! earliest earlier line it rhymes with, or the next unused label.

use std::fmt;

use crate::phonetics::{Phoneme, ResolvedWord};

/// The rhyme-bearing tail of a line, or a placeholder that rhymes with
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RhymeUnit {
    Tail(Vec<Phoneme>),
    /// Final word was degraded, unresolved, or has no nucleus
    Placeholder,
}

impl RhymeUnit {
    /// Rhyme unit of a line ending in `word`.
    pub fn from_final_word(word: &ResolvedWord) -> Self {
        if word.status().is_degraded() {
            return RhymeUnit::Placeholder;
        }
        match word.pronunciation().rhyme_tail() {
            Some(tail) => RhymeUnit::Tail(tail.to_vec()),
            None => RhymeUnit::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RhymeUnit::Placeholder)
    }

    /// Exact match on phoneme symbols, stress ignored. Placeholders never
    /// rhyme, not even with themselves.
    pub fn rhymes_with(&self, other: &RhymeUnit) -> bool {
        match (self, other) {
            (RhymeUnit::Tail(a), RhymeUnit::Tail(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.symbol() == y.symbol())
            }
            _ => false,
        }
    }
}

impl fmt::Display for RhymeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RhymeUnit::Tail(phonemes) => {
                for (i, p) in phonemes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
            RhymeUnit::Placeholder => f.write_str("?"),
        }
    }
}

/// Rhyme labels and pairs for one stanza.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RhymeAnalysis {
    /// One label per line
    pub scheme: Vec<String>,
    /// Every `(i, j)` with `i < j` whose lines share a label, sorted
    pub pairs: Vec<(usize, usize)>,
}

impl RhymeAnalysis {
    pub fn scheme_string(&self) -> String {
        self.scheme.concat()
    }
}

/// Label for the `n`th rhyme group: A..Z, then AA, AB, ...
pub fn rhyme_label(n: usize) -> String {
    let mut n = n + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}

/// Group a stanza's rhyme units.
pub fn analyze_rhymes(units: &[RhymeUnit]) -> RhymeAnalysis {
    struct Fold<'a> {
        table: Vec<(&'a RhymeUnit, usize)>,
        groups: Vec<usize>,
        next: usize,
    }

    let folded = units.iter().fold(
        Fold {
            table: Vec::with_capacity(units.len()),
            groups: Vec::with_capacity(units.len()),
            next: 0,
        },
        |mut acc, unit| {
            let group = match acc.table.iter().find(|(seen, _)| seen.rhymes_with(unit)) {
                Some(&(_, group)) => group,
                None => {
                    acc.next += 1;
                    acc.next - 1
                }
            };
            acc.table.push((unit, group));
            acc.groups.push(group);
            acc
        },
    );

    let groups = folded.groups;
    let mut pairs = Vec::new();
    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            if groups[i] == groups[j] {
                pairs.push((i, j));
            }
        }
    }

    RhymeAnalysis {
        scheme: groups.into_iter().map(rhyme_label).collect(),
        pairs,
    }
}
