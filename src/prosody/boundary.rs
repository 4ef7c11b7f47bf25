//! Punctuation and line-boundary analysis
//!
//! Works on normalized line text alone; no phonology is involved.

use serde::{Deserialize, Serialize};

use crate::nlp::WordToken;
use crate::types::BoundaryConfig;

/// How firmly a line's final punctuation closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndStop {
    /// `. ! ? ; :`, ellipsis, or a closing dash
    Hard,
    /// A trailing comma, or a closing bracket with no stronger mark inside
    Soft,
    None,
}

/// A strong mid-line pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caesura {
    /// Character offset of the mark within the line
    pub char_offset: usize,
    /// Number of words before the mark
    pub word_offset: usize,
}

/// Boundary features of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBoundary {
    pub end_stop: EndStop,
    pub end_stopped: bool,
    pub caesura: Option<Caesura>,
}

/// Closing quotes and brackets that may follow a line's final mark.
fn is_closer(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '\u{201D}' | '\u{2019}' | '\u{00BB}' | ')' | ']' | '}'
    )
}

/// Whether `chars[i]` starts a dash: an em or en dash, `--`, or a hyphen
/// with whitespace on both sides. Returns the dash's width in chars.
fn dash_at(chars: &[char], i: usize) -> Option<usize> {
    match chars[i] {
        '\u{2014}' | '\u{2013}' | '\u{2015}' => Some(1),
        '-' if chars.get(i + 1) == Some(&'-') => Some(2),
        '-' => {
            let spaced_before = i == 0 || chars[i - 1].is_whitespace();
            let spaced_after = chars.get(i + 1).map_or(true, |c| c.is_whitespace());
            (spaced_before && spaced_after).then_some(1)
        }
        _ => None,
    }
}

/// Classifies end-stopping, caesura, and enjambment.
#[derive(Debug, Clone, Default)]
pub struct BoundaryAnalyzer {
    config: BoundaryConfig,
}

impl BoundaryAnalyzer {
    pub fn new(config: BoundaryConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, text: &str, words: &[WordToken]) -> LineBoundary {
        let end_stop = self.end_stop(text);
        let end_stopped = match end_stop {
            EndStop::Hard => true,
            EndStop::Soft => self.config.comma_is_end_stop,
            EndStop::None => false,
        };
        LineBoundary {
            end_stop,
            end_stopped,
            caesura: self.caesura(text, words),
        }
    }

    /// Strength of the line's terminal punctuation.
    pub fn end_stop(&self, text: &str) -> EndStop {
        let chars: Vec<char> = text.trim_end().chars().collect();
        let mut end = chars.len();
        let mut closes_bracket = false;

        // Skip closers, but a trailing apostrophe glued to a word is part of it.
        while end > 0 && is_closer(chars[end - 1]) {
            closes_bracket |= matches!(chars[end - 1], ')' | ']' | '}');
            let glued_apostrophe = matches!(chars[end - 1], '\'' | '\u{2019}')
                && end >= 2
                && chars[end - 2].is_alphanumeric();
            if glued_apostrophe {
                return EndStop::None;
            }
            end -= 1;
        }
        if end == 0 {
            return EndStop::None;
        }

        let last = end - 1;
        match chars[last] {
            '.' | '!' | '?' | ';' | ':' | '\u{2026}' => EndStop::Hard,
            ',' => EndStop::Soft,
            '-' if last > 0 && chars[last - 1] == '-' => EndStop::Hard,
            _ if dash_at(&chars, last).is_some() => EndStop::Hard,
            _ if closes_bracket => EndStop::Soft,
            _ => EndStop::None,
        }
    }

    /// First comma, semicolon, colon, or dash strictly inside the central
    /// band of the line, `caesura_margin` in from each edge.
    pub fn caesura(&self, text: &str, words: &[WordToken]) -> Option<Caesura> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len() as f64;
        let low = len * self.config.caesura_margin;
        let high = len * (1.0 - self.config.caesura_margin);

        let mut i = 0;
        while i < chars.len() {
            let width = match chars[i] {
                ',' | ';' | ':' => Some(1),
                _ => dash_at(&chars, i),
            };
            if let Some(width) = width {
                let position = i as f64;
                if position > low && position < high {
                    return Some(Caesura {
                        char_offset: i,
                        word_offset: words.iter().filter(|w| w.end <= i).count(),
                    });
                }
                i += width;
            } else {
                i += 1;
            }
        }
        None
    }
}

/// A line is enjambed when nothing closes it and another line follows in
/// the stanza.
pub fn is_enjambed(end_stopped: bool, is_last_in_stanza: bool) -> bool {
    !end_stopped && !is_last_in_stanza
}
