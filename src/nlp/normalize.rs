//! Text normalization
//!
//! Two normalizers live here: [`normalize_key`] turns a surface word into a
//! pronunciation-lookup key, and [`normalize_line`] canonicalizes a raw line
//! for input records that arrive without a normalized form.

use super::tokenizer::is_apostrophe;

/// Build the lookup key for a surface word.
///
/// Lowercases, maps typographic apostrophes to `'`, and strips leading and
/// trailing punctuation. Apostrophes are kept wherever they are, since
/// `'tis`, `lov'd` and `th'` all mean something; callers that want the
/// bare form use [`key_variants`].
pub fn normalize_key(surface: &str) -> String {
    let mapped: String = surface
        .chars()
        .map(|c| if is_apostrophe(c) { '\'' } else { c })
        .flat_map(char::to_lowercase)
        .collect();

    mapped
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '\''))
        .to_string()
}

/// Progressively barer spellings of a key, most specific first.
///
/// `mistress'` → `mistress'`, `mistress`; `'gainst` → `'gainst`, `gainst`.
/// Internal apostrophes are left for the morphology rules to interpret.
pub fn key_variants(key: &str) -> Vec<String> {
    let mut variants = vec![key.to_string()];
    let trimmed_end = key.trim_end_matches('\'');
    let trimmed_both = trimmed_end.trim_start_matches('\'');
    for candidate in [trimmed_end, trimmed_both] {
        if !candidate.is_empty() && !variants.iter().any(|v| v == candidate) {
            variants.push(candidate.to_string());
        }
    }
    variants
}

/// Normalize one raw line of verse.
///
/// Collapses whitespace, straightens quotes and apostrophes, canonicalizes
/// en/em dashes to `—`, and removes spaces before punctuation. Poetic
/// contractions are preserved.
pub fn normalize_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.trim().chars() {
        let c = match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            '\u{2013}' | '\u{2014}' | '\u{2015}' => '\u{2014}',
            other => other,
        };

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !matches!(c, ',' | '.' | ';' | ':' | '!' | '?') {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_lowercases_and_strips() {
        assert_eq!(normalize_key("Day?"), "day");
        assert_eq!(normalize_key("\"Away,"), "away");
        assert_eq!(normalize_key("SUMMER'S"), "summer's");
    }

    #[test]
    fn test_normalize_key_keeps_apostrophes() {
        assert_eq!(normalize_key("Lov\u{2019}d"), "lov'd");
        assert_eq!(normalize_key("'Tis"), "'tis");
        assert_eq!(normalize_key("th'"), "th'");
        assert_eq!(normalize_key("mistress'"), "mistress'");
    }

    #[test]
    fn test_key_variants() {
        assert_eq!(key_variants("mistress'"), vec!["mistress'", "mistress"]);
        assert_eq!(key_variants("'gainst"), vec!["'gainst", "gainst"]);
        assert_eq!(key_variants("day"), vec!["day"]);
        assert_eq!(key_variants("lov'd"), vec!["lov'd"]);
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(
            normalize_line("  Shall  I compare thee ,\tto a summer\u{2019}s day ? "),
            "Shall I compare thee, to a summer's day?"
        );
        assert_eq!(normalize_line("\u{201C}Stay\u{201D} \u{2013} he said"), "\"Stay\" \u{2014} he said");
    }

    #[test]
    fn test_normalize_line_empty() {
        assert_eq!(normalize_line("   "), "");
    }
}
