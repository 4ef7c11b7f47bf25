//! Stanza type naming, by line count and rhyme scheme.

/// Name a stanza from its length and rhyme labels.
///
/// Fixed forms are recognized by scheme (`ABA` terza rima, `ABABBCC` rhyme
/// royal, `ABABABCC` ottava rima, `ABABBCBCC` Spenserian); everything else
/// by line count. Stanzas with no conventional name are `<n>_line`.
pub fn stanza_type(scheme: &[String]) -> String {
    let pattern = scheme.concat();
    let name = match (scheme.len(), pattern.as_str()) {
        (3, "ABA") => "terza_rima",
        (7, "ABABBCC") => "rhyme_royal",
        (8, "ABABABCC") => "ottava_rima",
        (9, "ABABBCBCC") => "spenserian_stanza",
        (1, _) => "monostich",
        (2, _) => "couplet",
        (3, _) => "tercet",
        (4, _) => "quatrain",
        (5, _) => "cinquain",
        (6, _) => "sestet",
        (7, _) => "septet",
        (8, _) => "octave",
        (14, _) => "sonnet",
        (n, _) => return format!("{n}_line"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(s: &str) -> Vec<String> {
        s.chars().map(String::from).collect()
    }

    #[test]
    fn test_counts() {
        assert_eq!(stanza_type(&scheme("A")), "monostich");
        assert_eq!(stanza_type(&scheme("AA")), "couplet");
        assert_eq!(stanza_type(&scheme("AAB")), "tercet");
        assert_eq!(stanza_type(&scheme("AABB")), "quatrain");
        assert_eq!(stanza_type(&scheme("ABABCDCDEFEFGG")), "sonnet");
        assert_eq!(stanza_type(&scheme("ABCDEFGHIJ")), "10_line");
        assert_eq!(stanza_type(&[]), "0_line");
    }

    #[test]
    fn test_fixed_forms() {
        assert_eq!(stanza_type(&scheme("ABA")), "terza_rima");
        assert_eq!(stanza_type(&scheme("ABABBCC")), "rhyme_royal");
        assert_eq!(stanza_type(&scheme("ABABABCC")), "ottava_rima");
        assert_eq!(stanza_type(&scheme("ABABBCBCC")), "spenserian_stanza");
        assert_eq!(stanza_type(&scheme("AABBCCD")), "septet");
        assert_eq!(stanza_type(&scheme("AABBCCDD")), "octave");
    }
}
