//! Property-based tests using proptest

use proptest::prelude::*;
use verse_annotate::phonetics::Phoneme;
use verse_annotate::prosody::{analyze_rhymes, RhymeUnit, StressPattern};
use verse_annotate::*;

const SAMPLE_DICT: &str = include_str!("fixtures/sample.dict");

const WORDS: &[&str] = &[
    "all", "and", "are", "art", "away", "bright", "by", "compare", "day", "eyes", "fair", "far",
    "gold", "golden", "heaven", "his", "is", "light", "like", "love", "loved", "lovely", "more",
    "my", "night", "nothing", "shall", "sun", "the", "thee", "thou", "to", "walk", "with",
];

const EXTRA_WORDS: &[&str] = &["lov'd", "heav'n", "o'er", "thou'rt", "xyzzy", "ne'er", "'tis"];

const TAILS: &[&str] = &["EY1", "AY1 T", "AH1 N", "EH1 R", "AO1 R", "IY1"];

const MARKS: &[&str] = &["", ",", ".", ";", "?", "!", " --"];

fn lexicon() -> Lexicon {
    Lexicon::with_builtin_overrides(PronouncingDictionary::parse(SAMPLE_DICT).unwrap())
}

fn annotator() -> Annotator {
    Annotator::new(lexicon(), AnnotatorConfig::default()).unwrap()
}

fn tail(s: &str) -> RhymeUnit {
    RhymeUnit::Tail(s.split(' ').map(|p| p.parse::<Phoneme>().unwrap()).collect())
}

/// A line of dictionary words followed by an optional closing mark.
fn line_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(prop::sample::select(WORDS), 1..8),
        prop::sample::select(MARKS),
    )
        .prop_map(|(words, mark)| format!("{}{}", words.join(" "), mark))
}

fn stanza_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(line_strategy(), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn test_dictionary_resolution_is_pure(
        word in prop::sample::select(WORDS),
        noise in prop::collection::vec(prop::sample::select(EXTRA_WORDS), 0..6)
    ) {
        let resolver = PhoneticResolver::new(lexicon(), ResolverConfig::default());
        let alone = resolver.resolve(word);

        for other in &noise {
            resolver.resolve(other);
        }
        let after = resolver.resolve(word);

        prop_assert_eq!(&alone, &after);
        prop_assert!(!alone.candidates().is_empty());
        prop_assert_eq!(alone.source(), PronunciationSource::PrimaryDictionary);
        prop_assert!(alone.syllable_count() > 0);
    }

    #[test]
    fn test_rhyme_grouping_is_an_equivalence(
        picks in prop::collection::vec(prop::option::weighted(0.85, prop::sample::select(TAILS)), 1..12)
    ) {
        let units: Vec<RhymeUnit> = picks
            .iter()
            .map(|p| p.map_or(RhymeUnit::Placeholder, tail))
            .collect();
        let analysis = analyze_rhymes(&units);

        prop_assert_eq!(analysis.scheme.len(), units.len());
        for i in 0..units.len() {
            for j in 0..units.len() {
                if i == j {
                    continue;
                }
                let same_label = analysis.scheme[i] == analysis.scheme[j];
                prop_assert_eq!(same_label, units[i].rhymes_with(&units[j]));
                prop_assert_eq!(
                    analysis.pairs.contains(&(i.min(j), i.max(j))),
                    same_label
                );
            }
        }
        prop_assert_eq!(analysis.scheme[0].as_str(), "A");
    }

    #[test]
    fn test_meter_classification_is_deterministic(digits in "[012]{0,18}", degraded in any::<bool>()) {
        let pattern = StressPattern::from_digits(&digits, degraded).unwrap();
        let classifier = MeterClassifier::default();

        let first = classifier.classify(&pattern);
        let second = classifier.classify(&pattern);

        prop_assert_eq!(&first, &second);
        prop_assert!((0.0..=1.0).contains(&first.score));
        prop_assert!(first.confidence <= first.score + 1e-10);
        prop_assert_eq!(first.syllables, digits.len());
        if degraded && first.score > 0.0 {
            prop_assert!(first.confidence < first.score);
        }
    }

    #[test]
    fn test_end_stop_and_enjambment_are_exclusive(stanza in stanza_strategy()) {
        let poem = NormalizedPoem::from_text("p", &[stanza]);
        let annotated = annotator().annotate_poem(&poem).unwrap();
        let lines = &annotated.stanzas[0].lines;

        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            if i == last {
                prop_assert!(!line.enjambment);
            } else {
                prop_assert_ne!(line.end_stopped, line.enjambment);
            }
        }
    }

    #[test]
    fn test_caesura_stays_inside_margins(stanza in stanza_strategy()) {
        let analyzer = BoundaryAnalyzer::default();
        let tokenizer = VerseTokenizer::new();
        for text in &stanza {
            let tokens = tokenizer.tokenize(text);
            if let Some(caesura) = analyzer.caesura(text, &tokens) {
                let len = text.chars().count() as f64;
                let offset = caesura.char_offset as f64;
                prop_assert!(offset > len * 0.25 && offset < len * 0.75);
                prop_assert!(caesura.word_offset <= tokens.len());
            }
        }
    }

    #[test]
    fn test_annotation_is_idempotent(
        stanzas in prop::collection::vec(stanza_strategy(), 1..3),
        extra in prop::sample::select(EXTRA_WORDS)
    ) {
        let mut stanzas = stanzas;
        stanzas[0].push(format!("The {extra} night."));
        let poem = NormalizedPoem::from_text("p", &stanzas);
        let annotator = annotator();

        let first = serde_json::to_string(&annotator.annotate_poem(&poem).unwrap()).unwrap();
        let second = serde_json::to_string(&annotator.annotate_poem(&poem).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_every_word_has_a_pronunciation_record(stanza in stanza_strategy(), extra in prop::sample::select(EXTRA_WORDS)) {
        let mut stanza = stanza;
        stanza.push(format!("{extra} and day"));
        let poem = NormalizedPoem::from_text("p", &[stanza]);
        let annotated = annotator().annotate_poem(&poem).unwrap();

        for line in annotated.lines() {
            let words = VerseTokenizer::new().tokenize(&line.normalized);
            prop_assert_eq!(line.phonology.len(), words.len());
            for word in &line.phonology {
                prop_assert!(!word.arpabet.is_empty());
            }
            prop_assert_eq!(line.stress_pattern.len(), line.syllables);
        }
    }

    #[test]
    fn test_config_validation_properties(
        min_score in 0.01f64..=1.0,
        factor in 0.0f64..=1.0,
        margin in 0.0f64..0.5,
        threads in 1usize..16
    ) {
        let config = AnnotatorConfig::default()
            .with_min_score(min_score)
            .with_degraded_confidence_factor(factor)
            .with_caesura_margin(margin)
            .with_max_threads(threads);
        prop_assert!(config.validate().is_ok());
    }
}
