//! Benchmarks for verse_annotate

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use verse_annotate::*;

const SAMPLE_DICT: &str = include_str!("../tests/fixtures/sample.dict");

/// A sonnet-shaped stanza built from the fixture vocabulary
const SAMPLE_STANZA: &[&str] = &[
    "Shall I compare thee to a summer's day,",
    "Thou art more lovely and more far away.",
    "The sun is fair and bright with golden light,",
    "And all his gold is dimmed by coming night.",
    "My mistress' eyes are nothing like the sun,",
    "Thou'rt more lovely than the summer's day;",
    "O'er all the gold, the lov'd and heav'n-bright night",
];

fn annotator() -> Annotator {
    let dict = PronouncingDictionary::parse(SAMPLE_DICT).unwrap();
    Annotator::new(Lexicon::with_builtin_overrides(dict), AnnotatorConfig::default()).unwrap()
}

fn benchmark_resolution(c: &mut Criterion) {
    let dict = PronouncingDictionary::parse(SAMPLE_DICT).unwrap();
    let resolver = PhoneticResolver::new(Lexicon::with_builtin_overrides(dict), ResolverConfig::default());

    let mut group = c.benchmark_group("resolve");
    for word in ["day", "lov'd", "heav'n", "o'er", "thou'rt"] {
        group.bench_with_input(BenchmarkId::from_parameter(word), word, |b, word| {
            b.iter(|| resolver.resolve(black_box(word)))
        });
    }
    group.finish();
}

fn benchmark_line(c: &mut Criterion) {
    let annotator = annotator();
    let poem = NormalizedPoem::from_text("line", &[vec![SAMPLE_STANZA[0]]]);

    c.bench_function("annotate_line", |b| {
        b.iter(|| annotator.annotate_poem(black_box(&poem)))
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let annotator = annotator();
    let stanzas: Vec<Vec<&str>> = vec![SAMPLE_STANZA.to_vec(), SAMPLE_STANZA[..4].to_vec()];

    let mut group = c.benchmark_group("annotate_batch");
    for size in [1, 10, 100].iter() {
        let poems: Vec<NormalizedPoem> = (0..*size)
            .map(|i| NormalizedPoem::from_text(format!("poem-{i}"), &stanzas))
            .collect();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &poems, |b, poems| {
            b.iter(|| annotator.annotate_batch(black_box(poems)))
        });
    }
    group.finish();
}

fn benchmark_meter(c: &mut Criterion) {
    let classifier = MeterClassifier::default();
    let pattern = prosody::StressPattern::from_digits("0101010101", false).unwrap();

    c.bench_function("classify_pentameter", |b| {
        b.iter(|| classifier.classify(black_box(&pattern)))
    });
}

criterion_group!(
    benches,
    benchmark_resolution,
    benchmark_line,
    benchmark_batch,
    benchmark_meter
);
criterion_main!(benches);
