//! Parse throughput for representative queries.

use criterion::{criterion_group, criterion_main, Criterion};
use snomed_ql::{parse, parse_batch, parse_ecl, tokenize, ParserConfig};
use std::hint::black_box;

const SIMPLE: &str = "ecl = << 404684003 |Clinical finding|";

const REFINED: &str = "active = true AND (ecl = << 404684003 |Clinical finding| : \
    [1..*] { 363698007 |Finding site| = << 39057004, 116676008 = << 415582006 } \
    OR 246075003 = #1.5) MINUS {{ term = \"heart\" type = 900000000000013009 }}";

/// Tokenizing alone
fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_refined", |b| {
        b.iter(|| tokenize(black_box(REFINED)));
    });
}

/// Full query parses
fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| {
        b.iter(|| parse(black_box(SIMPLE)));
    });

    c.bench_function("parse_refined", |b| {
        b.iter(|| parse(black_box(REFINED)));
    });

    c.bench_function("parse_ecl_compound", |b| {
        b.iter(|| parse_ecl(black_box("(< 19829001 OR < 301867009) AND ^ 700043003 MINUS < 64572001")));
    });
}

/// Batch of independent queries
fn bench_batch(c: &mut Criterion) {
    let inputs: Vec<&str> = std::iter::repeat([SIMPLE, REFINED])
        .take(100)
        .flatten()
        .collect();
    let config = ParserConfig::default();

    c.bench_function("parse_batch_200", |b| {
        b.iter(|| parse_batch(black_box(&inputs), &config));
    });
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_batch);
criterion_main!(benches);
