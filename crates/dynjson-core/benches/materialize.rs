use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use dynjson_core::{materialize, parse, tokenize};

/// A document of `rows` records with mixed scalar fields and a nested list.
fn sample_document(rows: usize) -> String {
    let records: Vec<String> = (0..rows)
        .map(|i| {
            format!(
                r#"{{"id":{i},"name":"user-{i}","score":{}.5,"active":{},"tags":["a","b\n{i}"],"parent":null}}"#,
                i * 3,
                i % 2 == 0
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn bench_parse(c: &mut Criterion) {
    let doc = sample_document(1_000);
    c.bench_function("parse_1k_records", |b| {
        b.iter(|| parse(black_box(&doc)).unwrap())
    });
}

fn bench_stages(c: &mut Criterion) {
    let doc = sample_document(1_000);
    c.bench_function("tokenize_1k_records", |b| {
        b.iter(|| tokenize(black_box(doc.as_bytes()), 16).unwrap())
    });

    let tokens = tokenize(doc.as_bytes(), 16).unwrap();
    c.bench_function("materialize_1k_records", |b| {
        b.iter(|| materialize(black_box(doc.as_bytes()), &tokens, 0, tokens.len()).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_stages);
criterion_main!(benches);
