use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rustytree::{build, build_many, ParseOptions};

const SMALL_ITEMS: usize = 64;
const LARGE_ITEMS: usize = 20_000;
const DEEP_LEVELS: usize = 10_000;

fn make_list(items: usize) -> String {
    let mut body = String::with_capacity(items * 48 + 16);
    body.push_str("<list>");
    for i in 0..items {
        body.push_str(&format!("<item n=\"{i}\"><name>item &amp; {i}</name><empty/></item>"));
    }
    body.push_str("</list>");
    body
}

fn make_deep(levels: usize) -> String {
    let mut body = String::with_capacity(levels * 8);
    for _ in 0..levels {
        body.push_str("<d>");
    }
    for _ in 0..levels {
        body.push_str("</d>");
    }
    body
}

fn bench_build_small(c: &mut Criterion) {
    let input = make_list(SMALL_ITEMS);
    let options = ParseOptions::default();
    c.bench_function("bench_build_small", |b| {
        b.iter(|| black_box(build(black_box(input.as_bytes()), &options)));
    });
}

fn bench_build_large(c: &mut Criterion) {
    let input = make_list(LARGE_ITEMS);
    let options = ParseOptions::default();
    c.bench_function("bench_build_large", |b| {
        b.iter(|| black_box(build(black_box(input.as_bytes()), &options)));
    });
}

fn bench_build_deep(c: &mut Criterion) {
    let input = make_deep(DEEP_LEVELS);
    let options = ParseOptions::default();
    c.bench_function("bench_build_deep", |b| {
        b.iter(|| black_box(build(black_box(input.as_bytes()), &options)));
    });
}

fn bench_serialize_large(c: &mut Criterion) {
    let input = make_list(LARGE_ITEMS);
    let doc = match build(input.as_bytes(), &ParseOptions::default()) {
        Ok(doc) => doc,
        Err(err) => panic!("fixture failed to build: {err}"),
    };
    c.bench_function("bench_serialize_large", |b| {
        b.iter(|| black_box(doc.serialize().len()));
    });
}

fn bench_build_many(c: &mut Criterion) {
    let inputs: Vec<String> = (0..64).map(|_| make_list(SMALL_ITEMS * 4)).collect();
    let options = ParseOptions::default();
    c.bench_function("bench_build_many", |b| {
        b.iter(|| black_box(build_many(black_box(&inputs), &options).len()));
    });
}

criterion_group!(
    benches,
    bench_build_small,
    bench_build_large,
    bench_build_deep,
    bench_serialize_large,
    bench_build_many
);
criterion_main!(benches);
