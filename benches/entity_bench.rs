use criterion::{Criterion, criterion_group, criterion_main};
use entity_attrs::{ColumnType, EntityReadable, EntityValue, EntityWritable, Record, TableSchema};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

const BENCH_JSON: &str = r#"{
  "id": 42,
  "Name": "Alice",
  "email": "alice@example.com",
  "age": 28,
  "score": 99.5,
  "active": true,
  "tags": ["developer", "rust", "database"],
  "profile": { "bio": "Software engineer", "settings": { "theme": "dark", "level": 3 } }
}"#;

fn bench_schema() -> TableSchema {
    TableSchema::new("user")
        .with_column("id", ColumnType::Integer)
        .with_column("name", ColumnType::Text)
        .with_column("email", ColumnType::Text)
        .with_column("age", ColumnType::Integer)
        .with_column("score", ColumnType::Float)
        .with_column("active", ColumnType::Bool)
        .with_column("profile", ColumnType::Object)
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_writes(c: &mut Criterion) {
    let schema = bench_schema();
    let mut group = c.benchmark_group("write");

    group.bench_function("set_known", |b| {
        let mut r = Record::new(&schema);
        b.iter(|| {
            r.set(black_box("Name"), black_box("Bob")).ok();
        })
    });

    group.bench_function("set_unknown", |b| {
        let mut r = Record::new(&schema);
        b.iter(|| black_box(r.set(black_box("nickname"), 1i64).is_err()))
    });

    group.bench_function("put_mixed", |b| {
        let mut r = Record::new(&schema);
        b.iter(|| {
            r.put(black_box("score"), 1.5f64).put(black_box("rank"), 7i64);
        })
    });

    group.bench_function("init_hydrate_json", |b| {
        b.iter(|| black_box(Record::from_json(&schema, black_box(BENCH_JSON)).ok()))
    });

    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let schema = bench_schema();
    let r = Record::from_json(&schema, BENCH_JSON).expect("bench json");
    let mut group = c.benchmark_group("read");

    group.bench_function("get_raw", |b| b.iter(|| black_box(r.get(black_box("EMAIL")))));

    group.bench_function("get_as_direct_i64", |b| {
        b.iter(|| black_box(r.get_as::<i64>(black_box("age")).ok()))
    });

    group.bench_function("get_as_coerced_u8", |b| {
        b.iter(|| black_box(r.get_as::<u8>(black_box("age")).ok()))
    });

    group.bench_function("get_as_coerced_vec", |b| {
        b.iter(|| black_box(r.get_as::<Vec<String>>(black_box("tags")).ok()))
    });

    group.bench_function("get_or_default", |b| {
        b.iter(|| black_box(r.get_or(black_box("missing"), EntityValue::Null)))
    });

    group.bench_function("to_json", |b| b.iter(|| black_box(r.to_json())));

    group.finish();
}

criterion_group!(benches, bench_writes, bench_reads);
criterion_main!(benches);
