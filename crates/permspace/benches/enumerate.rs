use criterion::{criterion_group, criterion_main, Criterion};
use permspace::{Boundary, PermutationSpace, SpaceBuilder};
use serde_json::json;

fn make_builder() -> SpaceBuilder {
    PermutationSpace::builder(["batch_size", "learning_rate", "replica"])
        .independent("batch_size", [2, 3, 4, 5])
        .independent("learning_rate", [0.1, 0.2, 0.3, 0.4, 0.5])
        .independent("replica", 0..50)
        .dependent("label", ["batch_size", "learning_rate"], |args| {
            Ok(json!(format!(
                "bs{}-lr{}",
                args.i64("batch_size")?,
                args.f64("learning_rate")?
            )))
        })
        .dependent("job", ["label", "replica"], |args| {
            Ok(json!(format!("{}-r{}", args.str("label")?, args.i64("replica")?)))
        })
}

fn bench_full_pass(c: &mut Criterion) {
    let space = make_builder().build().expect("space");
    c.bench_function("full_pass", |b| {
        b.iter(|| space.exact_len().expect("count"));
    });
}

fn bench_filtered_pass(c: &mut Criterion) {
    let space = make_builder()
        .filter(["replica"], |args| Ok(args.i64("replica")? % 7 == 0))
        .build()
        .expect("space");
    c.bench_function("filtered_pass", |b| {
        b.iter(|| space.exact_len().expect("count"));
    });
}

fn bench_seek(c: &mut Criterion) {
    let space = make_builder().build().expect("space");
    let start: Boundary = [("batch_size".to_string(), json!(5))].into_iter().collect();
    c.bench_function("seek_last_block", |b| {
        b.iter(|| {
            space
                .iter_from(Some(&start), 0)
                .expect("seek")
                .count()
        });
    });
}

criterion_group!(benches, bench_full_pass, bench_filtered_pass, bench_seek);
criterion_main!(benches);
