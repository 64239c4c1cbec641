use alias_core::{Alias, Scope, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn deref_walk_bench(c: &mut Criterion) {
    let scope = Scope::new();
    scope.insert("buf", Value::List((0..1_024).map(Value::Int).collect()));
    let start = Alias::bind(&scope, "buf").unwrap();

    c.bench_function("post_increment_walk", |b| {
        b.iter(|| {
            let mut cursor = start.duplicate();
            for _ in 0..1_024 {
                black_box(cursor.dereference_then_increment().unwrap());
            }
        });
    });

    c.bench_function("set_through_walk", |b| {
        b.iter(|| {
            let mut cursor = start.duplicate();
            for value in 0..1_024i64 {
                cursor.set_dereferenced(black_box(value)).unwrap();
                cursor.increment();
            }
        });
    });
}

criterion_group!(benches, deref_walk_bench);
criterion_main!(benches);
