//! Hot paths: data-plane parsing and topic lookups.
//!
//! Run with `cargo bench -p courier-tests`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use courier_discovery::{Participant, ReadinessConfig, Registry};
use courier_types::{DisseminationMode, Publication, Role, TOPIC_CATALOGUE};

fn bench_publication(c: &mut Criterion) {
    let direct = Publication::new("weather", "pub1", "sunny").to_string();
    let relayed = courier_types::mark_relayed(&direct);

    let mut group = c.benchmark_group("publication");
    group.bench_function("parse_direct", |b| {
        b.iter(|| Publication::parse(black_box(&direct)))
    });
    group.bench_function("parse_relayed", |b| {
        b.iter(|| Publication::parse(black_box(&relayed)))
    });
    group.bench_function("encode", |b| {
        let p = Publication::new("humidity", "pub1", "45.5");
        b.iter(|| black_box(&p).to_string())
    });
    group.finish();
}

fn registry_with(publishers: usize) -> Registry {
    let mut registry = Registry::new(ReadinessConfig::new(publishers, 0));
    for i in 0..publishers {
        let topic = TOPIC_CATALOGUE[i % TOPIC_CATALOGUE.len()];
        let participant = Participant::new(format!("p{i}"), "127.0.0.1", 6000, [topic]);
        registry
            .register(Role::Publisher, participant)
            .expect("unique ids");
    }
    registry
}

fn bench_lookup(c: &mut Criterion) {
    let wanted = vec!["sound".to_string(), "light".to_string()];
    let mut group = c.benchmark_group("lookup_by_topic");
    for size in [10usize, 100, 1000] {
        let registry = registry_with(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &registry, |b, r| {
            b.iter(|| r.resolve_for_topics(DisseminationMode::Direct, black_box(&wanted)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_publication, bench_lookup);
criterion_main!(benches);
