// Performance benchmarks for the SmartSimilar ranking strategies
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use smartsimilar::{AttributeRecord, Attributes, Domain, EngineConfig, SimilarityEngine, SimilarityModel, StrategyKind};

const SEXES: [u32; 4] = [1200, 1201, 1202, 1219];
const MATERIALS: [u32; 3] = [414, 415, 1124];
const SHAPES: [u32; 6] = [1229, 1233, 1231, 1230, 1232, 1234];
const COLORS: [u32; 16] = [
    1250, 1248, 1249, 1237, 1242, 1236, 1241, 1240, 1247, 1246, 1239, 1244, 1243, 1245, 1253, 1254,
];

fn generate_catalog(size: usize, rng: &mut StdRng) -> Vec<AttributeRecord> {
    (0..size)
        .map(|i| {
            AttributeRecord::new(
                i as u64,
                format!("frame {}", i),
                format!("brand-{}", rng.random_range(0..40)),
                Attributes::Sunglasses {
                    sex: *SEXES.choose(rng).unwrap(),
                    material: *MATERIALS.choose(rng).unwrap(),
                    shape: *SHAPES.choose(rng).unwrap(),
                    color: *COLORS.choose(rng).unwrap(),
                },
            )
        })
        .collect()
}

fn benchmark_score(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let records = generate_catalog(2, &mut rng);
    let model = SimilarityModel::new(Domain::Sunglasses);

    c.bench_function("score_pair", |b| {
        b.iter(|| black_box(model.score(black_box(&records[0]), black_box(&records[1]))));
    });
}

fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_batch");
    group.sample_size(10);

    for size in [500, 2000, 5000].iter() {
        let mut rng = StdRng::seed_from_u64(*size as u64);
        let records = generate_catalog(*size, &mut rng);

        for strategy in [StrategyKind::Exact, StrategyKind::Clustered] {
            let engine = SimilarityEngine::new(EngineConfig {
                strategy,
                seed: Some(1),
                ..EngineConfig::default()
            });
            group.bench_with_input(BenchmarkId::new(strategy.to_string(), size), &records, |b, records| {
                b.iter(|| black_box(engine.run(records, 5).unwrap()));
            });
        }
    }

    group.finish();
}

fn benchmark_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_chunk_size");
    group.sample_size(10);

    let mut rng = StdRng::seed_from_u64(99);
    let records = generate_catalog(3000, &mut rng);

    for chunk_size in [10, 100, 1000].iter() {
        let engine = SimilarityEngine::new(EngineConfig {
            chunk_size: *chunk_size,
            ..EngineConfig::default()
        });
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &records, |b, records| {
            b.iter(|| black_box(engine.run(records, 8).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_score, benchmark_strategies, benchmark_chunk_sizes);
criterion_main!(benches);
