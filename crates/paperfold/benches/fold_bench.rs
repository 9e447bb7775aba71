//! Criterion benchmarks for fold partition + apply.
//! Focus sizes: grid cells per side in {10, 40, 100}.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use paperfold::fold::{FoldEngine, FoldSpec};
use paperfold::mesh::{PaperLayout, PaperMesh};
use paperfold::rand::{random_axis, AxisCfg, ReplayToken};

fn folded_sheet(cells: usize, folds: u64, seed: u64) -> PaperMesh {
    let mut mesh = PaperMesh::new(PaperLayout::square(1.0, cells)).unwrap();
    let mut engine = FoldEngine::default();
    for index in 0..folds {
        let axis = random_axis(AxisCfg::default(), ReplayToken { seed, index });
        engine.apply_axis(&mut mesh, axis, 180.0, None, None);
    }
    mesh
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");
    for &cells in &[10usize, 40, 100] {
        group.bench_with_input(BenchmarkId::new("partition", cells), &cells, |b, &cells| {
            let mesh = folded_sheet(cells, 4, 41);
            let mut engine = FoldEngine::default();
            let axis = random_axis(AxisCfg::default(), ReplayToken { seed: 41, index: 99 });
            let spec = FoldSpec::from_axis(axis, &mesh, 180.0).with_expression("fold_2_moved OR NOT fold_3_static");
            b.iter(|| {
                let _plan = engine.plan(&mesh, &spec);
            })
        });

        group.bench_with_input(BenchmarkId::new("apply_flat", cells), &cells, |b, &cells| {
            let axis = random_axis(AxisCfg::default(), ReplayToken { seed: 42, index: 0 });
            b.iter_batched(
                || folded_sheet(cells, 2, 42),
                |mut mesh| {
                    let mut engine = FoldEngine::default();
                    let _out = engine.apply_axis(&mut mesh, axis, 180.0, Some("b"), None);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fold);
criterion_main!(benches);
