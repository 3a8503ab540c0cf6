//! Criterion benchmarks for multi-block driver passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ember_bench::{bench_config, block_batch, BenchBlock};
use ember_core::Evaluators;
use ember_engine::{BlockTask, DiagnosticsDriver};
use ember_grid::FieldArray;
use ember_test_utils::MockTransport;

fn pass(
    d: &DiagnosticsDriver,
    name: &str,
    blocks: &[BenchBlock],
    count: usize,
    ev: Evaluators<'_>,
) {
    let mut outs: Vec<FieldArray> = blocks.iter().map(|b| b.output(count)).collect();
    let mut tasks: Vec<BlockTask<'_>> = blocks
        .iter()
        .zip(outs.iter_mut())
        .map(|(b, out)| BlockTask::new(b.view(), out))
        .collect();
    let metrics = d.derive_blocks(name, &mut tasks, 0, count, ev).unwrap();
    black_box(metrics);
}

/// Benchmark: vorticity over 16 blocks of 24^3, serial vs rayon.
fn bench_vorticity_batch(c: &mut Criterion) {
    let blocks = block_batch(3, 24, 16);
    let serial = DiagnosticsDriver::standard(bench_config(3, false)).unwrap();
    let parallel = DiagnosticsDriver::standard(bench_config(3, true)).unwrap();

    c.bench_function("vorticity_16x24_serial", |b| {
        b.iter(|| pass(&serial, "vorticity", &blocks, 3, Evaluators::default()));
    });
    c.bench_function("vorticity_16x24_parallel", |b| {
        b.iter(|| pass(&parallel, "vorticity", &blocks, 3, Evaluators::default()));
    });
}

/// Benchmark: mixture-averaged diffusion coefficients over 8 blocks of 64^2.
fn bench_transport_dispatch(c: &mut Criterion) {
    let blocks = block_batch(2, 64, 8);
    let transport = MockTransport::default();
    let ev = Evaluators {
        transport: Some(&transport),
        ..Evaluators::default()
    };
    let d = DiagnosticsDriver::standard(bench_config(2, true)).unwrap();

    c.bench_function("diffcoeff_8x64", |b| {
        b.iter(|| pass(&d, "diffcoeff", &blocks, 3, ev));
    });
}

criterion_group!(benches, bench_vorticity_batch, bench_transport_dispatch);
criterion_main!(benches);
