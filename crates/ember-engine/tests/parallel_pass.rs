//! Integration test: multi-block passes.
//!
//! Parallel and serial execution must produce identical outputs and
//! metrics, and buffered cell records must come out in block order no
//! matter which worker finished first.

use ember_core::{DiagnosticsConfig, Evaluators, StateLayout};
use ember_derive::BlockView;
use ember_engine::{BlockTask, DiagnosticsDriver, EngineConfig, LogSink, PassMetrics};
use ember_grid::FieldArray;
use ember_test_utils::fixtures::FIXTURE_MASS_FRACTIONS;
use ember_test_utils::{BlockFixture, MockChemistry};
use proptest::prelude::*;

fn driver(ndim: usize, parallel: bool) -> DiagnosticsDriver {
    let config = EngineConfig::builder(StateLayout::new(ndim, 3).unwrap())
        .diagnostics(DiagnosticsConfig::default())
        .parallel(parallel)
        .build()
        .unwrap();
    DiagnosticsDriver::standard(config).unwrap()
}

/// Blocks in solid-body rotation at different rates.
fn rotating_blocks(ndim: usize, rates: &[f64]) -> Vec<BlockFixture> {
    rates
        .iter()
        .map(|&w| {
            let mut fx = BlockFixture::new(ndim, 6, 2);
            fx.set_velocity(move |x| [-w * x[1], w * x[0], 0.0]);
            fx
        })
        .collect()
}

fn run_pass(
    d: &DiagnosticsDriver,
    name: &str,
    blocks: &[BlockFixture],
    count: usize,
) -> (Vec<FieldArray>, PassMetrics) {
    let mut outs: Vec<FieldArray> = blocks.iter().map(|fx| fx.output(count)).collect();
    let mut tasks: Vec<BlockTask<'_>> = blocks
        .iter()
        .zip(outs.iter_mut())
        .map(|(fx, out)| {
            BlockTask::new(
                BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
                out,
            )
        })
        .collect();
    let metrics = d
        .derive_blocks(name, &mut tasks, 0, count, Evaluators::default())
        .unwrap();
    drop(tasks);
    (outs, metrics)
}

// ── Parallel equivalence ─────────────────────────────────────────────

#[test]
fn parallel_matches_serial_vorticity() {
    let blocks = rotating_blocks(2, &[0.5, 1.0, 2.0, 4.0, 8.0]);
    let (serial, ms) = run_pass(&driver(2, false), "vorticity", &blocks, 1);
    let (parallel, mp) = run_pass(&driver(2, true), "vorticity", &blocks, 1);

    assert_eq!(serial, parallel);
    assert_eq!(ms.blocks, 5);
    assert_eq!(ms.cells, 5 * 36);
    assert_eq!(ms.stencil, mp.stencil);
    assert_eq!(ms.stencil.centered, 5 * 36 * 4);

    // Rigid rotation at rate w has vorticity 2w.
    for (out, w) in serial.iter().zip([0.5, 1.0, 2.0, 4.0, 8.0]) {
        assert!((out.get([3, 2, 0], 0) - 2.0 * w).abs() < 1e-9);
    }
}

#[test]
fn parallel_matches_serial_q_criterion() {
    let blocks = rotating_blocks(3, &[1.0, 3.0]);
    let (serial, _) = run_pass(&driver(3, false), "Qcrit", &blocks, 1);
    let (parallel, mp) = run_pass(&driver(3, true), "Qcrit", &blocks, 1);
    assert_eq!(serial, parallel);
    assert_eq!(mp.cells, 2 * 216);
    // Q = 2 w^2 for rotation about z.
    assert!((parallel[1].get([2, 2, 2], 0) - 18.0).abs() < 1e-9);
}

// ── Buffered records ─────────────────────────────────────────────────

#[test]
fn records_flushed_in_block_order() {
    let temperatures = [900.0, 1200.0, 1500.0, 1800.0];
    let blocks: Vec<BlockFixture> = temperatures
        .iter()
        .map(|&t| {
            let mut fx = BlockFixture::uniform_2d(3, 0);
            fx.fill_thermo_state(move |_| (FIXTURE_MASS_FRACTIONS, t));
            fx
        })
        .collect();
    let chemistry = MockChemistry::default();
    let evaluators = Evaluators {
        chemistry: Some(&chemistry),
        ..Evaluators::default()
    };

    let d = driver(2, true);
    let mut outs: Vec<FieldArray> = blocks.iter().map(|fx| fx.output(1)).collect();
    let mut tasks: Vec<BlockTask<'_>> = blocks
        .iter()
        .zip(outs.iter_mut())
        .map(|(fx, out)| {
            BlockTask::new(
                BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
                out,
            )
        })
        .collect();
    let mut sink = LogSink::new(Vec::new());
    let metrics = d
        .derive_blocks_logged("reaction_exergy", &mut tasks, 0, 1, evaluators, &mut sink)
        .unwrap();
    assert_eq!(metrics.logged_cells, 4 * 9);

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let logged: Vec<f64> = text
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split(", ").collect();
            assert_eq!(fields.len(), 4);
            fields[3].parse().unwrap()
        })
        .collect();
    let expected: Vec<f64> = temperatures
        .iter()
        .flat_map(|&t| std::iter::repeat(t).take(9))
        .collect();
    assert_eq!(logged, expected);
}

#[test]
fn configured_log_file_is_appended() {
    let path = std::env::temp_dir().join(format!("ember-cells-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let config = EngineConfig::builder(StateLayout::new(2, 3).unwrap())
        .cell_log(&path)
        .build()
        .unwrap();
    let d = DiagnosticsDriver::standard(config).unwrap();
    let fx = BlockFixture::uniform_2d(2, 0);
    let chemistry = MockChemistry::default();
    let evaluators = Evaluators {
        chemistry: Some(&chemistry),
        ..Evaluators::default()
    };

    for _ in 0..2 {
        let mut out = fx.output(1);
        let block = BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry);
        let metrics = d
            .derive("reaction_exergy", block, &mut out, 0, 1, evaluators)
            .unwrap();
        assert_eq!(metrics.logged_cells, 4);
    }
    // Kernels that do not log leave the file alone.
    let mut out = fx.output(1);
    let block = BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry);
    d.derive("temp", block, &mut out, 0, 1, Evaluators::default())
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 8);
    std::fs::remove_file(&path).unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_matches_serial_for_any_batch(
        rates in prop::collection::vec(-5.0f64..5.0, 1..6),
    ) {
        let blocks = rotating_blocks(2, &rates);
        let (serial, ms) = run_pass(&driver(2, false), "enstrophy", &blocks, 1);
        let (parallel, mp) = run_pass(&driver(2, true), "enstrophy", &blocks, 1);
        prop_assert_eq!(&serial, &parallel);
        prop_assert_eq!(ms.cells, mp.cells);
        prop_assert_eq!(ms.blocks, rates.len());
    }
}
