//! Mixture fraction and progress variable at their reference states.

use ember_core::{
    DeriveError, DiagnosticsConfig, Evaluators, MixtureFractionParams, ProgressVariableParams,
};
use ember_derive::{BlockView, Derive, DeriveContext, DerivedField, ScratchRegion};
use ember_grid::{CellFlag, FieldArray};
use ember_kernels::{MixtureFraction, ProgressVariable};
use ember_test_utils::BlockFixture;
use proptest::prelude::*;

const OXIDIZER: [f64; 3] = [0.0, 0.77, 0.23];
const FUEL: [f64; 3] = [0.9, 0.0, 0.1];

fn run(kernel: &dyn Derive, fx: &BlockFixture, config: &DiagnosticsConfig) -> FieldArray {
    let mut out = fx.output(1);
    let mut scratch = ScratchRegion::new(0);
    let mut ctx = DeriveContext::new(
        BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
        &fx.layout,
        config,
        Evaluators::default(),
        DerivedField::new(&mut out, 0, 1).unwrap(),
        &mut scratch,
    );
    kernel.derive(&mut ctx).unwrap();
    drop(ctx);
    out
}

/// Oxidizer on the left half of the block, fuel on the right.
fn two_stream_block() -> BlockFixture {
    let mut fx = BlockFixture::uniform_2d(4, 0);
    fx.fill_thermo_state(|x| if x[0] < 0.2 { (OXIDIZER, 300.0) } else { (FUEL, 2100.0) });
    fx
}

#[test]
fn mixture_fraction_spans_zero_to_one() {
    let params =
        MixtureFractionParams::from_streams(vec![0.75, -0.125, 0.0], &OXIDIZER, &FUEL).unwrap();
    let config = DiagnosticsConfig::builder()
        .mixture_fraction(params)
        .build()
        .unwrap();
    let fx = two_stream_block();
    let z = run(&MixtureFraction, &fx, &config);
    for cell in fx.region.cells() {
        let expected = if cell[0] < 2 { 0.0 } else { 1.0 };
        assert!((z.get(cell, 0) - expected).abs() < 1e-12, "{cell:?}");
    }
}

#[test]
fn progress_variable_endpoints_swap_when_reversed() {
    let weights = vec![0.0, -1.0, 1.0];
    let config = |reverse| {
        let params = ProgressVariableParams::from_states(
            weights.clone(),
            1.0e-4,
            (&OXIDIZER, 300.0),
            (&FUEL, 2100.0),
            reverse,
        )
        .unwrap();
        DiagnosticsConfig::builder()
            .progress_variable(params)
            .build()
            .unwrap()
    };
    let fx = two_stream_block();
    let forward = run(&ProgressVariable, &fx, &config(false));
    let reversed = run(&ProgressVariable, &fx, &config(true));
    let unburnt = [0, 0, 0];
    let burnt = [3, 3, 0];
    assert!(forward.get(unburnt, 0).abs() < 1e-12);
    assert!((forward.get(burnt, 0) - 1.0).abs() < 1e-12);
    assert!((reversed.get(unburnt, 0) - 1.0).abs() < 1e-12);
    assert!(reversed.get(burnt, 0).abs() < 1e-12);
}

#[test]
fn scalars_ignore_cell_classification() {
    let params =
        MixtureFractionParams::from_streams(vec![1.0, 0.0, 0.0], &OXIDIZER, &FUEL).unwrap();
    let config = DiagnosticsConfig::builder()
        .mixture_fraction(params)
        .build()
        .unwrap();
    let mut fx = two_stream_block();
    let before = run(&MixtureFraction, &fx, &config);
    fx.set_flag([3, 1, 0], CellFlag::covered());
    fx.set_flag([0, 2, 0], CellFlag::cut());
    let after = run(&MixtureFraction, &fx, &config);
    assert_eq!(before, after);
}

#[test]
fn configuration_is_checked_before_any_cell() {
    let fx = two_stream_block();
    let mut out = fx.output(1);
    out.fill(0, -7.0).unwrap();
    let mut scratch = ScratchRegion::new(0);
    let config = DiagnosticsConfig::default();
    let mut ctx = DeriveContext::new(
        BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
        &fx.layout,
        &config,
        Evaluators::default(),
        DerivedField::new(&mut out, 0, 1).unwrap(),
        &mut scratch,
    );
    assert!(matches!(
        ProgressVariable.derive(&mut ctx),
        Err(DeriveError::NotInitialized { .. })
    ));
    drop(ctx);
    assert!(out.as_slice().iter().all(|&v| v == -7.0));
}

proptest! {
    #[test]
    fn mixture_fraction_is_linear_in_mixing(s in 0.0f64..1.0) {
        let params =
            MixtureFractionParams::from_streams(vec![0.75, -0.125, 0.0], &OXIDIZER, &FUEL).unwrap();
        let config = DiagnosticsConfig::builder()
            .mixture_fraction(params)
            .build()
            .unwrap();
        let mut mix = [0.0; 3];
        for n in 0..3 {
            mix[n] = (1.0 - s) * OXIDIZER[n] + s * FUEL[n];
        }
        let mut fx = BlockFixture::uniform_2d(1, 0);
        fx.set_thermo_state([0, 0, 0], &mix, 800.0);
        let z = run(&MixtureFraction, &fx, &config);
        prop_assert!((z.get([0, 0, 0], 0) - s).abs() < 1e-10);
    }
}
