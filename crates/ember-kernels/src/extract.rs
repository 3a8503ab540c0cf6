//! Pointwise extraction kernels.
//!
//! Copies and simple per-cell reductions of the state, plus the two kernels
//! that read secondary inputs: nodal pressure and species production rates.

use ember_core::{DeriveError, DiagnosticsConfig, SpeciesVec, StateLayout};
use ember_derive::{Derive, DeriveContext, Input};

use crate::access::{mass_fractions, require_box, require_species, velocity};

// ── temp ───────────────────────────────────────────────────────────

/// Temperature, registered as `temp`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Temperature;

impl Derive for Temperature {
    fn name(&self) -> &str {
        "temp"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.temperature() + 1
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let state = ctx.state();
        let comp = ctx.layout().temperature();
        for cell in ctx.region().cells() {
            ctx.out().set(cell, 0, state.get(cell, comp));
        }
        Ok(())
    }
}

// ── mass_fractions / mole_fractions ────────────────────────────────

/// `rhoY_n / rho`, registered as `mass_fractions`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MassFractions;

impl Derive for MassFractions {
    fn name(&self) -> &str {
        "mass_fractions"
    }

    fn arity(&self, layout: &StateLayout, _: &DiagnosticsConfig) -> usize {
        layout.num_species()
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.first_species() + layout.num_species()
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let state = ctx.state();
        let layout = ctx.layout();
        let mut y = SpeciesVec::new();
        for cell in ctx.region().cells() {
            mass_fractions(state, layout, cell, &mut y);
            for (n, v) in y.iter().enumerate() {
                ctx.out().set(cell, n, *v);
            }
        }
        Ok(())
    }
}

/// Mole fractions, registered as `mole_fractions`.
///
/// Converted through the thermodynamics evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoleFractions;

impl Derive for MoleFractions {
    fn name(&self) -> &str {
        "mole_fractions"
    }

    fn arity(&self, layout: &StateLayout, _: &DiagnosticsConfig) -> usize {
        layout.num_species()
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.first_species() + layout.num_species()
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        &[Input::Thermodynamics]
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let thermo = ctx.evaluators().thermo()?;
        let state = ctx.state();
        let layout = ctx.layout();
        require_species("thermodynamics evaluator", thermo.num_species(), layout)?;
        let mut y = SpeciesVec::new();
        let mut x: SpeciesVec = smallvec::smallvec![0.0; layout.num_species()];
        for cell in ctx.region().cells() {
            mass_fractions(state, layout, cell, &mut y);
            thermo.mass_to_mole(&y, &mut x);
            for (n, v) in x.iter().enumerate() {
                ctx.out().set(cell, n, *v);
            }
        }
        Ok(())
    }
}

// ── rhominsumrhoY ──────────────────────────────────────────────────

/// `rho - sum_n rhoY_n`, registered as `rhominsumrhoY`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RhoMinusSumRhoY;

impl Derive for RhoMinusSumRhoY {
    fn name(&self) -> &str {
        "rhominsumrhoY"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.first_species() + layout.num_species()
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let state = ctx.state();
        let layout = ctx.layout();
        for cell in ctx.region().cells() {
            let sum: f64 = (0..layout.num_species())
                .map(|n| state.get(cell, layout.first_species() + n))
                .sum();
            ctx.out().set(cell, 0, state.get(cell, layout.density()) - sum);
        }
        Ok(())
    }
}

// ── mag_vel ────────────────────────────────────────────────────────

/// `|u|`, registered as `mag_vel`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityMagnitude;

impl Derive for VelocityMagnitude {
    fn name(&self) -> &str {
        "mag_vel"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.velocity() + layout.ndim()
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let state = ctx.state();
        let layout = ctx.layout();
        for cell in ctx.region().cells() {
            let u = velocity(state, layout, cell);
            ctx.out()
                .set(cell, 0, u.iter().map(|v| v * v).sum::<f64>().sqrt());
        }
        Ok(())
    }
}

// ── avg_pressure ───────────────────────────────────────────────────

/// Cell average of the node-centered pressure, registered as `avg_pressure`.
///
/// Mean of the `2^ndim` nodes surrounding each cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct AveragePressure;

impl Derive for AveragePressure {
    fn name(&self) -> &str {
        "avg_pressure"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, _layout: &StateLayout) -> usize {
        0
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        &[Input::NodalPressure]
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let pressure = ctx.pressure()?;
        let region = ctx.region();
        let ndim = ctx.geometry().ndim();
        require_box("nodal pressure", pressure, &region.surrounding_nodes(ndim))?;
        let corners = 1usize << ndim;
        let weight = 1.0 / corners as f64;
        for cell in region.cells() {
            let mut sum = 0.0;
            for corner in 0..corners {
                let mut node = cell;
                for (d, n) in node.iter_mut().enumerate().take(ndim) {
                    *n += ((corner >> d) & 1) as i32;
                }
                sum += pressure.get(node, 0);
            }
            ctx.out().set(cell, 0, sum * weight);
        }
        Ok(())
    }
}

// ── coordinates ────────────────────────────────────────────────────

/// Physical cell positions, registered as `coordinates`.
///
/// Cut cells report their centroid rather than the cell center.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coordinates;

impl Derive for Coordinates {
    fn name(&self) -> &str {
        "coordinates"
    }

    fn arity(&self, layout: &StateLayout, _: &DiagnosticsConfig) -> usize {
        layout.ndim()
    }

    fn state_components(&self, _layout: &StateLayout) -> usize {
        0
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let geometry = ctx.geometry();
        let flags = ctx.flags();
        let ndim = geometry.ndim();
        for cell in ctx.region().cells() {
            let x = if flags.flag(cell).is_cut() {
                geometry.offset_center(cell, flags.centroid(cell))
            } else {
                geometry.cell_center(cell)
            };
            for (d, v) in x.iter().enumerate().take(ndim) {
                ctx.out().set(cell, d, *v);
            }
        }
        Ok(())
    }
}

// ── heatRelease ────────────────────────────────────────────────────

/// Heat release rate `-sum_n h_n(T) wdot_n`, registered as `heatRelease`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeatRelease;

impl Derive for HeatRelease {
    fn name(&self) -> &str {
        "heatRelease"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.temperature() + 1
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        &[Input::Reactions, Input::Thermodynamics]
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let thermo = ctx.evaluators().thermo()?;
        let reactions = ctx.reactions()?;
        let state = ctx.state();
        let layout = ctx.layout();
        let region = ctx.region();
        require_box("reaction rates", reactions, &region)?;
        require_species("reaction rates", reactions.ncomp(), layout)?;
        require_species("thermodynamics evaluator", thermo.num_species(), layout)?;
        let mut h: SpeciesVec = smallvec::smallvec![0.0; layout.num_species()];
        for cell in region.cells() {
            thermo.species_enthalpies(state.get(cell, layout.temperature()), &mut h);
            let q: f64 = h
                .iter()
                .enumerate()
                .map(|(n, h)| h * reactions.get(cell, n))
                .sum();
            ctx.out().set(cell, 0, -q);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Evaluators, Thermodynamics};
    use ember_derive::{BlockView, DerivedField, ScratchRegion};
    use ember_grid::{Axis, CellFlag, FieldArray, Side};
    use ember_test_utils::fixtures::FIXTURE_MASS_FRACTIONS;
    use ember_test_utils::BlockFixture;

    fn run_view(
        kernel: &dyn Derive,
        fx: &BlockFixture,
        view: BlockView<'_>,
    ) -> Result<FieldArray, DeriveError> {
        let config = DiagnosticsConfig::default();
        let ncomp = kernel.arity(&fx.layout, &config);
        let mut out = fx.output(ncomp);
        let mut scratch = ScratchRegion::new(0);
        let evaluators = Evaluators {
            thermo: Some(&fx.thermo),
            ..Evaluators::default()
        };
        let mut ctx = DeriveContext::new(
            view,
            &fx.layout,
            &config,
            evaluators,
            DerivedField::new(&mut out, 0, ncomp).unwrap(),
            &mut scratch,
        );
        kernel.derive(&mut ctx)?;
        drop(ctx);
        Ok(out)
    }

    fn run(kernel: &dyn Derive, fx: &BlockFixture) -> Result<FieldArray, DeriveError> {
        run_view(
            kernel,
            fx,
            BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
        )
    }

    #[test]
    fn species_extraction() {
        let fx = BlockFixture::uniform_2d(2, 0);
        let y = run(&MassFractions, &fx).unwrap();
        let x = run(&MoleFractions, &fx).unwrap();
        let residual = run(&RhoMinusSumRhoY, &fx).unwrap();
        let mut expected_x = [0.0; 3];
        fx.thermo.mass_to_mole(&FIXTURE_MASS_FRACTIONS, &mut expected_x);
        for cell in fx.region.cells() {
            for n in 0..3 {
                assert!((y.get(cell, n) - FIXTURE_MASS_FRACTIONS[n]).abs() < 1e-12);
                assert!((x.get(cell, n) - expected_x[n]).abs() < 1e-12);
            }
            assert!(residual.get(cell, 0).abs() < 1e-12);
        }
    }

    #[test]
    fn temperature_and_velocity_magnitude() {
        let mut fx = BlockFixture::uniform_3d(2, 0);
        fx.set_velocity(|_| [1.0, 2.0, 2.0]);
        let t = run(&Temperature, &fx).unwrap();
        let u = run(&VelocityMagnitude, &fx).unwrap();
        assert_eq!(t.get([1, 1, 1], 0), 1000.0);
        assert!((u.get([1, 1, 1], 0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn average_pressure_of_bilinear_field() {
        let mut fx = BlockFixture::uniform_2d(3, 0);
        let nodes = fx.pressure.bx();
        fx.pressure = FieldArray::from_fn(nodes, 1, |n, _| (n[0] + 10 * n[1]) as f64);
        let view = BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry)
            .with_pressure(&fx.pressure);
        let p = run_view(&AveragePressure, &fx, view).unwrap();
        assert_eq!(p.get([1, 2, 0], 0), 1.5 + 25.0);
    }

    #[test]
    fn average_pressure_needs_surrounding_nodes() {
        let fx = BlockFixture::uniform_2d(3, 0);
        let short = FieldArray::new(fx.region, 1);
        let view =
            BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry).with_pressure(&short);
        assert!(matches!(
            run_view(&AveragePressure, &fx, view),
            Err(DeriveError::RegionNotContained {
                buffer: "nodal pressure",
                ..
            })
        ));
        assert!(matches!(
            run(&AveragePressure, &fx),
            Err(DeriveError::MissingInput { .. })
        ));
    }

    #[test]
    fn coordinates_use_cut_cell_centroid() {
        let mut fx = BlockFixture::uniform_2d(2, 0);
        fx.set_flag([1, 1, 0], CellFlag::cut().disconnect(Axis::Y, Side::Hi));
        fx.flags.set_centroid([1, 1, 0], [0.25, -0.5, 0.0]).unwrap();
        let x = run(&Coordinates, &fx).unwrap();
        assert!((x.get([0, 1, 0], 0) - 0.05).abs() < 1e-12);
        assert!((x.get([1, 1, 0], 0) - 0.175).abs() < 1e-12);
        assert!((x.get([1, 1, 0], 1) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn heat_release_sums_species_enthalpy_rates() {
        let mut fx = BlockFixture::uniform_2d(2, 0);
        for cell in fx.region.cells() {
            fx.reactions.set(cell, 0, -1.0);
            fx.reactions.set(cell, 1, -2.0);
            fx.reactions.set(cell, 2, 3.0);
        }
        let view = BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry)
            .with_reactions(&fx.reactions);
        let q = run_view(&HeatRelease, &fx, view).unwrap();
        let mut h = [0.0; 3];
        fx.thermo.species_enthalpies(1000.0, &mut h);
        let expected = h[0] + 2.0 * h[1] - 3.0 * h[2];
        assert!((q.get([0, 0, 0], 0) - expected).abs() < 1e-6 * expected.abs());
    }
}
