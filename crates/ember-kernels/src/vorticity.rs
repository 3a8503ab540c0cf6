//! Vorticity kernels.
//!
//! Both kernels are thin assemblies over [`gradient_pass`]: the velocity
//! gradient is built once per cell and the curl taken from it. Covered cells
//! yield 0.

use ember_core::{DeriveError, DiagnosticsConfig, StateLayout};
use ember_derive::{Derive, DeriveContext};

use crate::stencil::gradient_pass;

/// `|curl(u)|`, registered as `mag_vort`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VorticityMagnitude;

impl Derive for VorticityMagnitude {
    fn name(&self) -> &str {
        "mag_vort"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.velocity() + layout.ndim()
    }

    fn ghost_cells(&self) -> i32 {
        2
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        gradient_pass(ctx, |out, cell, g| {
            out.set(cell, 0, g.vorticity_squared().sqrt());
        })
    }
}

/// Signed vorticity, registered as `vorticity`.
///
/// One component in 2-D (`dv/dx - du/dy`), three in 3-D.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vorticity;

impl Derive for Vorticity {
    fn name(&self) -> &str {
        "vorticity"
    }

    fn arity(&self, layout: &StateLayout, _: &DiagnosticsConfig) -> usize {
        if layout.ndim() == 3 {
            3
        } else {
            1
        }
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.velocity() + layout.ndim()
    }

    fn ghost_cells(&self) -> i32 {
        2
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let ndim = ctx.layout().ndim();
        gradient_pass(ctx, |out, cell, g| {
            let w = g.vorticity();
            if ndim == 3 {
                for (comp, value) in w.iter().enumerate() {
                    out.set(cell, comp, *value);
                }
            } else {
                out.set(cell, 0, w[2]);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Evaluators;
    use ember_derive::{BlockView, DerivedField, ScratchRegion};
    use ember_grid::FieldArray;
    use ember_test_utils::BlockFixture;

    fn run(kernel: &dyn Derive, fx: &BlockFixture, ncomp: usize) -> FieldArray {
        let config = DiagnosticsConfig::default();
        let mut out = fx.output(ncomp);
        let mut scratch = ScratchRegion::new(0);
        let mut ctx = DeriveContext::new(
            BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
            &fx.layout,
            &config,
            Evaluators::default(),
            DerivedField::new(&mut out, 0, ncomp).unwrap(),
            &mut scratch,
        );
        kernel.derive(&mut ctx).unwrap();
        drop(ctx);
        out
    }

    #[test]
    fn rigid_rotation_2d() {
        let mut fx = BlockFixture::uniform_2d(4, 2);
        fx.set_velocity(|x| [-3.0 * x[1], 3.0 * x[0], 0.0]);
        let signed = run(&Vorticity, &fx, 1);
        let mag = run(&VorticityMagnitude, &fx, 1);
        for cell in fx.region.cells() {
            assert!((signed.get(cell, 0) - 6.0).abs() < 1e-10);
            assert!((mag.get(cell, 0) - 6.0).abs() < 1e-10);
        }
    }

    #[test]
    fn curl_components_3d() {
        // u = (z, x, y): curl = (1, 1, 1).
        let mut fx = BlockFixture::uniform_3d(3, 2);
        fx.set_velocity(|x| [x[2], x[0], x[1]]);
        let w = run(&Vorticity, &fx, 3);
        let mag = run(&VorticityMagnitude, &fx, 1);
        for cell in fx.region.cells() {
            for comp in 0..3 {
                assert!((w.get(cell, comp) - 1.0).abs() < 1e-10);
            }
            assert!((mag.get(cell, 0) - 3f64.sqrt()).abs() < 1e-10);
        }
    }

    #[test]
    fn arity_follows_dimension() {
        let config = DiagnosticsConfig::default();
        let l2 = StateLayout::new(2, 3).unwrap();
        let l3 = StateLayout::new(3, 3).unwrap();
        assert_eq!(Vorticity.arity(&l2, &config), 1);
        assert_eq!(Vorticity.arity(&l3, &config), 3);
        assert_eq!(VorticityMagnitude.state_components(&l3), 3);
    }
}
