//! Q-criterion.

use ember_core::{DeriveError, DiagnosticsConfig, StateLayout};
use ember_derive::{Derive, DeriveContext};

use crate::stencil::gradient_pass;

/// Second invariant of the velocity gradient, registered as `Qcrit`.
///
/// `Q = sum_ij (Omega_ij^2 - S_ij^2)` over the full 3x3 tensor, with the
/// dilatation removed from the strain-rate diagonal. Positive where rotation
/// dominates strain. Defined for 3-D blocks only.
#[derive(Clone, Copy, Debug, Default)]
pub struct QCriterion;

impl Derive for QCriterion {
    fn name(&self) -> &str {
        "Qcrit"
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

    fn supports_ndim(&self, ndim: usize) -> bool {
        ndim == 3
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let ndim = ctx.layout().ndim();
        if !self.supports_ndim(ndim) {
            return Err(DeriveError::UnsupportedDimension {
                name: self.name().into(),
                ndim,
            });
        }
        gradient_pass(ctx, |out, cell, g| out.set(cell, 0, g.q_criterion()))
    }
}
