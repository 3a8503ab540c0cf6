//! Per-cell state access shared by kernels.

use ember_core::{DeriveError, SpeciesVec, StateLayout};
use ember_grid::{FieldArray, IndexBox, IntVect};

/// Density and mass fractions `Y_n = rhoY_n / rho` of one cell.
///
/// `out` is cleared and refilled with one entry per species.
#[inline]
pub fn mass_fractions(
    state: &FieldArray,
    layout: &StateLayout,
    cell: IntVect,
    out: &mut SpeciesVec,
) -> f64 {
    let rho = state.get(cell, layout.density());
    let rho_inv = 1.0 / rho;
    out.clear();
    out.extend(
        (0..layout.num_species()).map(|n| state.get(cell, layout.first_species() + n) * rho_inv),
    );
    rho
}

/// Velocity vector of one cell; components beyond `ndim` are 0.
#[inline]
pub fn velocity(state: &FieldArray, layout: &StateLayout, cell: IntVect) -> [f64; 3] {
    let mut u = [0.0; 3];
    for (d, v) in u.iter_mut().enumerate().take(layout.ndim()) {
        *v = state.get(cell, layout.velocity() + d);
    }
    u
}

/// Fail with [`DeriveError::RegionNotContained`] unless `array` covers `region`.
pub fn require_box(
    buffer: &'static str,
    array: &FieldArray,
    region: &IndexBox,
) -> Result<(), DeriveError> {
    if array.bx().contains_box(region) {
        Ok(())
    } else {
        Err(DeriveError::RegionNotContained {
            buffer,
            region_lo: region.lo(),
            region_hi: region.hi(),
        })
    }
}

/// Fail with [`DeriveError::SpeciesMismatch`] unless `got` matches the layout.
pub fn require_species(
    origin: &'static str,
    got: usize,
    layout: &StateLayout,
) -> Result<(), DeriveError> {
    if got == layout.num_species() {
        Ok(())
    } else {
        Err(DeriveError::SpeciesMismatch {
            origin,
            got,
            expected: layout.num_species(),
        })
    }
}
