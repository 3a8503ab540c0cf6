//! Mixing and reaction-progress scalars.
//!
//! Pure per-cell affine maps of the composition (and temperature). No stencil
//! is involved and no cut-cell masking is applied. Both kernels fail with
//! [`DeriveError::NotInitialized`] before touching any cell if their mapping
//! has not been configured.

use ember_core::{DeriveError, DiagnosticsConfig, SpeciesVec, StateLayout};
use ember_derive::{Derive, DeriveContext};

use crate::access::{mass_fractions, require_species};

fn dot(weights: &[f64], y: &[f64]) -> f64 {
    weights.iter().zip(y).map(|(w, y)| w * y).sum()
}

/// Bilger mixture fraction, registered as `mixture_fraction`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MixtureFraction;

impl Derive for MixtureFraction {
    fn name(&self) -> &str {
        "mixture_fraction"
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
        let params = ctx.config().mixture_fraction().get("mixture fraction")?;
        let layout = ctx.layout();
        require_species("mixture fraction weights", params.bilger_weights().len(), layout)?;
        let state = ctx.state();
        let scale = 1.0 / (params.z_fu() - params.z_ox());
        let mut y = SpeciesVec::new();
        for cell in ctx.region().cells() {
            mass_fractions(state, layout, cell, &mut y);
            let z = (dot(params.bilger_weights(), &y) - params.z_ox()) * scale;
            ctx.out().set(cell, 0, z);
        }
        Ok(())
    }
}

/// Normalized progress variable, registered as `progress_variable`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressVariable;

impl Derive for ProgressVariable {
    fn name(&self) -> &str {
        "progress_variable"
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
        let params = ctx.config().progress_variable().get("progress variable")?;
        let layout = ctx.layout();
        require_species("progress variable weights", params.species_weights().len(), layout)?;
        let state = ctx.state();
        let scale = 1.0 / (params.c1() - params.c0());
        let mut y = SpeciesVec::new();
        for cell in ctx.region().cells() {
            mass_fractions(state, layout, cell, &mut y);
            let t = state.get(cell, layout.temperature());
            let raw = dot(params.species_weights(), &y) + t * params.temperature_weight();
            let c = (raw - params.c0()) * scale;
            ctx.out().set(cell, 0, if params.reverse() { 1.0 - c } else { c });
        }
        Ok(())
    }
}
