//! Transport coefficient dispatch.
//!
//! [`dispatch`] is the only place that branches on [`ClosureModel`]: each
//! cell triggers exactly one evaluator call. The result is laid out as
//!
//! ```text
//! out[0 .. NS]        rho * D_n
//! out[NS .. 2NS]      rho * theta_n   (Soret only)
//! scratch[0 .. N]     viscosity, one slot per region cell
//! scratch[N .. 2N]    conductivity
//! ```
//!
//! The three kernels differ only in which closure they request and which
//! part of that layout they publish.

use ember_core::{
    ClosureModel, DeriveError, DiagnosticsConfig, SpeciesVec, StateLayout, TransportCoefficients,
    TransportEvaluator,
};
use ember_derive::{Derive, DeriveContext, DerivedField, Input};
use ember_grid::IndexBox;

use crate::access::{mass_fractions, require_species};

const TRANSPORT: &[Input] = &[Input::Transport];

/// Call the evaluator variant selected by `closure`.
pub fn evaluate(
    transport: &dyn TransportEvaluator,
    closure: ClosureModel,
    config: &DiagnosticsConfig,
    density: f64,
    mass_fractions: &[f64],
    temperature: f64,
) -> TransportCoefficients {
    match closure {
        ClosureModel::MixtureAveraged => {
            transport.mixture_averaged(density, mass_fractions, temperature)
        }
        ClosureModel::UnityLewis => transport.unity_lewis(
            density,
            mass_fractions,
            temperature,
            config.schmidt_inv(),
            config.prandtl_inv(),
        ),
        ClosureModel::MixtureAveragedSoret => {
            transport.mixture_averaged_soret(density, mass_fractions, temperature)
        }
    }
}

/// Evaluate `closure` over the region and hand the staged viscosity and
/// conductivity to `publish`.
///
/// Diffusivities are written to the output only when `diffusivities` is set.
fn dispatch(
    ctx: &mut DeriveContext<'_>,
    closure: ClosureModel,
    diffusivities: bool,
    publish: impl FnOnce(&mut DerivedField<'_>, &[f64], &[f64]),
) -> Result<(), DeriveError> {
    let transport = ctx.evaluators().transport()?;
    let config = ctx.config();
    let layout = ctx.layout();
    let state = ctx.state();
    let region = ctx.region();
    let ns = layout.num_species();
    let cells = region.cell_count();

    let (out, scratch) = ctx.out_and_scratch();
    let staged = scratch
        .alloc(2 * cells)
        .ok_or_else(|| DeriveError::ExecutionFailed {
            reason: format!("transport staging needs {} scratch slots", 2 * cells),
        })?;
    let (viscosity, conductivity) = staged.split_at_mut(cells);

    let mut y = SpeciesVec::new();
    for (i, cell) in region.cells().enumerate() {
        let rho = mass_fractions(state, layout, cell, &mut y);
        let t = state.get(cell, layout.temperature());
        let coeffs = evaluate(transport, closure, config, rho, &y, t);
        viscosity[i] = coeffs.viscosity;
        conductivity[i] = coeffs.conductivity;
        if !diffusivities {
            continue;
        }
        require_species("transport evaluator", coeffs.rho_d.len(), layout)?;
        for (n, d) in coeffs.rho_d.iter().enumerate() {
            out.set(cell, n, *d);
        }
        if closure.has_soret() {
            let theta = coeffs.rho_theta.as_ref().ok_or(DeriveError::MissingInput {
                input: "Soret coefficients",
            })?;
            require_species("transport evaluator", theta.len(), layout)?;
            for (n, d) in theta.iter().enumerate() {
                out.set(cell, ns + n, *d);
            }
        }
    }
    publish(out, viscosity, conductivity);
    Ok(())
}

fn staging_bytes(cells: usize) -> usize {
    2 * cells * std::mem::size_of::<f64>()
}

fn publish_staged(out: &mut DerivedField<'_>, region: IndexBox, values: &[f64]) {
    for (cell, v) in region.cells().zip(values) {
        out.set(cell, 0, *v);
    }
}

// ── diffcoeff ──────────────────────────────────────────────────────

/// Species diffusion coefficients, registered as `diffcoeff`.
///
/// `NS` components, or `2 NS` when the closure carries Soret coefficients.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiffusionCoefficients;

impl Derive for DiffusionCoefficients {
    fn name(&self) -> &str {
        "diffcoeff"
    }

    fn arity(&self, layout: &StateLayout, config: &DiagnosticsConfig) -> usize {
        if config.closure().has_soret() {
            2 * layout.num_species()
        } else {
            layout.num_species()
        }
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.temperature() + 1
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        TRANSPORT
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn scratch_bytes(&self, _layout: &StateLayout, cells: usize) -> usize {
        staging_bytes(cells)
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let closure = ctx.config().closure();
        dispatch(ctx, closure, true, |_, _, _| {})
    }
}

// ── viscosity ──────────────────────────────────────────────────────

/// Dynamic viscosity, registered as `viscosity`.
///
/// The compressible variant evaluates the configured closure (Soret requests
/// fall back to plain mixture-averaged, which yields the same viscosity).
/// The reference variant fills the configured reference viscosity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Viscosity {
    reference: bool,
}

impl Viscosity {
    /// Variant evaluating the transport closure.
    pub fn compressible() -> Self {
        Self { reference: false }
    }

    /// Variant reporting [`DiagnosticsConfig::reference_viscosity`].
    pub fn reference() -> Self {
        Self { reference: true }
    }
}

impl Derive for Viscosity {
    fn name(&self) -> &str {
        "viscosity"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        if self.reference {
            0
        } else {
            layout.temperature() + 1
        }
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        if self.reference {
            &[]
        } else {
            TRANSPORT
        }
    }

    fn requires_compressible(&self) -> bool {
        !self.reference
    }

    fn scratch_bytes(&self, _layout: &StateLayout, cells: usize) -> usize {
        if self.reference {
            0
        } else {
            staging_bytes(cells)
        }
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let region = ctx.region();
        if self.reference {
            let mu = ctx.config().reference_viscosity();
            for cell in region.cells() {
                ctx.out().set(cell, 0, mu);
            }
            return Ok(());
        }
        let closure = match ctx.config().closure() {
            ClosureModel::MixtureAveragedSoret => ClosureModel::MixtureAveraged,
            other => other,
        };
        dispatch(ctx, closure, false, |out, viscosity, _| {
            publish_staged(out, region, viscosity)
        })
    }
}

// ── lambda ─────────────────────────────────────────────────────────

/// Thermal conductivity, registered as `lambda`.
///
/// Unity Lewis if configured, mixture-averaged otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct Conductivity;

impl Derive for Conductivity {
    fn name(&self) -> &str {
        "lambda"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.temperature() + 1
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        TRANSPORT
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn scratch_bytes(&self, _layout: &StateLayout, cells: usize) -> usize {
        staging_bytes(cells)
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let region = ctx.region();
        let closure = match ctx.config().closure() {
            ClosureModel::UnityLewis => ClosureModel::UnityLewis,
            _ => ClosureModel::MixtureAveraged,
        };
        dispatch(ctx, closure, false, |out, _, conductivity| {
            publish_staged(out, region, conductivity)
        })
    }
}
