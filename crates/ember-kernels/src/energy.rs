//! Density-weighted kinetic quantities.
//!
//! Each kernel exists in two variants that differ only in where density
//! comes from: the state's density component, or the configured reference
//! density in incompressible mode. The registry pairs them under one name.

use ember_core::{DeriveError, DiagnosticsConfig, StateLayout};
use ember_derive::{Derive, DeriveContext};

use crate::access::velocity;
use crate::stencil::gradient_pass;

/// Where a kernel reads density from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DensitySource {
    /// The state's density component.
    #[default]
    State,
    /// [`DiagnosticsConfig::reference_density`].
    Reference,
}

impl DensitySource {
    fn state_components(self, layout: &StateLayout) -> usize {
        match self {
            Self::State => layout.density() + 1,
            Self::Reference => layout.velocity() + layout.ndim(),
        }
    }
}

/// `0.5 rho |u|^2`, registered as `kinetic_energy`.
///
/// Pointwise; cut and covered cells are not masked.
#[derive(Clone, Copy, Debug, Default)]
pub struct KineticEnergy {
    density: DensitySource,
}

impl KineticEnergy {
    /// Variant reading density from the state.
    pub fn compressible() -> Self {
        Self {
            density: DensitySource::State,
        }
    }

    /// Variant using the reference density.
    pub fn incompressible() -> Self {
        Self {
            density: DensitySource::Reference,
        }
    }

    /// Density source of this variant.
    pub fn density_source(&self) -> DensitySource {
        self.density
    }
}

impl Derive for KineticEnergy {
    fn name(&self) -> &str {
        "kinetic_energy"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        self.density.state_components(layout)
    }

    fn requires_compressible(&self) -> bool {
        self.density == DensitySource::State
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let state = ctx.state();
        let layout = ctx.layout();
        let rho_ref = ctx.config().reference_density();
        for cell in ctx.region().cells() {
            let rho = match self.density {
                DensitySource::State => state.get(cell, layout.density()),
                DensitySource::Reference => rho_ref,
            };
            let u = velocity(state, layout, cell);
            let u2: f64 = u.iter().map(|v| v * v).sum();
            ctx.out().set(cell, 0, 0.5 * rho * u2);
        }
        Ok(())
    }
}

/// `0.5 rho |curl(u)|^2`, registered as `enstrophy`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Enstrophy {
    density: DensitySource,
}

impl Enstrophy {
    /// Variant reading density from the state.
    pub fn compressible() -> Self {
        Self {
            density: DensitySource::State,
        }
    }

    /// Variant using the reference density.
    pub fn incompressible() -> Self {
        Self {
            density: DensitySource::Reference,
        }
    }

    /// Density source of this variant.
    pub fn density_source(&self) -> DensitySource {
        self.density
    }
}

impl Derive for Enstrophy {
    fn name(&self) -> &str {
        "enstrophy"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        self.density.state_components(layout)
    }

    fn ghost_cells(&self) -> i32 {
        2
    }

    fn requires_compressible(&self) -> bool {
        self.density == DensitySource::State
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let state = ctx.state();
        let density = ctx.layout().density();
        let rho_ref = ctx.config().reference_density();
        let source = self.density;
        gradient_pass(ctx, |out, cell, g| {
            let rho = match source {
                DensitySource::State => state.get(cell, density),
                DensitySource::Reference => rho_ref,
            };
            out.set(cell, 0, 0.5 * rho * g.vorticity_squared());
        })
    }
}
