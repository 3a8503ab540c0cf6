//! The [`Derive`] trait.
//!
//! A kernel is stateless. It declares, once at registration, what it needs
//! from a block (state components, ghost cells, secondary inputs) so the
//! driver can validate requests before any cell is touched.

use ember_core::{DeriveError, DiagnosticsConfig, StateLayout};

use crate::context::DeriveContext;

/// A secondary input a kernel may require beyond the state array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// Species production rates (one component per species).
    Reactions,
    /// Node-centered pressure.
    NodalPressure,
    /// Thermodynamics evaluator.
    Thermodynamics,
    /// Transport evaluator.
    Transport,
    /// Chemistry evaluator.
    Chemistry,
}

/// A diagnostic kernel evaluated over one grid block at a time.
///
/// # Contract
///
/// - `derive()` writes exactly `arity()` components for every cell of the
///   context's region and nothing else.
/// - Declarations (`arity`, `state_components`, `ghost_cells`, `inputs`) are
///   pure functions of their arguments.
///
/// # Examples
///
/// ```
/// use ember_core::{DeriveError, DiagnosticsConfig, StateLayout};
/// use ember_derive::{Derive, DeriveContext};
///
/// struct Density;
///
/// impl Derive for Density {
///     fn name(&self) -> &str { "density" }
///
///     fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize { 1 }
///
///     fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
///         let state = ctx.state();
///         let comp = ctx.layout().density();
///         for cell in ctx.region().cells() {
///             ctx.out().set(cell, 0, state.get(cell, comp));
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(Density.ghost_cells(), 0);
/// ```
pub trait Derive: Send + Sync + 'static {
    /// Registry name.
    fn name(&self) -> &str;

    /// Number of output components for this layout and configuration.
    fn arity(&self, layout: &StateLayout, config: &DiagnosticsConfig) -> usize;

    /// Number of leading state components the kernel reads.
    ///
    /// Default: the full layout.
    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.nvar()
    }

    /// Ghost cells of state the kernel reads around the region.
    ///
    /// Default: 0 (pointwise).
    fn ghost_cells(&self) -> i32 {
        0
    }

    /// Secondary inputs the kernel requires.
    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        &[]
    }

    /// Whether the kernel reads the density field and so cannot run in
    /// incompressible mode.
    fn requires_compressible(&self) -> bool {
        false
    }

    /// Whether the kernel is defined for blocks of dimensionality `ndim`.
    fn supports_ndim(&self, _ndim: usize) -> bool {
        true
    }

    /// Scratch memory required **in bytes** for a block of `cells` cells.
    fn scratch_bytes(&self, _layout: &StateLayout, _cells: usize) -> usize {
        0
    }

    /// Evaluate the diagnostic over the context's region.
    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError>;
}
