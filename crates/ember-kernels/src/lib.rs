//! Cut-cell-aware stencil evaluator and diagnostic kernels.
//!
//! Every kernel implements [`ember_derive::Derive`] and is registered by
//! name through [`register_standard`]:
//!
//! | Name | Kernel |
//! |------|--------|
//! | `temp`, `mass_fractions`, `mole_fractions`, `rhominsumrhoY` | [`extract`] |
//! | `mag_vel`, `avg_pressure`, `coordinates`, `heatRelease` | [`extract`] |
//! | `mag_vort`, `vorticity` | [`vorticity`] |
//! | `Qcrit` | [`qcrit`] |
//! | `kinetic_energy`, `enstrophy` | [`energy`] |
//! | `mixture_fraction`, `progress_variable` | [`scalar`] |
//! | `viscosity`, `diffcoeff`, `lambda` | [`transport`] |
//! | `reaction_exergy` | [`exergy`] |
//!
//! Gradient-based kernels share the [`Stencil`] evaluator: one stencil
//! choice per cell and axis, reported back as a [`StencilKind`](ember_derive::StencilKind).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod access;
pub mod catalog;
pub mod energy;
pub mod exergy;
pub mod extract;
pub mod qcrit;
pub mod scalar;
pub mod stencil;
pub mod transport;
pub mod vorticity;

pub use catalog::{register_standard, standard_registry};
pub use energy::{DensitySource, Enstrophy, KineticEnergy};
pub use exergy::ReactionExergy;
pub use extract::{
    AveragePressure, Coordinates, HeatRelease, MassFractions, MoleFractions, RhoMinusSumRhoY,
    Temperature, VelocityMagnitude,
};
pub use qcrit::QCriterion;
pub use scalar::{MixtureFraction, ProgressVariable};
pub use stencil::{Derivative, Stencil, VelocityGradient};
pub use transport::{Conductivity, DiffusionCoefficients, Viscosity};
pub use vorticity::{Vorticity, VorticityMagnitude};
