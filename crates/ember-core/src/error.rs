//! Error types for Ember diagnostics.
//!
//! Organized by subsystem: kernel evaluation ([`DeriveError`]) and
//! configuration validation ([`ConfigError`]). Contract violations that the
//! host solver would treat as assertions are reported as errors so a pass
//! can be aborted cleanly.

use std::error::Error;
use std::fmt;

/// Errors from evaluating a diagnostic over a grid block.
///
/// Returned by `Derive::derive()` and by the diagnostics driver.
#[derive(Clone, Debug, PartialEq)]
pub enum DeriveError {
    /// A scalar mapping was used before it was configured. This is the
    /// fatal path: the whole diagnostic pass is aborted.
    NotInitialized {
        /// Which mapping ("mixture fraction", "progress variable").
        mapping: &'static str,
    },
    /// The output buffer's box does not contain the requested region.
    RegionNotContained {
        /// Which buffer ("output", "state", "reactions", "pressure").
        buffer: &'static str,
        /// Lower corner of the requested region.
        region_lo: [i32; 3],
        /// Upper corner of the requested region.
        region_hi: [i32; 3],
    },
    /// The requested component count does not match the kernel arity.
    ComponentMismatch {
        /// Diagnostic name.
        name: String,
        /// Arity declared by the kernel.
        expected: usize,
        /// Count supplied by the caller.
        got: usize,
    },
    /// `offset + count` exceeds the output buffer's component capacity.
    OutputOverflow {
        /// First component written.
        offset: usize,
        /// Number of components written.
        count: usize,
        /// Components available in the output buffer.
        capacity: usize,
    },
    /// The state buffer carries fewer components than the layout requires.
    StateComponents {
        /// Components required by the state layout.
        required: usize,
        /// Components present in the state buffer.
        available: usize,
    },
    /// An evaluator or parameter set disagrees with the layout's species count.
    SpeciesMismatch {
        /// What disagrees ("chemistry evaluator", "mixture fraction weights").
        origin: &'static str,
        /// Species count it reports.
        got: usize,
        /// Species count of the state layout.
        expected: usize,
    },
    /// A secondary input (reaction rates, nodal pressure, an evaluator)
    /// needed by the kernel was not supplied.
    MissingInput {
        /// Name of the missing input.
        input: &'static str,
    },
    /// The kernel needs a density field but the solver runs incompressible.
    RequiresCompressible {
        /// Diagnostic name.
        name: String,
    },
    /// The kernel is not defined for the block's dimensionality.
    UnsupportedDimension {
        /// Diagnostic name.
        name: String,
        /// Dimensionality of the block geometry.
        ndim: usize,
    },
    /// A cut cell is disconnected on both sides of an axis and the
    /// configured policy rejects it.
    IsolatedCell {
        /// Cell index.
        cell: [i32; 3],
        /// Axis along which both neighbours are unreachable.
        axis: usize,
    },
    /// No kernel is registered under the requested name.
    UnknownDiagnostic {
        /// The requested name.
        name: String,
    },
    /// The kernel failed for another reason.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized { mapping } => write!(f, "{mapping} not initialized"),
            Self::RegionNotContained {
                buffer,
                region_lo,
                region_hi,
            } => write!(
                f,
                "{buffer} buffer does not contain region {region_lo:?}..={region_hi:?}"
            ),
            Self::ComponentMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "diagnostic '{name}' produces {expected} components, {got} requested"
            ),
            Self::OutputOverflow {
                offset,
                count,
                capacity,
            } => write!(
                f,
                "output components {offset}..{} exceed capacity {capacity}",
                offset + count
            ),
            Self::StateComponents {
                required,
                available,
            } => write!(
                f,
                "state buffer has {available} components, layout requires {required}"
            ),
            Self::SpeciesMismatch {
                origin,
                got,
                expected,
            } => write!(f, "{origin} has {got} species, layout has {expected}"),
            Self::MissingInput { input } => write!(f, "missing input: {input}"),
            Self::RequiresCompressible { name } => {
                write!(f, "diagnostic '{name}' is unavailable in incompressible mode")
            }
            Self::UnsupportedDimension { name, ndim } => {
                write!(f, "diagnostic '{name}' is not defined for {ndim}-D blocks")
            }
            Self::IsolatedCell { cell, axis } => write!(
                f,
                "cut cell {cell:?} is disconnected on both sides of axis {axis}"
            ),
            Self::UnknownDiagnostic { name } => write!(f, "unknown diagnostic '{name}'"),
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for DeriveError {}

/// Errors detected while validating configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Reference density is NaN, infinite, zero, or negative.
    InvalidReferenceDensity {
        /// The invalid value.
        value: f64,
    },
    /// Reference viscosity is NaN, infinite, or negative.
    InvalidReferenceViscosity {
        /// The invalid value.
        value: f64,
    },
    /// Inverse Schmidt or Prandtl number is not finite and positive.
    InvalidTransportNumber {
        /// Which number ("schmidt_inv", "prandtl_inv").
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A scalar mapping's weight vector does not match the species count.
    WeightCountMismatch {
        /// Which mapping.
        mapping: &'static str,
        /// Weights expected.
        expected: usize,
        /// Weights supplied.
        got: usize,
    },
    /// A scalar mapping's reference values coincide, so the normalization
    /// would divide by zero.
    DegenerateMapping {
        /// Which mapping.
        mapping: &'static str,
    },
    /// The state layout is unusable (dimensionality or species count).
    InvalidLayout {
        /// Description of the problem.
        reason: String,
    },
    /// A profile parameter is invalid.
    InvalidProfile {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReferenceDensity { value } => {
                write!(f, "reference density must be finite and positive, got {value}")
            }
            Self::InvalidReferenceViscosity { value } => {
                write!(f, "reference viscosity must be finite and non-negative, got {value}")
            }
            Self::InvalidTransportNumber { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::WeightCountMismatch {
                mapping,
                expected,
                got,
            } => write!(f, "{mapping} expects {expected} weights, got {got}"),
            Self::DegenerateMapping { mapping } => {
                write!(f, "{mapping} reference values coincide")
            }
            Self::InvalidLayout { reason } => write!(f, "invalid state layout: {reason}"),
            Self::InvalidProfile { reason } => write!(f, "invalid profile: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_initialized_message_names_mapping() {
        let err = DeriveError::NotInitialized {
            mapping: "mixture fraction",
        };
        assert_eq!(err.to_string(), "mixture fraction not initialized");
    }

    #[test]
    fn overflow_message_shows_range() {
        let err = DeriveError::OutputOverflow {
            offset: 2,
            count: 3,
            capacity: 4,
        };
        assert_eq!(err.to_string(), "output components 2..5 exceed capacity 4");
    }
}
