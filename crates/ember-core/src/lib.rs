//! Core types and traits for Ember derived diagnostics.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! abstractions shared across the workspace: the state component layout,
//! the immutable diagnostics configuration, error types, and the traits
//! through which kernels reach the external thermodynamics, transport, and
//! chemistry evaluators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod traits;

pub use config::{
    ClosureModel, DiagnosticsConfig, DiagnosticsConfigBuilder, IsolatedCellPolicy,
    MixtureFractionParams, ProgressVariableParams, ScalarMapping,
};
pub use error::{ConfigError, DeriveError};
pub use layout::StateLayout;
pub use traits::{
    ChemistryEvaluator, Evaluators, Thermodynamics, TransportCoefficients, TransportEvaluator,
    SpeciesVec,
};
