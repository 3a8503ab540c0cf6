//! Derive kernel trait and block context for Ember diagnostics.
//!
//! A diagnostic is a [`Derive`] implementation: a stateless kernel that reads
//! one grid block through a [`DeriveContext`] and writes its components into
//! a [`DerivedField`]. Kernels are collected in a [`DiagnosticRegistry`] keyed
//! by name.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod derive;
pub mod log;
pub mod output;
pub mod registry;
pub mod scratch;
pub mod stats;

pub use context::{BlockView, DeriveContext};
pub use derive::{Derive, Input};
pub use log::{CellLog, CellRecord};
pub use output::DerivedField;
pub use registry::{DiagnosticRegistry, RegistryError};
pub use scratch::ScratchRegion;
pub use stats::{StencilKind, StencilStats};
