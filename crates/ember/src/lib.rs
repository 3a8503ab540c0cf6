//! Ember: derived diagnostics and profile initialization for reacting-flow
//! grid blocks with embedded boundaries.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Ember sub-crates. For most users, adding `ember` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ember::prelude::*;
//! use ember::grid::{CutCellFlags, FieldArray, Geometry, IndexBox};
//!
//! // An 8x8 block with two ghost layers in solid-body rotation.
//! let layout = StateLayout::new(2, 3).unwrap();
//! let region = IndexBox::new([0, 0, 0], [7, 7, 0]).unwrap();
//! let grown = region.grow(2, 2);
//! let geometry = Geometry::new(2, [0.0; 3], [0.1; 3]).unwrap();
//! let flags = CutCellFlags::all_regular(grown);
//! let mut state = FieldArray::new(grown, layout.nvar());
//! for cell in grown.cells() {
//!     let x = geometry.cell_center(cell);
//!     state.set(cell, layout.velocity(), -x[1]);
//!     state.set(cell, layout.velocity() + 1, x[0]);
//!     state.set(cell, layout.density(), 1.0);
//! }
//!
//! let config = EngineConfig::builder(layout).build().unwrap();
//! let driver = DiagnosticsDriver::standard(config).unwrap();
//! let mut out = FieldArray::new(region, 1);
//! let block = BlockView::new(region, &state, &flags, &geometry);
//! driver
//!     .derive("vorticity", block, &mut out, 0, 1, Evaluators::default())
//!     .unwrap();
//! assert!((out.get([3, 3, 0], 0) - 2.0).abs() < 1e-12);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ember-core` | Errors, state layout, diagnostics config, evaluator traits |
//! | [`grid`] | `ember-grid` | Index boxes, geometry, cut-cell flags, cell arrays |
//! | [`derive`] | `ember-derive` | Kernel trait, block context, registry |
//! | [`kernels`] | `ember-kernels` | Stencil evaluator and built-in diagnostics |
//! | [`profile`] | `ember-profile` | Three-stream blended inflow profiles |
//! | [`engine`] | `ember-engine` | Diagnostics driver, metrics, cell log |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`ember-core`).
///
/// Contains [`types::DiagnosticsConfig`], [`types::StateLayout`], the error
/// types, and the evaluator traits ([`types::Thermodynamics`],
/// [`types::TransportEvaluator`], [`types::ChemistryEvaluator`]).
pub use ember_core as types;

/// Block-structured grid containers (`ember-grid`).
pub use ember_grid as grid;

/// Kernel trait and block context (`ember-derive`).
///
/// The [`derive::Derive`] trait is the main extension point for
/// user-defined diagnostics.
pub use ember_derive as derive;

/// Built-in diagnostics (`ember-kernels`).
///
/// Gradient kernels share [`kernels::Stencil`]; every kernel is registered
/// by [`kernels::register_standard`].
pub use ember_kernels as kernels;

/// Inflow and initial-condition profiles (`ember-profile`).
pub use ember_profile as profile;

/// Diagnostics driver (`ember-engine`).
///
/// [`engine::DiagnosticsDriver`] validates named requests and runs kernels
/// over grid blocks, serially or in parallel.
pub use ember_engine as engine;

/// Common imports for typical Ember usage.
///
/// ```rust
/// use ember::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use ember_core::{
        ChemistryEvaluator, ClosureModel, DiagnosticsConfig, Evaluators, IsolatedCellPolicy,
        MixtureFractionParams, ProgressVariableParams, StateLayout, Thermodynamics,
        TransportEvaluator,
    };

    // Errors
    pub use ember_core::{ConfigError, DeriveError};

    // Kernel trait
    pub use ember_derive::{BlockView, Derive, DeriveContext, DiagnosticRegistry, Input};

    // Profiles
    pub use ember_profile::{Profile, ProfileConfig, StreamState};

    // Engine
    pub use ember_engine::{
        BlockTask, DiagnosticsDriver, EngineConfig, EngineError, LogSink, PassMetrics,
    };
}
