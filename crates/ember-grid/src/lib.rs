//! Block-structured grid containers for Ember diagnostics.
//!
//! A diagnostic pass works on one grid block at a time. This crate defines
//! the pieces of a block that kernels read: the [`IndexBox`] describing a
//! rectangular region of cells, the [`Geometry`] mapping indices to physical
//! coordinates, the [`CutCellFlags`] classifying cells near an embedded
//! boundary, and the component-major [`FieldArray`] holding cell data.
//!
//! Index space is always three-dimensional. A 2-D block keeps a degenerate
//! third axis (`lo[2] == hi[2]`) and is marked 2-D by its [`Geometry`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod flags;
pub mod geometry;
pub mod index_box;

pub use array::FieldArray;
pub use error::GridError;
pub use flags::{CellFlag, CellKind, CutCellFlags, FabType};
pub use geometry::{Axis, Geometry, Side};
pub use index_box::{IndexBox, IntVect};
