//! Error types for grid construction and access.

use crate::index_box::IntVect;
use std::fmt;

/// Errors arising from building or indexing grid containers.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A box has `hi < lo` along some axis.
    EmptyBox {
        /// Lower corner.
        lo: IntVect,
        /// Upper corner.
        hi: IntVect,
    },
    /// A cell lies outside the container's box.
    CellOutsideBox {
        /// The offending cell.
        cell: IntVect,
        /// Lower corner of the box.
        lo: IntVect,
        /// Upper corner of the box.
        hi: IntVect,
    },
    /// A component index is not below the component count.
    ComponentOutOfRange {
        /// The requested component.
        component: usize,
        /// Components available.
        ncomp: usize,
    },
    /// Dimensionality other than 2 or 3.
    UnsupportedDimension {
        /// The requested dimensionality.
        ndim: usize,
    },
    /// A 2-D geometry was paired with a box that is not flat in z.
    NotFlat {
        /// Lower corner of the box.
        lo: IntVect,
        /// Upper corner of the box.
        hi: IntVect,
    },
    /// A cell size is not finite and positive.
    InvalidCellSize {
        /// Axis index.
        axis: usize,
        /// The invalid value.
        value: f64,
    },
    /// Supplied data does not match the container size.
    DataLength {
        /// Values expected.
        expected: usize,
        /// Values supplied.
        got: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBox { lo, hi } => write!(f, "empty box {lo:?}..={hi:?}"),
            Self::CellOutsideBox { cell, lo, hi } => {
                write!(f, "cell {cell:?} outside box {lo:?}..={hi:?}")
            }
            Self::ComponentOutOfRange { component, ncomp } => {
                write!(f, "component {component} out of range (ncomp = {ncomp})")
            }
            Self::UnsupportedDimension { ndim } => {
                write!(f, "dimensionality must be 2 or 3, got {ndim}")
            }
            Self::NotFlat { lo, hi } => {
                write!(f, "2-D box {lo:?}..={hi:?} must have a single z layer")
            }
            Self::InvalidCellSize { axis, value } => {
                write!(f, "cell size along axis {axis} must be positive, got {value}")
            }
            Self::DataLength { expected, got } => {
                write!(f, "expected {expected} values, got {got}")
            }
        }
    }
}

impl std::error::Error for GridError {}
