//! Physical geometry of a uniform grid level.

use crate::error::GridError;
use crate::index_box::IntVect;

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First axis.
    X,
    /// Second axis.
    Y,
    /// Third axis.
    Z,
}

impl Axis {
    /// All three axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Axis index (0, 1, 2).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The axis with the given index, or `None` if `index > 2`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Shift `cell` by `n` along this axis.
    #[inline]
    pub fn shift(self, cell: IntVect, n: i32) -> IntVect {
        let mut c = cell;
        c[self.index()] += n;
        c
    }
}

/// Side of a cell along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Towards decreasing index.
    Lo,
    /// Towards increasing index.
    Hi,
}

/// Uniform Cartesian geometry: physical origin and cell size per axis.
///
/// ```
/// use ember_grid::Geometry;
///
/// let geom = Geometry::new(2, [0.0, 1.0, 0.0], [0.5, 0.25, 1.0]).unwrap();
/// let x = geom.cell_center([1, 2, 0]);
/// assert_eq!(x[0], 0.75);
/// assert_eq!(x[1], 1.625);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    ndim: usize,
    prob_lo: [f64; 3],
    cell_size: [f64; 3],
    inv_cell_size: [f64; 3],
}

impl Geometry {
    /// Create a geometry.
    ///
    /// `ndim` must be 2 or 3. Cell sizes on the first `ndim` axes must be
    /// finite and positive; a 2-D geometry ignores the third entry.
    pub fn new(ndim: usize, prob_lo: [f64; 3], cell_size: [f64; 3]) -> Result<Self, GridError> {
        if !(2..=3).contains(&ndim) {
            return Err(GridError::UnsupportedDimension { ndim });
        }
        let mut dx = cell_size;
        for (axis, value) in dx.iter_mut().enumerate() {
            if axis >= ndim {
                *value = 1.0;
                continue;
            }
            if !value.is_finite() || *value <= 0.0 {
                return Err(GridError::InvalidCellSize {
                    axis,
                    value: *value,
                });
            }
        }
        Ok(Self {
            ndim,
            prob_lo,
            cell_size: dx,
            inv_cell_size: [1.0 / dx[0], 1.0 / dx[1], 1.0 / dx[2]],
        })
    }

    /// Spatial dimensionality (2 or 3).
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Physical coordinates of the domain's lower corner.
    pub fn prob_lo(&self) -> [f64; 3] {
        self.prob_lo
    }

    /// Cell size along `axis`.
    pub fn cell_size(&self, axis: Axis) -> f64 {
        self.cell_size[axis.index()]
    }

    /// Inverse cell size along `axis`.
    pub fn inv_cell_size(&self, axis: Axis) -> f64 {
        self.inv_cell_size[axis.index()]
    }

    /// The active axes of this geometry.
    pub fn axes(&self) -> &'static [Axis] {
        &Axis::ALL[..self.ndim]
    }

    /// Physical coordinates of the center of `cell`.
    ///
    /// Components beyond `ndim` are 0.
    pub fn cell_center(&self, cell: IntVect) -> [f64; 3] {
        self.offset_center(cell, [0.0; 3])
    }

    /// Physical coordinates of a point inside `cell`, given as an offset from
    /// the cell center in units of the cell size.
    pub fn offset_center(&self, cell: IntVect, offset: [f64; 3]) -> [f64; 3] {
        let mut x = [0.0; 3];
        for d in 0..self.ndim {
            x[d] = self.prob_lo[d] + (cell[d] as f64 + 0.5 + offset[d]) * self.cell_size[d];
        }
        x
    }
}
