//! Rectangular cell regions in index space.

use crate::error::GridError;

/// A cell index `(i, j, k)`.
pub type IntVect = [i32; 3];

/// A non-empty rectangular region of cells with inclusive corners.
///
/// Cells are ordered with `i` fastest, then `j`, then `k`, which is also the
/// storage order of [`FieldArray`](crate::FieldArray).
///
/// # Examples
///
/// ```
/// use ember_grid::IndexBox;
///
/// let bx = IndexBox::new([0, 0, 0], [3, 1, 0]).unwrap();
/// assert_eq!(bx.cell_count(), 8);
/// assert!(bx.contains([3, 1, 0]));
///
/// let grown = bx.grow(1, 2);
/// assert_eq!(grown.lo(), [-1, -1, 0]);
/// assert_eq!(grown.hi(), [4, 2, 0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    lo: IntVect,
    hi: IntVect,
}

impl IndexBox {
    /// Create a box from inclusive corners.
    ///
    /// Returns `Err(GridError::EmptyBox)` if `hi < lo` on any axis.
    pub fn new(lo: IntVect, hi: IntVect) -> Result<Self, GridError> {
        if (0..3).any(|d| hi[d] < lo[d]) {
            return Err(GridError::EmptyBox { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Lower corner.
    pub fn lo(&self) -> IntVect {
        self.lo
    }

    /// Upper corner.
    pub fn hi(&self) -> IntVect {
        self.hi
    }

    /// Number of cells along `axis`.
    pub fn len(&self, axis: usize) -> usize {
        (self.hi[axis] - self.lo[axis] + 1) as usize
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.len(0) * self.len(1) * self.len(2)
    }

    /// Whether `cell` lies inside the box.
    pub fn contains(&self, cell: IntVect) -> bool {
        (0..3).all(|d| cell[d] >= self.lo[d] && cell[d] <= self.hi[d])
    }

    /// Whether `other` lies entirely inside the box.
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// Grow by `n` cells on each side of the first `ndim` axes.
    ///
    /// Axes at or beyond `ndim` are left untouched so 2-D boxes stay flat.
    pub fn grow(&self, n: i32, ndim: usize) -> Self {
        let mut lo = self.lo;
        let mut hi = self.hi;
        for d in 0..ndim.min(3) {
            lo[d] -= n;
            hi[d] += n;
        }
        Self { lo, hi }
    }

    /// The node-centered box surrounding these cells on the first `ndim` axes.
    pub fn surrounding_nodes(&self, ndim: usize) -> Self {
        let mut hi = self.hi;
        for h in hi.iter_mut().take(ndim.min(3)) {
            *h += 1;
        }
        Self { lo: self.lo, hi }
    }

    /// Intersection with `other`, or `None` if they do not overlap.
    pub fn intersection(&self, other: &IndexBox) -> Option<IndexBox> {
        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for d in 0..3 {
            lo[d] = self.lo[d].max(other.lo[d]);
            hi[d] = self.hi[d].min(other.hi[d]);
        }
        IndexBox::new(lo, hi).ok()
    }

    /// Linear offset of `cell` in storage order, or `None` if outside.
    pub fn offset(&self, cell: IntVect) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some(self.offset_unchecked(cell))
    }

    /// Linear offset of `cell`, assuming it lies inside the box.
    #[inline]
    pub(crate) fn offset_unchecked(&self, cell: IntVect) -> usize {
        let nx = self.len(0);
        let ny = self.len(1);
        let i = (cell[0] - self.lo[0]) as usize;
        let j = (cell[1] - self.lo[1]) as usize;
        let k = (cell[2] - self.lo[2]) as usize;
        i + nx * (j + ny * k)
    }

    /// Iterate over all cells in storage order.
    pub fn cells(&self) -> Cells {
        Cells {
            bx: *self,
            next: Some(self.lo),
        }
    }
}

/// Iterator over the cells of an [`IndexBox`].
#[derive(Clone, Debug)]
pub struct Cells {
    bx: IndexBox,
    next: Option<IntVect>,
}

impl Iterator for Cells {
    type Item = IntVect;

    fn next(&mut self) -> Option<IntVect> {
        let cell = self.next?;
        let mut n = cell;
        let mut d = 0;
        self.next = loop {
            if d == 3 {
                break None;
            }
            if n[d] < self.bx.hi[d] {
                n[d] += 1;
                break Some(n);
            }
            n[d] = self.bx.lo[d];
            d += 1;
        };
        Some(cell)
    }
}
