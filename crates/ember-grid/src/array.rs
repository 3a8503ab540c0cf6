//! Multi-component cell data over a box.

use crate::error::GridError;
use crate::index_box::{IndexBox, IntVect};

/// Cell-centered (or node-centered) data with `ncomp` components.
///
/// Storage is component-major: all cells of component 0, then component 1,
/// and so on. Within a component cells follow [`IndexBox::cells`] order.
///
/// ```
/// use ember_grid::{FieldArray, IndexBox};
///
/// let bx = IndexBox::new([0, 0, 0], [1, 1, 0]).unwrap();
/// let mut a = FieldArray::new(bx, 2);
/// a.set([1, 0, 0], 1, 3.5);
/// assert_eq!(a.get([1, 0, 0], 1), 3.5);
/// assert_eq!(a.get([1, 0, 0], 0), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    bx: IndexBox,
    ncomp: usize,
    data: Vec<f64>,
}

impl FieldArray {
    /// Zero-filled array.
    pub fn new(bx: IndexBox, ncomp: usize) -> Self {
        Self {
            bx,
            ncomp,
            data: vec![0.0; bx.cell_count() * ncomp],
        }
    }

    /// Array filled from a function of `(cell, component)`.
    pub fn from_fn(bx: IndexBox, ncomp: usize, mut f: impl FnMut(IntVect, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(bx.cell_count() * ncomp);
        for comp in 0..ncomp {
            data.extend(bx.cells().map(|c| f(c, comp)));
        }
        Self { bx, ncomp, data }
    }

    /// Wrap existing component-major data.
    pub fn from_vec(bx: IndexBox, ncomp: usize, data: Vec<f64>) -> Result<Self, GridError> {
        let expected = bx.cell_count() * ncomp;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { bx, ncomp, data })
    }

    /// The box the data covers.
    pub fn bx(&self) -> IndexBox {
        self.bx
    }

    /// Number of components.
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    /// Value at `cell`, component `comp`.
    ///
    /// # Panics
    ///
    /// Panics if `comp >= ncomp`. `cell` must lie inside the box; this is
    /// checked in debug builds.
    #[inline]
    pub fn get(&self, cell: IntVect, comp: usize) -> f64 {
        debug_assert!(self.bx.contains(cell), "cell {cell:?} outside array box");
        self.data[comp * self.bx.cell_count() + self.bx.offset_unchecked(cell)]
    }

    /// Value at `cell`, component `comp`, or `None` if out of range.
    pub fn try_get(&self, cell: IntVect, comp: usize) -> Option<f64> {
        if comp >= self.ncomp {
            return None;
        }
        self.bx
            .offset(cell)
            .map(|n| self.data[comp * self.bx.cell_count() + n])
    }

    /// Set the value at `cell`, component `comp`.
    #[inline]
    pub fn set(&mut self, cell: IntVect, comp: usize, value: f64) {
        debug_assert!(self.bx.contains(cell), "cell {cell:?} outside array box");
        let n = comp * self.bx.cell_count() + self.bx.offset_unchecked(cell);
        self.data[n] = value;
    }

    /// All values of component `comp`.
    pub fn component(&self, comp: usize) -> Result<&[f64], GridError> {
        let range = self.component_range(comp)?;
        Ok(&self.data[range])
    }

    /// All values of component `comp`, mutably.
    pub fn component_mut(&mut self, comp: usize) -> Result<&mut [f64], GridError> {
        let range = self.component_range(comp)?;
        Ok(&mut self.data[range])
    }

    /// Set every cell of component `comp` to `value`.
    pub fn fill(&mut self, comp: usize, value: f64) -> Result<(), GridError> {
        self.component_mut(comp)?.fill(value);
        Ok(())
    }

    /// Raw component-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn component_range(&self, comp: usize) -> Result<std::ops::Range<usize>, GridError> {
        if comp >= self.ncomp {
            return Err(GridError::ComponentOutOfRange {
                component: comp,
                ncomp: self.ncomp,
            });
        }
        let n = self.bx.cell_count();
        Ok(comp * n..(comp + 1) * n)
    }
}
