//! Output view into a caller-owned array.

use ember_core::DeriveError;
use ember_grid::{FieldArray, IndexBox, IntVect};

/// A window of `count` components starting at `offset` in a caller array.
///
/// Construction enforces `offset + count <= ncomp`, so kernels can write
/// components `0..count` without further checks.
#[derive(Debug)]
pub struct DerivedField<'a> {
    array: &'a mut FieldArray,
    offset: usize,
    count: usize,
}

impl<'a> DerivedField<'a> {
    /// Create a view, failing with [`DeriveError::OutputOverflow`] if the
    /// window exceeds the array's components.
    pub fn new(
        array: &'a mut FieldArray,
        offset: usize,
        count: usize,
    ) -> Result<Self, DeriveError> {
        let capacity = array.ncomp();
        if offset.checked_add(count).map_or(true, |end| end > capacity) {
            return Err(DeriveError::OutputOverflow {
                offset,
                count,
                capacity,
            });
        }
        Ok(Self {
            array,
            offset,
            count,
        })
    }

    /// Box of the underlying array.
    pub fn bx(&self) -> IndexBox {
        self.array.bx()
    }

    /// First component of the window in the underlying array.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of components in the window.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Write component `comp` (relative to the window) at `cell`.
    #[inline]
    pub fn set(&mut self, cell: IntVect, comp: usize, value: f64) {
        debug_assert!(comp < self.count, "component {comp} outside window");
        self.array.set(cell, self.offset + comp, value);
    }

    /// Read back component `comp` (relative to the window) at `cell`.
    #[inline]
    pub fn get(&self, cell: IntVect, comp: usize) -> f64 {
        debug_assert!(comp < self.count, "component {comp} outside window");
        self.array.get(cell, self.offset + comp)
    }

    /// Set every component of the window to zero over `region`.
    pub fn zero(&mut self, region: &IndexBox) {
        for cell in region.cells() {
            for comp in 0..self.count {
                self.set(cell, comp, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(ncomp: usize) -> FieldArray {
        FieldArray::new(IndexBox::new([0, 0, 0], [1, 1, 0]).unwrap(), ncomp)
    }

    #[test]
    fn writes_at_offset() {
        let mut a = array(4);
        {
            let mut out = DerivedField::new(&mut a, 2, 2).unwrap();
            out.set([1, 1, 0], 1, 9.0);
            assert_eq!(out.get([1, 1, 0], 1), 9.0);
        }
        assert_eq!(a.get([1, 1, 0], 3), 9.0);
        assert_eq!(a.get([1, 1, 0], 1), 0.0);
    }

    #[test]
    fn rejects_overflow() {
        let mut a = array(3);
        let err = DerivedField::new(&mut a, 2, 2).unwrap_err();
        assert_eq!(
            err,
            DeriveError::OutputOverflow {
                offset: 2,
                count: 2,
                capacity: 3
            }
        );
    }

    #[test]
    fn rejects_offset_overflowing_usize() {
        let mut a = array(3);
        assert!(DerivedField::new(&mut a, usize::MAX, 2).is_err());
    }
}
