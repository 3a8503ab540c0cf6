//! Embedded-boundary cell classification.
//!
//! Every cell is regular, cut, or covered. Cut cells additionally record,
//! per axis and side, whether the neighbouring cell is reachable through the
//! fluid. Connectivity is only consulted for cut cells.

use crate::error::GridError;
use crate::geometry::{Axis, Side};
use crate::index_box::{IndexBox, IntVect};

/// Classification of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Entirely fluid.
    Regular,
    /// Intersected by the embedded boundary.
    Cut,
    /// Entirely inside the body; holds no valid data.
    Covered,
}

/// Classification plus per-face connectivity.
///
/// ```
/// use ember_grid::{Axis, CellFlag, Side};
///
/// let flag = CellFlag::cut().disconnect(Axis::X, Side::Hi);
/// assert!(flag.is_cut());
/// assert!(flag.is_connected(Axis::X, Side::Lo));
/// assert!(!flag.is_connected(Axis::X, Side::Hi));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFlag {
    kind: CellKind,
    connected: u8,
}

const ALL_CONNECTED: u8 = 0b11_1111;

#[inline]
fn bit(axis: Axis, side: Side) -> u8 {
    let s = match side {
        Side::Lo => 0,
        Side::Hi => 1,
    };
    1 << (2 * axis.index() + s)
}

impl CellFlag {
    /// A regular cell.
    pub const fn regular() -> Self {
        Self {
            kind: CellKind::Regular,
            connected: ALL_CONNECTED,
        }
    }

    /// A covered cell.
    pub const fn covered() -> Self {
        Self {
            kind: CellKind::Covered,
            connected: 0,
        }
    }

    /// A cut cell connected on every face.
    pub const fn cut() -> Self {
        Self {
            kind: CellKind::Cut,
            connected: ALL_CONNECTED,
        }
    }

    /// Mark the neighbour across `side` of `axis` as unreachable.
    pub fn disconnect(mut self, axis: Axis, side: Side) -> Self {
        self.connected &= !bit(axis, side);
        self
    }

    /// The cell's classification.
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Whether the cell is regular.
    pub fn is_regular(&self) -> bool {
        self.kind == CellKind::Regular
    }

    /// Whether the cell is cut.
    pub fn is_cut(&self) -> bool {
        self.kind == CellKind::Cut
    }

    /// Whether the cell is covered.
    pub fn is_covered(&self) -> bool {
        self.kind == CellKind::Covered
    }

    /// Whether the neighbour across `side` of `axis` is reachable.
    #[inline]
    pub fn is_connected(&self, axis: Axis, side: Side) -> bool {
        self.connected & bit(axis, side) != 0
    }
}

impl Default for CellFlag {
    fn default() -> Self {
        Self::regular()
    }
}

/// Aggregate classification of a region, used to select kernel fast paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FabType {
    /// Every cell is regular.
    Regular,
    /// Every cell is covered.
    Covered,
    /// A mix of cell kinds.
    SingleValued,
}

/// Cut-cell flags and centroids over a box.
#[derive(Clone, Debug)]
pub struct CutCellFlags {
    bx: IndexBox,
    flags: Vec<CellFlag>,
    centroids: Vec<[f64; 3]>,
}

impl CutCellFlags {
    /// All cells regular.
    pub fn all_regular(bx: IndexBox) -> Self {
        Self::from_fn(bx, |_| CellFlag::regular())
    }

    /// Build flags from a per-cell function.
    pub fn from_fn(bx: IndexBox, mut f: impl FnMut(IntVect) -> CellFlag) -> Self {
        let flags = bx.cells().map(&mut f).collect();
        Self {
            bx,
            flags,
            centroids: vec![[0.0; 3]; bx.cell_count()],
        }
    }

    /// The box the flags are defined over.
    pub fn bx(&self) -> IndexBox {
        self.bx
    }

    /// Flag of `cell`, or `None` if outside the box.
    pub fn get(&self, cell: IntVect) -> Option<CellFlag> {
        self.bx.offset(cell).map(|n| self.flags[n])
    }

    /// Flag of `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `cell` lies outside the box. Callers check containment of
    /// the region once per block.
    #[inline]
    pub fn flag(&self, cell: IntVect) -> CellFlag {
        debug_assert!(self.bx.contains(cell), "cell {cell:?} outside flag box");
        self.flags[self.bx.offset_unchecked(cell)]
    }

    /// Set the flag of `cell`.
    pub fn set(&mut self, cell: IntVect, flag: CellFlag) -> Result<(), GridError> {
        let n = self.checked_offset(cell)?;
        self.flags[n] = flag;
        Ok(())
    }

    /// Set the centroid of a cut cell, as an offset from the cell center in
    /// units of the cell size (each component in `[-0.5, 0.5]`).
    pub fn set_centroid(&mut self, cell: IntVect, centroid: [f64; 3]) -> Result<(), GridError> {
        let n = self.checked_offset(cell)?;
        self.centroids[n] = centroid;
        Ok(())
    }

    /// Centroid offset of `cell`; zero for cells without one.
    #[inline]
    pub fn centroid(&self, cell: IntVect) -> [f64; 3] {
        debug_assert!(self.bx.contains(cell), "cell {cell:?} outside flag box");
        self.centroids[self.bx.offset_unchecked(cell)]
    }

    /// Aggregate classification of `region` (which must lie inside the box).
    pub fn fab_type(&self, region: &IndexBox) -> FabType {
        let mut all_regular = true;
        let mut all_covered = true;
        for cell in region.cells() {
            let flag = self.flag(cell);
            all_regular &= flag.is_regular();
            all_covered &= flag.is_covered();
            if !all_regular && !all_covered {
                return FabType::SingleValued;
            }
        }
        if all_covered {
            FabType::Covered
        } else if all_regular {
            FabType::Regular
        } else {
            FabType::SingleValued
        }
    }

    /// Number of cut cells in `region` that are disconnected on both sides
    /// of some active axis.
    pub fn isolated_count(&self, region: &IndexBox, axes: &[Axis]) -> usize {
        region
            .cells()
            .filter(|&c| {
                let f = self.flag(c);
                f.is_cut()
                    && axes
                        .iter()
                        .any(|&a| !f.is_connected(a, Side::Lo) && !f.is_connected(a, Side::Hi))
            })
            .count()
    }

    fn checked_offset(&self, cell: IntVect) -> Result<usize, GridError> {
        self.bx.offset(cell).ok_or(GridError::CellOutsideBox {
            cell,
            lo: self.bx.lo(),
            hi: self.bx.hi(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx() -> IndexBox {
        IndexBox::new([0, 0, 0], [3, 3, 0]).unwrap()
    }

    #[test]
    fn regular_cells_connected_everywhere() {
        let f = CellFlag::regular();
        for a in Axis::ALL {
            assert!(f.is_connected(a, Side::Lo));
            assert!(f.is_connected(a, Side::Hi));
        }
    }

    #[test]
    fn covered_cells_connected_nowhere() {
        let f = CellFlag::covered();
        assert!(!f.is_connected(Axis::X, Side::Lo));
        assert!(f.is_covered());
    }

    #[test]
    fn fab_type_classification() {
        let b = bx();
        let mut flags = CutCellFlags::all_regular(b);
        assert_eq!(flags.fab_type(&b), FabType::Regular);

        let covered = CutCellFlags::from_fn(b, |_| CellFlag::covered());
        assert_eq!(covered.fab_type(&b), FabType::Covered);

        flags.set([1, 1, 0], CellFlag::cut()).unwrap();
        assert_eq!(flags.fab_type(&b), FabType::SingleValued);
        let corner = IndexBox::new([2, 2, 0], [3, 3, 0]).unwrap();
        assert_eq!(flags.fab_type(&corner), FabType::Regular);
    }

    #[test]
    fn set_outside_box_fails() {
        let mut flags = CutCellFlags::all_regular(bx());
        let err = flags.set([9, 0, 0], CellFlag::covered()).unwrap_err();
        assert!(matches!(err, GridError::CellOutsideBox { .. }));
        assert!(flags.get([9, 0, 0]).is_none());
    }

    #[test]
    fn isolated_cells_counted_per_axis() {
        let b = bx();
        let mut flags = CutCellFlags::all_regular(b);
        let isolated = CellFlag::cut()
            .disconnect(Axis::Y, Side::Lo)
            .disconnect(Axis::Y, Side::Hi);
        flags.set([1, 2, 0], isolated).unwrap();
        flags
            .set([2, 2, 0], CellFlag::cut().disconnect(Axis::X, Side::Lo))
            .unwrap();
        assert_eq!(flags.isolated_count(&b, &[Axis::X, Axis::Y]), 1);
        assert_eq!(flags.isolated_count(&b, &[Axis::X]), 0);
    }

    #[test]
    fn centroids_default_to_zero() {
        let mut flags = CutCellFlags::all_regular(bx());
        assert_eq!(flags.centroid([1, 1, 0]), [0.0; 3]);
        flags.set_centroid([1, 1, 0], [0.1, -0.2, 0.0]).unwrap();
        assert_eq!(flags.centroid([1, 1, 0]), [0.1, -0.2, 0.0]);
    }
}
