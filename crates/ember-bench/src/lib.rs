//! Benchmark blocks and configurations for the Ember diagnostics framework.
//!
//! - [`rotating_block`]: regular block in solid-body rotation
//! - [`walled_block`]: same flow with a covered slab and one-sided cut cells
//! - [`block_batch`]: several rotating blocks for multi-block passes
//! - [`bench_config`]: engine configuration for a three-species layout

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ember_core::StateLayout;
use ember_derive::BlockView;
use ember_engine::EngineConfig;
use ember_grid::{Axis, CellFlag, CutCellFlags, FieldArray, Geometry, IndexBox, Side};

/// Species in every benchmark block.
pub const BENCH_SPECIES: usize = 3;

const MASS_FRACTIONS: [f64; BENCH_SPECIES] = [0.2, 0.3, 0.5];

/// An owned grid block with two ghost layers.
pub struct BenchBlock {
    /// Cells to evaluate.
    pub region: IndexBox,
    /// State over the region plus ghosts.
    pub state: FieldArray,
    /// Cut-cell flags over the state box.
    pub flags: CutCellFlags,
    /// Level geometry.
    pub geometry: Geometry,
    /// State layout.
    pub layout: StateLayout,
}

impl BenchBlock {
    /// Read-only view of the block.
    pub fn view(&self) -> BlockView<'_> {
        BlockView::new(self.region, &self.state, &self.flags, &self.geometry)
    }

    /// Zero-filled output over the region.
    pub fn output(&self, ncomp: usize) -> FieldArray {
        FieldArray::new(self.region, ncomp)
    }
}

/// Build an `n`-cell-per-side block rotating about the z axis at rate `omega`.
///
/// Density 1.2, temperature 1000 K, uniform composition.
pub fn rotating_block(ndim: usize, n: i32, omega: f64) -> BenchBlock {
    let hi_z = if ndim == 3 { n - 1 } else { 0 };
    let region = IndexBox::new([0, 0, 0], [n - 1, n - 1, hi_z]).unwrap();
    let grown = region.grow(2, ndim);
    let layout = StateLayout::new(ndim, BENCH_SPECIES).unwrap();
    let geometry = Geometry::new(ndim, [0.0; 3], [1.0 / n as f64; 3]).unwrap();
    let rho = 1.2;
    let temperature = 1000.0;
    let state = FieldArray::from_fn(grown, layout.nvar(), |cell, comp| {
        let x = geometry.cell_center(cell);
        let v = layout.velocity();
        match comp {
            c if c == v => -omega * x[1],
            c if c == v + 1 => omega * x[0],
            c if c < v + ndim => 0.0,
            c if c == layout.density() => rho,
            c if c >= layout.first_species() && c < layout.first_species() + BENCH_SPECIES => {
                rho * MASS_FRACTIONS[c - layout.first_species()]
            }
            c if c == layout.rhoh() => rho * 1.0e6,
            c if c == layout.temperature() => temperature,
            _ => 101_325.0,
        }
    });
    BenchBlock {
        region,
        state,
        flags: CutCellFlags::all_regular(grown),
        geometry,
        layout,
    }
}

/// [`rotating_block`] with the plane `i == n / 2` covered and its x
/// neighbours cut, so gradient kernels take one-sided stencils there.
pub fn walled_block(ndim: usize, n: i32, omega: f64) -> BenchBlock {
    let mut block = rotating_block(ndim, n, omega);
    let wall = n / 2;
    let grown = block.state.bx();
    block.flags = CutCellFlags::from_fn(grown, |cell| match cell[0] - wall {
        0 => CellFlag::covered(),
        -1 => CellFlag::cut().disconnect(Axis::X, Side::Hi),
        1 => CellFlag::cut().disconnect(Axis::X, Side::Lo),
        _ => CellFlag::regular(),
    });
    block
}

/// `count` rotating blocks at increasing rates.
pub fn block_batch(ndim: usize, n: i32, count: usize) -> Vec<BenchBlock> {
    (0..count)
        .map(|i| rotating_block(ndim, n, 1.0 + i as f64))
        .collect()
}

/// Engine configuration for the benchmark layout.
pub fn bench_config(ndim: usize, parallel: bool) -> EngineConfig {
    EngineConfig::builder(StateLayout::new(ndim, BENCH_SPECIES).unwrap())
        .parallel(parallel)
        .build()
        .unwrap()
}
