//! Reusable grid-block fixtures.
//!
//! [`BlockFixture`] owns everything a kernel reads for one block: state with
//! ghost cells, cut-cell flags over the same box, geometry, a reaction-rate
//! array, and node-centered pressure. The default state is a quiescent
//! three-species mixture at 1000 K.

use ember_core::{StateLayout, Thermodynamics};
use ember_grid::{CellFlag, CutCellFlags, FieldArray, Geometry, IndexBox, IntVect};

use crate::IdealGas;

/// Pressure of the default fixture state, Pa.
pub const FIXTURE_PRESSURE: f64 = 101_325.0;

/// Default composition of the fixture state.
pub const FIXTURE_MASS_FRACTIONS: [f64; 3] = [0.2, 0.3, 0.5];

/// Default temperature of the fixture state, K.
pub const FIXTURE_TEMPERATURE: f64 = 1000.0;

/// Cell size on every axis.
pub const FIXTURE_CELL_SIZE: f64 = 0.1;

pub struct BlockFixture {
    pub region: IndexBox,
    pub state: FieldArray,
    pub flags: CutCellFlags,
    pub geometry: Geometry,
    pub layout: StateLayout,
    pub thermo: IdealGas,
    pub reactions: FieldArray,
    pub pressure: FieldArray,
}

impl BlockFixture {
    /// A cubic (or square) block of `n` cells per side with `ghosts` ghost
    /// layers, uniform quiescent state, all cells regular.
    pub fn new(ndim: usize, n: i32, ghosts: i32) -> Self {
        let hi_z = if ndim == 3 { n - 1 } else { 0 };
        let region = IndexBox::new([0, 0, 0], [n - 1, n - 1, hi_z]).expect("fixture box");
        let grown = region.grow(ghosts, ndim);
        let thermo = IdealGas::three_species();
        let layout = StateLayout::new(ndim, thermo.num_species()).expect("fixture layout");
        let geometry =
            Geometry::new(ndim, [0.0; 3], [FIXTURE_CELL_SIZE; 3]).expect("fixture geometry");
        let mut fx = Self {
            region,
            state: FieldArray::new(grown, layout.nvar()),
            flags: CutCellFlags::all_regular(grown),
            geometry,
            layout,
            reactions: FieldArray::new(region, thermo.num_species()),
            pressure: FieldArray::new(region.surrounding_nodes(ndim), 1),
            thermo,
        };
        for cell in grown.cells() {
            fx.set_thermo_state(cell, &FIXTURE_MASS_FRACTIONS, FIXTURE_TEMPERATURE);
        }
        fx
    }

    pub fn uniform_2d(n: i32, ghosts: i32) -> Self {
        Self::new(2, n, ghosts)
    }

    pub fn uniform_3d(n: i32, ghosts: i32) -> Self {
        Self::new(3, n, ghosts)
    }

    /// Set velocity from a function of the cell-center position, over the
    /// whole state box including ghosts.
    pub fn set_velocity(&mut self, f: impl Fn([f64; 3]) -> [f64; 3]) -> &mut Self {
        let ndim = self.layout.ndim();
        for cell in self.state.bx().cells() {
            let u = f(self.geometry.cell_center(cell));
            for (d, value) in u.iter().enumerate().take(ndim) {
                self.state.set(cell, self.layout.velocity() + d, *value);
            }
        }
        self
    }

    /// Set the thermochemical state of one cell at [`FIXTURE_PRESSURE`].
    pub fn set_thermo_state(&mut self, cell: IntVect, mass_fractions: &[f64], temperature: f64) {
        let l = self.layout;
        let rho = self
            .thermo
            .density(FIXTURE_PRESSURE, mass_fractions, temperature);
        let h = self.thermo.enthalpy(temperature, mass_fractions);
        self.state.set(cell, l.density(), rho);
        for (n, y) in mass_fractions.iter().enumerate() {
            self.state.set(cell, l.first_species() + n, rho * y);
        }
        self.state.set(cell, l.rhoh(), rho * h);
        self.state.set(cell, l.temperature(), temperature);
        self.state.set(cell, l.rhort(), FIXTURE_PRESSURE);
    }

    /// Set the thermochemical state of every cell from a function of position.
    pub fn fill_thermo_state(&mut self, f: impl Fn([f64; 3]) -> ([f64; 3], f64)) -> &mut Self {
        let cells: Vec<IntVect> = self.state.bx().cells().collect();
        for cell in cells {
            let (y, t) = f(self.geometry.cell_center(cell));
            self.set_thermo_state(cell, &y, t);
        }
        self
    }

    /// Overwrite one state component everywhere.
    pub fn fill_component(&mut self, comp: usize, value: f64) -> &mut Self {
        self.state.fill(comp, value).expect("fixture component");
        self
    }

    pub fn set_flag(&mut self, cell: IntVect, flag: CellFlag) -> &mut Self {
        self.flags.set(cell, flag).expect("fixture flag cell");
        self
    }

    /// Zero-filled output array over the region.
    pub fn output(&self, ncomp: usize) -> FieldArray {
        FieldArray::new(self.region, ncomp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_consistent() {
        let fx = BlockFixture::uniform_2d(4, 2);
        let l = fx.layout;
        assert_eq!(fx.state.bx().lo(), [-2, -2, 0]);
        assert_eq!(fx.state.ncomp(), l.nvar());
        let rho = fx.state.get([1, 1, 0], l.density());
        let sum: f64 = (0..3)
            .map(|n| fx.state.get([1, 1, 0], l.first_species() + n))
            .sum();
        assert!((sum - rho).abs() < 1e-12 * rho);
        assert_eq!(fx.state.get([1, 1, 0], l.temperature()), FIXTURE_TEMPERATURE);
    }

    #[test]
    fn velocity_from_position() {
        let mut fx = BlockFixture::uniform_3d(3, 1);
        fx.set_velocity(|x| [x[0], 2.0 * x[1], 3.0 * x[2]]);
        let l = fx.layout;
        let c = fx.geometry.cell_center([1, 1, 1]);
        assert!((fx.state.get([1, 1, 1], l.velocity() + 2) - 3.0 * c[2]).abs() < 1e-12);
    }

    #[test]
    fn pressure_is_node_centered() {
        let fx = BlockFixture::uniform_2d(4, 1);
        assert_eq!(fx.pressure.bx().hi(), [4, 4, 0]);
    }
}
