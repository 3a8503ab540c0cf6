//! Cut-cell-aware finite differences.
//!
//! [`Stencil`] evaluates the first derivative of one state component along
//! one axis. The stencil is chosen from the cell's classification:
//!
//! ```text
//! covered                          -> 0, no neighbours read
//! regular, or cut connected both   -> ( f[+1] - f[-1] ) / 2h
//! cut, disconnected on +side       -> -( c0 f[0] + c1 f[-1] + c2 f[-2] ) / h
//! cut, disconnected on -side       ->  ( c0 f[0] + c1 f[+1] + c2 f[+2] ) / h
//! cut, disconnected on both sides  -> IsolatedCellPolicy
//! ```
//!
//! with `(c0, c1, c2) = (-1.5, 2.0, -0.5)`, which is exact for quadratics.
//! The block's aggregate [`FabType`] is computed once: a fully regular block
//! skips flag lookups, a fully covered block is zero-filled by the caller.

use ember_core::{DeriveError, IsolatedCellPolicy, StateLayout};
use ember_derive::{DeriveContext, DerivedField, StencilKind, StencilStats};
use ember_grid::{
    Axis, CellFlag, CutCellFlags, FabType, FieldArray, Geometry, IndexBox, IntVect, Side,
};

/// One-sided second-order coefficients `(c0, c1, c2)`.
pub const ONE_SIDED: [f64; 3] = [-1.5, 2.0, -0.5];

/// A derivative value and the stencil that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derivative {
    /// `df/dx` along the requested axis.
    pub value: f64,
    /// Stencil used.
    pub kind: StencilKind,
}

impl Derivative {
    const fn zero(kind: StencilKind) -> Self {
        Self { value: 0.0, kind }
    }
}

/// Centered difference `(f[+1] - f[-1]) / 2h` given `1/h`.
#[inline]
pub fn centered(f_minus: f64, f_plus: f64, inv_h: f64) -> f64 {
    0.5 * (f_plus - f_minus) * inv_h
}

/// One-sided difference reaching toward `-1, -2`.
#[inline]
pub fn backward(f0: f64, f_m1: f64, f_m2: f64, inv_h: f64) -> f64 {
    -(ONE_SIDED[0] * f0 + ONE_SIDED[1] * f_m1 + ONE_SIDED[2] * f_m2) * inv_h
}

/// One-sided difference reaching toward `+1, +2`.
#[inline]
pub fn forward(f0: f64, f_p1: f64, f_p2: f64, inv_h: f64) -> f64 {
    (ONE_SIDED[0] * f0 + ONE_SIDED[1] * f_p1 + ONE_SIDED[2] * f_p2) * inv_h
}

/// Derivative evaluator bound to one block's flags and geometry.
#[derive(Clone, Copy, Debug)]
pub struct Stencil<'a> {
    flags: &'a CutCellFlags,
    geometry: &'a Geometry,
    policy: IsolatedCellPolicy,
    fab: FabType,
}

impl<'a> Stencil<'a> {
    /// Bind to `flags` and `geometry`, classifying `region` once.
    pub fn new(
        flags: &'a CutCellFlags,
        geometry: &'a Geometry,
        policy: IsolatedCellPolicy,
        region: &IndexBox,
    ) -> Self {
        Self {
            flags,
            geometry,
            policy,
            fab: flags.fab_type(region),
        }
    }

    /// Bind to the block of a derive context.
    pub fn from_context(ctx: &DeriveContext<'a>) -> Self {
        Self::new(
            ctx.flags(),
            ctx.geometry(),
            ctx.config().isolated_cells(),
            &ctx.region(),
        )
    }

    /// Aggregate classification of the bound region.
    pub fn fab_type(&self) -> FabType {
        self.fab
    }

    #[inline]
    fn flag(&self, cell: IntVect) -> CellFlag {
        match self.fab {
            FabType::Regular => CellFlag::regular(),
            _ => self.flags.flag(cell),
        }
    }

    /// Derivative of component `comp` of `field` at `cell` along `axis`.
    pub fn derivative(
        &self,
        field: &FieldArray,
        comp: usize,
        cell: IntVect,
        axis: Axis,
    ) -> Result<Derivative, DeriveError> {
        self.derivative_with(self.flag(cell), field, comp, cell, axis)
    }

    #[inline]
    fn derivative_with(
        &self,
        flag: CellFlag,
        field: &FieldArray,
        comp: usize,
        cell: IntVect,
        axis: Axis,
    ) -> Result<Derivative, DeriveError> {
        let inv_h = self.geometry.inv_cell_size(axis);
        let at = |n: i32| field.get(axis.shift(cell, n), comp);
        if flag.is_covered() {
            return Ok(Derivative::zero(StencilKind::Covered));
        }
        let (lo, hi) = if flag.is_cut() {
            (
                flag.is_connected(axis, Side::Lo),
                flag.is_connected(axis, Side::Hi),
            )
        } else {
            (true, true)
        };
        let derivative = match (lo, hi) {
            (true, true) => Derivative {
                value: centered(at(-1), at(1), inv_h),
                kind: StencilKind::Centered,
            },
            (true, false) => Derivative {
                value: backward(at(0), at(-1), at(-2), inv_h),
                kind: StencilKind::Backward,
            },
            (false, true) => Derivative {
                value: forward(at(0), at(1), at(2), inv_h),
                kind: StencilKind::Forward,
            },
            (false, false) => match self.policy {
                IsolatedCellPolicy::Zero => Derivative::zero(StencilKind::Isolated),
                IsolatedCellPolicy::Error => {
                    return Err(DeriveError::IsolatedCell {
                        cell,
                        axis: axis.index(),
                    })
                }
            },
        };
        Ok(derivative)
    }

    /// Velocity gradient tensor `g[i][j] = du_i/dx_j` at `cell`.
    ///
    /// The flag is looked up once; every evaluation is counted in `stats`.
    pub fn velocity_gradient(
        &self,
        state: &FieldArray,
        layout: &StateLayout,
        cell: IntVect,
        stats: &mut StencilStats,
    ) -> Result<VelocityGradient, DeriveError> {
        let ndim = self.geometry.ndim();
        let flag = self.flag(cell);
        let mut g = VelocityGradient {
            ndim,
            tensor: [[0.0; 3]; 3],
            covered: flag.is_covered(),
        };
        for &axis in self.geometry.axes() {
            for i in 0..ndim {
                let d = self.derivative_with(flag, state, layout.velocity() + i, cell, axis)?;
                stats.record(d.kind);
                g.tensor[i][axis.index()] = d.value;
            }
        }
        Ok(g)
    }
}

/// Velocity gradient of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityGradient {
    /// Dimensionality; entries beyond it are 0.
    pub ndim: usize,
    /// `tensor[i][j] = du_i/dx_j`.
    pub tensor: [[f64; 3]; 3],
    /// The cell is covered.
    pub covered: bool,
}

impl VelocityGradient {
    /// `div(u)`.
    pub fn divergence(&self) -> f64 {
        (0..self.ndim).map(|d| self.tensor[d][d]).sum()
    }

    /// Vorticity `curl(u)`. In 2-D only the out-of-plane component is
    /// non-zero.
    pub fn vorticity(&self) -> [f64; 3] {
        let g = &self.tensor;
        let wz = g[1][0] - g[0][1];
        if self.ndim == 2 {
            return [0.0, 0.0, wz];
        }
        [g[2][1] - g[1][2], g[0][2] - g[2][0], wz]
    }

    /// Squared vorticity magnitude.
    pub fn vorticity_squared(&self) -> f64 {
        self.vorticity().iter().map(|w| w * w).sum()
    }

    /// `sum_ij (Omega_ij^2 - S_ij^2)`, with `div(u)/ndim` removed from the
    /// diagonal of the strain-rate tensor.
    pub fn q_criterion(&self) -> f64 {
        let g = &self.tensor;
        let dilatation = self.divergence() / self.ndim as f64;
        let mut q = 0.0;
        for i in 0..self.ndim {
            for j in 0..self.ndim {
                let omega = 0.5 * (g[i][j] - g[j][i]);
                let mut s = 0.5 * (g[i][j] + g[j][i]);
                if i == j {
                    s -= dilatation;
                }
                q += omega * omega - s * s;
            }
        }
        q
    }
}

/// Run a per-cell gradient kernel over the context's region.
///
/// Covered blocks are zero-filled without touching the state; covered cells
/// inside mixed blocks get 0 in every output component. Otherwise `write`
/// receives the cell's velocity gradient.
pub(crate) fn gradient_pass(
    ctx: &mut DeriveContext<'_>,
    mut write: impl FnMut(&mut DerivedField<'_>, IntVect, &VelocityGradient),
) -> Result<(), DeriveError> {
    let region = ctx.region();
    let stencil = Stencil::from_context(ctx);
    if stencil.fab_type() == FabType::Covered {
        ctx.out().zero(&region);
        ctx.stats_mut().covered += region.cell_count() as u64;
        return Ok(());
    }
    let state = ctx.state();
    let layout = *ctx.layout();
    for cell in region.cells() {
        let g = stencil.velocity_gradient(state, &layout, cell, ctx.stats_mut())?;
        let out = ctx.out();
        if g.covered {
            for comp in 0..out.count() {
                out.set(cell, comp, 0.0);
            }
        } else {
            write(out, cell, &g);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_test_utils::BlockFixture;
    use proptest::prelude::*;

    fn scalar_field(bx: IndexBox, dx: f64, f: impl Fn(f64) -> f64) -> FieldArray {
        FieldArray::from_fn(bx, 1, |c, _| f((c[0] as f64 + 0.5) * dx))
    }

    fn line() -> (CutCellFlags, Geometry, IndexBox, IndexBox) {
        let region = IndexBox::new([2, 0, 0], [2, 0, 0]).unwrap();
        let bx = IndexBox::new([0, 0, 0], [4, 0, 0]).unwrap();
        let flags = CutCellFlags::all_regular(bx);
        let geom = Geometry::new(2, [0.0; 3], [0.1; 3]).unwrap();
        (flags, geom, region, bx)
    }

    // ---------------------------------------------------------------
    // Stencil selection
    // ---------------------------------------------------------------

    #[test]
    fn regular_cell_uses_centered() {
        let (flags, geom, region, bx) = line();
        let s = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
        let f = scalar_field(bx, 0.1, |x| 3.0 * x);
        let d = s.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
        assert_eq!(d.kind, StencilKind::Centered);
        assert!((d.value - 3.0).abs() < 1e-12, "d = {}", d.value);
    }

    #[test]
    fn cut_cell_disconnected_hi_uses_backward() {
        let (mut flags, geom, region, bx) = line();
        flags
            .set([2, 0, 0], CellFlag::cut().disconnect(Axis::X, Side::Hi))
            .unwrap();
        let s = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
        // Poison the unreachable neighbour.
        let mut f = scalar_field(bx, 0.1, |x| x * x);
        f.set([3, 0, 0], 0, f64::NAN);
        let d = s.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
        assert_eq!(d.kind, StencilKind::Backward);
        assert!((d.value - 2.0 * 0.25).abs() < 1e-12, "d = {}", d.value);
    }

    #[test]
    fn cut_cell_disconnected_lo_uses_forward() {
        let (mut flags, geom, region, bx) = line();
        flags
            .set([2, 0, 0], CellFlag::cut().disconnect(Axis::X, Side::Lo))
            .unwrap();
        let s = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
        let mut f = scalar_field(bx, 0.1, |x| x * x);
        f.set([1, 0, 0], 0, f64::NAN);
        let d = s.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
        assert_eq!(d.kind, StencilKind::Forward);
        assert!((d.value - 0.5).abs() < 1e-12, "d = {}", d.value);
    }

    #[test]
    fn covered_cell_reads_nothing() {
        let (mut flags, geom, region, bx) = line();
        flags.set([2, 0, 0], CellFlag::covered()).unwrap();
        let s = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
        let f = FieldArray::from_fn(bx, 1, |_, _| f64::NAN);
        let d = s.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
        assert_eq!(d, Derivative::zero(StencilKind::Covered));
    }

    #[test]
    fn isolated_cell_follows_policy() {
        let (mut flags, geom, region, bx) = line();
        let isolated = CellFlag::cut()
            .disconnect(Axis::X, Side::Lo)
            .disconnect(Axis::X, Side::Hi);
        flags.set([2, 0, 0], isolated).unwrap();
        let f = FieldArray::from_fn(bx, 1, |_, _| f64::NAN);

        let zero = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
        let d = zero.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
        assert_eq!(d.kind, StencilKind::Isolated);
        assert_eq!(d.value, 0.0);

        let strict = Stencil::new(&flags, &geom, IsolatedCellPolicy::Error, &region);
        assert_eq!(
            strict.derivative(&f, 0, [2, 0, 0], Axis::X),
            Err(DeriveError::IsolatedCell {
                cell: [2, 0, 0],
                axis: 0
            })
        );
    }

    #[test]
    fn cut_cell_connected_both_sides_is_centered() {
        let (mut flags, geom, region, bx) = line();
        flags.set([2, 0, 0], CellFlag::cut()).unwrap();
        let s = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
        assert_eq!(s.fab_type(), FabType::SingleValued);
        let f = scalar_field(bx, 0.1, |x| 1.0 - x);
        let d = s.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
        assert_eq!(d.kind, StencilKind::Centered);
        assert!((d.value + 1.0).abs() < 1e-12);
    }

    // ---------------------------------------------------------------
    // Tensor assembly
    // ---------------------------------------------------------------

    #[test]
    fn solid_body_rotation_vorticity_and_q() {
        // u = -y, v = x: curl 2, no strain, Omega_01^2 + Omega_10^2 = 2.
        let g = VelocityGradient {
            ndim: 2,
            tensor: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0; 3]],
            covered: false,
        };
        assert_eq!(g.vorticity(), [0.0, 0.0, 2.0]);
        assert!((g.q_criterion() - 2.0).abs() < 1e-12);
        assert_eq!(g.divergence(), 0.0);
    }

    #[test]
    fn pure_dilatation_has_zero_q() {
        let g = VelocityGradient {
            ndim: 3,
            tensor: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            covered: false,
        };
        assert!(g.q_criterion().abs() < 1e-12);
        assert_eq!(g.vorticity_squared(), 0.0);
    }

    #[test]
    fn gradient_of_linear_velocity_3d() {
        let mut fx = BlockFixture::uniform_3d(4, 2);
        fx.set_velocity(|x| [2.0 * x[1], -x[2], 0.5 * x[0]]);
        let s = Stencil::new(&fx.flags, &fx.geometry, IsolatedCellPolicy::Zero, &fx.region);
        let mut stats = StencilStats::default();
        let g = s
            .velocity_gradient(&fx.state, &fx.layout, [1, 2, 1], &mut stats)
            .unwrap();
        assert!((g.tensor[0][1] - 2.0).abs() < 1e-10);
        assert!((g.tensor[1][2] + 1.0).abs() < 1e-10);
        assert!((g.tensor[2][0] - 0.5).abs() < 1e-10);
        assert_eq!(stats.centered, 9);
    }

    proptest! {
        #[test]
        fn all_stencils_exact_for_quadratics(
            a in -10.0f64..10.0,
            b in -10.0f64..10.0,
            c in -10.0f64..10.0,
            dx in 0.01f64..1.0,
        ) {
            let region = IndexBox::new([2, 0, 0], [2, 0, 0]).unwrap();
            let bx = IndexBox::new([0, 0, 0], [4, 0, 0]).unwrap();
            let geom = Geometry::new(2, [0.0; 3], [dx, dx, 1.0]).unwrap();
            let f = FieldArray::from_fn(bx, 1, |cell, _| {
                let x = (cell[0] as f64 + 0.5) * dx;
                a + b * x + c * x * x
            });
            let x0 = 2.5 * dx;
            let exact = b + 2.0 * c * x0;
            for flag in [
                CellFlag::regular(),
                CellFlag::cut().disconnect(Axis::X, Side::Hi),
                CellFlag::cut().disconnect(Axis::X, Side::Lo),
            ] {
                let mut flags = CutCellFlags::all_regular(bx);
                flags.set([2, 0, 0], flag).unwrap();
                let s = Stencil::new(&flags, &geom, IsolatedCellPolicy::Zero, &region);
                let d = s.derivative(&f, 0, [2, 0, 0], Axis::X).unwrap();
                let tol = 1e-8 * (1.0 + exact.abs()) / dx;
                prop_assert!(
                    (d.value - exact).abs() < tol,
                    "{:?}: {} vs {}",
                    d.kind,
                    d.value,
                    exact
                );
            }
        }
    }
}
