//! Execution context passed to kernels for one grid block.
//!
//! [`BlockView`] bundles the read-only block data (state, flags, geometry and
//! optional secondary inputs). [`DeriveContext`] adds the immutable settings,
//! the evaluators, and the mutable output, scratch, statistics, and log.

use ember_core::{DeriveError, DiagnosticsConfig, Evaluators, StateLayout};
use ember_grid::{CutCellFlags, FieldArray, Geometry, IndexBox};

use crate::log::{CellLog, CellRecord};
use crate::output::DerivedField;
use crate::scratch::ScratchRegion;
use crate::stats::{StencilKind, StencilStats};

/// Read-only view of one grid block.
#[derive(Clone, Copy, Debug)]
pub struct BlockView<'a> {
    /// Cells to evaluate.
    pub region: IndexBox,
    /// Solver state, including ghost cells around `region`.
    pub state: &'a FieldArray,
    /// Cut-cell classification over at least `region`.
    pub flags: &'a CutCellFlags,
    /// Geometry of the level.
    pub geometry: &'a Geometry,
    /// Species production rates, if available.
    pub reactions: Option<&'a FieldArray>,
    /// Node-centered pressure, if available.
    pub pressure: Option<&'a FieldArray>,
}

impl<'a> BlockView<'a> {
    /// A block without secondary inputs.
    pub fn new(
        region: IndexBox,
        state: &'a FieldArray,
        flags: &'a CutCellFlags,
        geometry: &'a Geometry,
    ) -> Self {
        Self {
            region,
            state,
            flags,
            geometry,
            reactions: None,
            pressure: None,
        }
    }

    /// Attach species production rates.
    pub fn with_reactions(mut self, reactions: &'a FieldArray) -> Self {
        self.reactions = Some(reactions);
        self
    }

    /// Attach node-centered pressure.
    pub fn with_pressure(mut self, pressure: &'a FieldArray) -> Self {
        self.pressure = Some(pressure);
        self
    }
}

/// Execution context passed to [`Derive::derive`](crate::Derive::derive).
///
/// Shared inputs are handed out with the context lifetime `'a`, so a kernel
/// may hold the state array while writing through [`out`](Self::out).
pub struct DeriveContext<'a> {
    block: BlockView<'a>,
    layout: &'a StateLayout,
    config: &'a DiagnosticsConfig,
    evaluators: Evaluators<'a>,
    out: DerivedField<'a>,
    scratch: &'a mut ScratchRegion,
    log: Option<&'a mut CellLog>,
    stats: StencilStats,
}

impl<'a> DeriveContext<'a> {
    /// Construct a context.
    ///
    /// Typically called by the driver after it has validated the request.
    /// For testing, construct directly with fixtures from `ember-test-utils`.
    pub fn new(
        block: BlockView<'a>,
        layout: &'a StateLayout,
        config: &'a DiagnosticsConfig,
        evaluators: Evaluators<'a>,
        out: DerivedField<'a>,
        scratch: &'a mut ScratchRegion,
    ) -> Self {
        Self {
            block,
            layout,
            config,
            evaluators,
            out,
            scratch,
            log: None,
            stats: StencilStats::default(),
        }
    }

    /// Enable per-cell logging into `log`.
    pub fn with_log(mut self, log: &'a mut CellLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Cells to evaluate.
    pub fn region(&self) -> IndexBox {
        self.block.region
    }

    /// Solver state.
    pub fn state(&self) -> &'a FieldArray {
        self.block.state
    }

    /// Cut-cell flags.
    pub fn flags(&self) -> &'a CutCellFlags {
        self.block.flags
    }

    /// Level geometry.
    pub fn geometry(&self) -> &'a Geometry {
        self.block.geometry
    }

    /// Species production rates, or [`DeriveError::MissingInput`].
    pub fn reactions(&self) -> Result<&'a FieldArray, DeriveError> {
        self.block.reactions.ok_or(DeriveError::MissingInput {
            input: "reaction rates",
        })
    }

    /// Node-centered pressure, or [`DeriveError::MissingInput`].
    pub fn pressure(&self) -> Result<&'a FieldArray, DeriveError> {
        self.block.pressure.ok_or(DeriveError::MissingInput {
            input: "nodal pressure",
        })
    }

    /// State component layout.
    pub fn layout(&self) -> &'a StateLayout {
        self.layout
    }

    /// Diagnostics configuration.
    pub fn config(&self) -> &'a DiagnosticsConfig {
        self.config
    }

    /// External evaluators.
    pub fn evaluators(&self) -> Evaluators<'a> {
        self.evaluators
    }

    /// Output window.
    pub fn out(&mut self) -> &mut DerivedField<'a> {
        &mut self.out
    }

    /// Scratch allocator.
    pub fn scratch(&mut self) -> &mut ScratchRegion {
        self.scratch
    }

    /// Output window and scratch allocator at once.
    ///
    /// Kernels that stage per-cell side results in scratch while writing
    /// the output need both borrows simultaneously.
    pub fn out_and_scratch(&mut self) -> (&mut DerivedField<'a>, &mut ScratchRegion) {
        (&mut self.out, &mut *self.scratch)
    }

    /// Whether per-cell logging is enabled.
    pub fn log_enabled(&self) -> bool {
        self.log.is_some()
    }

    /// Append a record if logging is enabled.
    pub fn log_cell(&mut self, record: CellRecord) {
        if let Some(log) = self.log.as_deref_mut() {
            log.push(record);
        }
    }

    /// Count one stencil evaluation.
    #[inline]
    pub fn record(&mut self, kind: StencilKind) {
        self.stats.record(kind);
    }

    /// Stencil statistics, mutably, for helpers that count evaluations.
    pub fn stats_mut(&mut self) -> &mut StencilStats {
        &mut self.stats
    }

    /// Stencil statistics gathered so far.
    pub fn stats(&self) -> StencilStats {
        self.stats
    }
}
