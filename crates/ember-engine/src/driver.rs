//! The diagnostics driver.
//!
//! A pass resolves the named kernel, validates every block of the request
//! against the kernel's declarations, and only then runs the kernel once
//! per block. No cell is written if any block fails validation.
//!
//! Blocks are independent: each writes its own output array, owns its
//! scratch region, and buffers its cell records locally. With
//! [`EngineConfig::parallel`] set, blocks run on the rayon pool; the
//! buffered records are written afterwards in block order.

use std::io::Write;
use std::time::Instant;

use rayon::prelude::*;

use ember_core::{DeriveError, Evaluators};
use ember_derive::{
    BlockView, CellLog, Derive, DeriveContext, DerivedField, DiagnosticRegistry, Input,
    ScratchRegion, StencilStats,
};
use ember_grid::FieldArray;
use ember_kernels::access::require_box;
use ember_kernels::standard_registry;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::metrics::PassMetrics;
use crate::sink::LogSink;

// ── BlockTask ──────────────────────────────────────────────────────

/// One block of a request: the read-only inputs and the output array.
pub struct BlockTask<'a> {
    /// Block inputs.
    pub block: BlockView<'a>,
    /// Output array; must contain the block's region.
    pub out: &'a mut FieldArray,
}

impl<'a> BlockTask<'a> {
    /// Pair a block with its output array.
    pub fn new(block: BlockView<'a>, out: &'a mut FieldArray) -> Self {
        Self { block, out }
    }
}

struct BlockOutcome {
    cells: u64,
    stats: StencilStats,
    log: CellLog,
}

// ── DiagnosticsDriver ──────────────────────────────────────────────

/// Maps named diagnostic requests to kernels and runs them over blocks.
pub struct DiagnosticsDriver {
    registry: DiagnosticRegistry,
    config: EngineConfig,
}

impl DiagnosticsDriver {
    /// Driver over an explicit registry.
    pub fn new(registry: DiagnosticRegistry, config: EngineConfig) -> Result<Self, EngineError> {
        registry.validate()?;
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Driver over every built-in diagnostic.
    pub fn standard(config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(standard_registry()?, config)
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered kernels.
    pub fn registry(&self) -> &DiagnosticRegistry {
        &self.registry
    }

    /// Output components `name` produces under the current configuration.
    pub fn arity(&self, name: &str) -> Result<usize, DeriveError> {
        let kernel = self.registry.resolve(name, &self.config.diagnostics)?;
        Ok(kernel.arity(&self.config.layout, &self.config.diagnostics))
    }

    /// Evaluate `name` over one block into components
    /// `offset..offset + count` of `out`.
    pub fn derive(
        &self,
        name: &str,
        block: BlockView<'_>,
        out: &mut FieldArray,
        offset: usize,
        count: usize,
        evaluators: Evaluators<'_>,
    ) -> Result<PassMetrics, EngineError> {
        let mut tasks = [BlockTask::new(block, out)];
        self.derive_blocks(name, &mut tasks, offset, count, evaluators)
    }

    /// Evaluate `name` over a batch of blocks.
    ///
    /// If a cell log path is configured, records buffered by the blocks are
    /// appended to it after the pass.
    pub fn derive_blocks(
        &self,
        name: &str,
        tasks: &mut [BlockTask<'_>],
        offset: usize,
        count: usize,
        evaluators: Evaluators<'_>,
    ) -> Result<PassMetrics, EngineError> {
        let path = self.config.cell_log();
        let (mut metrics, logs) =
            self.run(name, tasks, offset, count, evaluators, path.is_some())?;
        if let Some(path) = path {
            if logs.iter().any(|log| !log.is_empty()) {
                let mut sink = LogSink::append_to(path)?;
                flush_logs(&mut sink, &logs, &mut metrics)?;
            }
        }
        Ok(metrics)
    }

    /// Evaluate `name` over a batch of blocks, writing buffered cell
    /// records to `sink` regardless of the configured log path.
    pub fn derive_blocks_logged<W: Write>(
        &self,
        name: &str,
        tasks: &mut [BlockTask<'_>],
        offset: usize,
        count: usize,
        evaluators: Evaluators<'_>,
        sink: &mut LogSink<W>,
    ) -> Result<PassMetrics, EngineError> {
        let (mut metrics, logs) = self.run(name, tasks, offset, count, evaluators, true)?;
        flush_logs(sink, &logs, &mut metrics)?;
        Ok(metrics)
    }

    fn run(
        &self,
        name: &str,
        tasks: &mut [BlockTask<'_>],
        offset: usize,
        count: usize,
        evaluators: Evaluators<'_>,
        logging: bool,
    ) -> Result<(PassMetrics, Vec<CellLog>), EngineError> {
        let start = Instant::now();
        let kernel = self.registry.resolve(name, &self.config.diagnostics)?;
        for task in tasks.iter() {
            self.check(kernel, task, offset, count, evaluators)?;
        }

        let outcomes = if self.config.parallel {
            tasks
                .par_iter_mut()
                .enumerate()
                .map(|(index, task)| {
                    self.run_block(index, kernel, task, offset, count, evaluators, logging)
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            tasks
                .iter_mut()
                .enumerate()
                .map(|(index, task)| {
                    self.run_block(index, kernel, task, offset, count, evaluators, logging)
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut metrics = PassMetrics {
            diagnostic: name.to_string(),
            blocks: outcomes.len(),
            ..PassMetrics::default()
        };
        let mut logs = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            metrics.cells += outcome.cells;
            metrics.stencil.merge(&outcome.stats);
            logs.push(outcome.log);
        }
        metrics.elapsed_us = start.elapsed().as_micros() as u64;
        log::debug!(
            "derived '{}' over {} blocks ({} cells) in {} us",
            name,
            metrics.blocks,
            metrics.cells,
            metrics.elapsed_us
        );
        Ok((metrics, logs))
    }

    /// Reject a block before any kernel runs.
    fn check(
        &self,
        kernel: &dyn Derive,
        task: &BlockTask<'_>,
        offset: usize,
        count: usize,
        evaluators: Evaluators<'_>,
    ) -> Result<(), EngineError> {
        let layout = &self.config.layout;
        let diagnostics = &self.config.diagnostics;
        let block = &task.block;
        let region = block.region;

        // 1. Dimensionality.
        let ndim = block.geometry.ndim();
        if ndim != layout.ndim() {
            return Err(EngineError::DimensionMismatch {
                layout: layout.ndim(),
                block: ndim,
            });
        }
        if !kernel.supports_ndim(ndim) {
            return Err(DeriveError::UnsupportedDimension {
                name: kernel.name().to_string(),
                ndim,
            }
            .into());
        }

        // 2. Output window and box.
        let arity = kernel.arity(layout, diagnostics);
        if arity != count {
            return Err(DeriveError::ComponentMismatch {
                name: kernel.name().to_string(),
                expected: arity,
                got: count,
            }
            .into());
        }
        let capacity = task.out.ncomp();
        if offset.checked_add(count).map_or(true, |end| end > capacity) {
            return Err(DeriveError::OutputOverflow {
                offset,
                count,
                capacity,
            }
            .into());
        }
        require_box("output", &*task.out, &region)?;

        // 3. State components and ghost cells.
        let required = kernel.state_components(layout);
        if block.state.ncomp() < required {
            return Err(DeriveError::StateComponents {
                required,
                available: block.state.ncomp(),
            }
            .into());
        }
        require_box("state", block.state, &region.grow(kernel.ghost_cells(), ndim))?;
        if !block.flags.bx().contains_box(&region) {
            return Err(DeriveError::RegionNotContained {
                buffer: "flags",
                region_lo: region.lo(),
                region_hi: region.hi(),
            }
            .into());
        }

        // 4. Secondary inputs.
        for input in kernel.inputs(diagnostics) {
            match input {
                Input::Reactions => {
                    let reactions = block.reactions.ok_or(DeriveError::MissingInput {
                        input: "reaction rates",
                    })?;
                    require_box("reactions", reactions, &region)?;
                }
                Input::NodalPressure => {
                    let pressure = block.pressure.ok_or(DeriveError::MissingInput {
                        input: "nodal pressure",
                    })?;
                    require_box("pressure", pressure, &region.surrounding_nodes(ndim))?;
                }
                Input::Thermodynamics => {
                    evaluators.thermo()?;
                }
                Input::Transport => {
                    evaluators.transport()?;
                }
                Input::Chemistry => {
                    evaluators.chemistry()?;
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn run_block(
        &self,
        index: usize,
        kernel: &dyn Derive,
        task: &mut BlockTask<'_>,
        offset: usize,
        count: usize,
        evaluators: Evaluators<'_>,
        logging: bool,
    ) -> Result<BlockOutcome, EngineError> {
        let region = task.block.region;
        let cells = region.cell_count();
        log::trace!(
            "dispatch '{}' block {} {:?}..={:?}",
            kernel.name(),
            index,
            region.lo(),
            region.hi()
        );

        let fail = |source: DeriveError| EngineError::Block { index, source };
        let mut scratch =
            ScratchRegion::with_byte_capacity(kernel.scratch_bytes(&self.config.layout, cells));
        let mut log = CellLog::new();
        let out = DerivedField::new(&mut *task.out, offset, count).map_err(fail)?;
        let mut ctx = DeriveContext::new(
            task.block,
            &self.config.layout,
            &self.config.diagnostics,
            evaluators,
            out,
            &mut scratch,
        );
        if logging {
            ctx = ctx.with_log(&mut log);
        }
        kernel.derive(&mut ctx).map_err(fail)?;
        let stats = ctx.stats();

        if stats.isolated > 0 {
            log::warn!(
                "'{}' block {}: {} stencils hit cut cells disconnected on both sides",
                kernel.name(),
                index,
                stats.isolated
            );
        }
        Ok(BlockOutcome {
            cells: cells as u64,
            stats,
            log,
        })
    }
}

fn flush_logs<W: Write>(
    sink: &mut LogSink<W>,
    logs: &[CellLog],
    metrics: &mut PassMetrics,
) -> Result<(), EngineError> {
    let start = Instant::now();
    let before = sink.lines_written();
    sink.write_all(logs)?;
    metrics.logged_cells = sink.lines_written() - before;
    metrics.log_flush_us = start.elapsed().as_micros() as u64;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::StateLayout;
    use ember_test_utils::BlockFixture;

    fn driver(ndim: usize, parallel: bool) -> DiagnosticsDriver {
        let layout = StateLayout::new(ndim, 3).unwrap();
        let config = EngineConfig::builder(layout)
            .parallel(parallel)
            .build()
            .unwrap();
        DiagnosticsDriver::standard(config).unwrap()
    }

    #[test]
    fn temperature_copied_through_offset() {
        let fx = BlockFixture::uniform_2d(4, 0);
        let mut out = fx.output(3);
        let block = BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry);
        let metrics = driver(2, false)
            .derive("temp", block, &mut out, 2, 1, Evaluators::default())
            .unwrap();
        assert_eq!(metrics.blocks, 1);
        assert_eq!(metrics.cells, 16);
        assert_eq!(metrics.diagnostic, "temp");
        for cell in fx.region.cells() {
            assert_eq!(out.get(cell, 2), 1000.0);
            assert_eq!(out.get(cell, 0), 0.0);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let fx = BlockFixture::uniform_2d(2, 0);
        let mut out = fx.output(1);
        let block = BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry);
        let err = driver(2, false)
            .derive("nope", block, &mut out, 0, 1, Evaluators::default())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Derive(DeriveError::UnknownDiagnostic { .. })
        ));
    }

    #[test]
    fn arity_reflects_layout() {
        assert_eq!(driver(2, false).arity("vorticity").unwrap(), 1);
        assert_eq!(driver(3, false).arity("vorticity").unwrap(), 3);
        assert_eq!(driver(3, false).arity("mass_fractions").unwrap(), 3);
        assert_eq!(driver(2, false).arity("coordinates").unwrap(), 2);
    }

    #[test]
    fn empty_request_resolves_name() {
        let d = driver(2, true);
        let metrics = d
            .derive_blocks("mag_vel", &mut [], 0, 1, Evaluators::default())
            .unwrap();
        assert_eq!(metrics.blocks, 0);
        assert!(d
            .derive_blocks("missing", &mut [], 0, 1, Evaluators::default())
            .is_err());
    }
}
