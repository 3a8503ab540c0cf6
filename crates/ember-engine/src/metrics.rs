//! Per-pass metrics for the diagnostics driver.
//!
//! [`PassMetrics`] captures timing and stencil usage for one diagnostic
//! pass over a batch of blocks.

use ember_derive::StencilStats;

/// Timing and stencil metrics collected during one pass.
///
/// Durations are in microseconds. Stencil counts are summed over all
/// blocks of the pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassMetrics {
    /// Diagnostic evaluated.
    pub diagnostic: String,
    /// Wall-clock time for the whole pass, in microseconds.
    pub elapsed_us: u64,
    /// Time spent writing buffered cell records, in microseconds.
    pub log_flush_us: u64,
    /// Blocks processed.
    pub blocks: usize,
    /// Cells evaluated.
    pub cells: u64,
    /// Cell records written to the log.
    pub logged_cells: u64,
    /// Stencil evaluations by kind.
    pub stencil: StencilStats,
}

impl PassMetrics {
    /// Fold another pass's counters into this one.
    ///
    /// Timings add; the diagnostic name is kept.
    pub fn merge(&mut self, other: &PassMetrics) {
        self.elapsed_us += other.elapsed_us;
        self.log_flush_us += other.log_flush_us;
        self.blocks += other.blocks;
        self.cells += other.cells;
        self.logged_cells += other.logged_cells;
        self.stencil.merge(&other.stencil);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = PassMetrics::default();
        assert_eq!(m.elapsed_us, 0);
        assert_eq!(m.blocks, 0);
        assert_eq!(m.cells, 0);
        assert_eq!(m.stencil.total(), 0);
    }

    #[test]
    fn merge_accumulates_counters() {
        let mut a = PassMetrics {
            diagnostic: "mag_vort".to_string(),
            elapsed_us: 10,
            blocks: 1,
            cells: 64,
            ..Default::default()
        };
        a.stencil.centered = 100;
        let mut b = PassMetrics {
            diagnostic: "mag_vort".to_string(),
            elapsed_us: 5,
            blocks: 2,
            cells: 128,
            logged_cells: 3,
            ..Default::default()
        };
        b.stencil.one_sided = 7;
        a.merge(&b);
        assert_eq!(a.elapsed_us, 15);
        assert_eq!(a.blocks, 3);
        assert_eq!(a.cells, 192);
        assert_eq!(a.logged_cells, 3);
        assert_eq!(a.stencil.centered, 100);
        assert_eq!(a.stencil.one_sided, 7);
    }
}
