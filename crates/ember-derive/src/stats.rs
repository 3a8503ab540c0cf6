//! Stencil usage accounting.

/// Which finite-difference stencil produced a derivative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilKind {
    /// `(f[+1] - f[-1]) / 2h`.
    Centered,
    /// Three-point one-sided stencil reaching toward `-1, -2`.
    Backward,
    /// Three-point one-sided stencil reaching toward `+1, +2`.
    Forward,
    /// Covered cell; no neighbours read, value 0.
    Covered,
    /// Cut cell disconnected on both sides; no neighbours read.
    Isolated,
}

/// Counts of stencil evaluations by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StencilStats {
    /// Centered evaluations.
    pub centered: u64,
    /// One-sided evaluations (either direction).
    pub one_sided: u64,
    /// Covered-cell evaluations.
    pub covered: u64,
    /// Isolated-cell evaluations.
    pub isolated: u64,
}

impl StencilStats {
    /// Count one evaluation.
    #[inline]
    pub fn record(&mut self, kind: StencilKind) {
        match kind {
            StencilKind::Centered => self.centered += 1,
            StencilKind::Backward | StencilKind::Forward => self.one_sided += 1,
            StencilKind::Covered => self.covered += 1,
            StencilKind::Isolated => self.isolated += 1,
        }
    }

    /// Add another set of counts into this one.
    pub fn merge(&mut self, other: &StencilStats) {
        self.centered += other.centered;
        self.one_sided += other.one_sided;
        self.covered += other.covered;
        self.isolated += other.isolated;
    }

    /// Total evaluations.
    pub fn total(&self) -> u64 {
        self.centered + self.one_sided + self.covered + self.isolated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_merge() {
        let mut a = StencilStats::default();
        a.record(StencilKind::Centered);
        a.record(StencilKind::Forward);
        a.record(StencilKind::Backward);
        let mut b = StencilStats::default();
        b.record(StencilKind::Isolated);
        b.record(StencilKind::Covered);
        a.merge(&b);
        assert_eq!(a.centered, 1);
        assert_eq!(a.one_sided, 2);
        assert_eq!(a.isolated, 1);
        assert_eq!(a.total(), 5);
    }
}
