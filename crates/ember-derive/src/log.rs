//! Block-local buffer for per-cell diagnostic records.
//!
//! Kernels append to a [`CellLog`] owned by their block; the driver writes
//! the buffers out in block order after all blocks finish.

use std::fmt;

/// One logged cell: in-plane position, density, temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRecord {
    /// First two coordinates of the cell center.
    pub position: [f64; 2],
    /// Density.
    pub density: f64,
    /// Temperature.
    pub temperature: f64,
}

impl fmt::Display for CellRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.position[0], self.position[1], self.density, self.temperature
        )
    }
}

/// Append-only record buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellLog {
    records: Vec<CellRecord>,
}

impl CellLog {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: CellRecord) {
        self.records.push(record);
    }

    /// Buffered records.
    pub fn records(&self) -> &[CellRecord] {
        &self.records
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Move all records of `other` to the end of this buffer.
    pub fn append(&mut self, other: &mut CellLog) {
        self.records.append(&mut other.records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_line_format() {
        let r = CellRecord {
            position: [0.5, 1.25],
            density: 1.2,
            temperature: 300.0,
        };
        assert_eq!(r.to_string(), "0.5, 1.25, 1.2, 300");
    }

    #[test]
    fn append_preserves_order() {
        let rec = |x| CellRecord {
            position: [x, 0.0],
            density: 1.0,
            temperature: 1.0,
        };
        let mut a = CellLog::new();
        a.push(rec(1.0));
        let mut b = CellLog::new();
        b.push(rec(2.0));
        b.push(rec(3.0));
        a.append(&mut b);
        assert!(b.is_empty());
        let xs: Vec<f64> = a.records().iter().map(|r| r.position[0]).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }
}
