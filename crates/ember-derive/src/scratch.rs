//! Pre-allocated scratch memory for kernels.
//!
//! Each kernel declares [`scratch_bytes()`](crate::Derive::scratch_bytes) for
//! a block. The driver allocates once per block and resets the bump pointer
//! before each kernel invocation.

/// Bump-allocated `f64` scratch region.
///
/// Used for per-block intermediates (transport viscosity and conductivity,
/// species work arrays) so the inner cell loop does not allocate.
pub struct ScratchRegion {
    buf: Vec<f64>,
    offset: usize,
}

impl ScratchRegion {
    /// Create a scratch region with the given capacity **in f64 slots**.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity],
            offset: 0,
        }
    }

    /// Create from a **byte** capacity, rounded up to whole f64 slots.
    pub fn with_byte_capacity(bytes: usize) -> Self {
        let slot = std::mem::size_of::<f64>();
        Self::new(bytes / slot + usize::from(bytes % slot != 0))
    }

    /// Allocate `count` contiguous zeroed slots.
    ///
    /// Returns `None` if insufficient capacity remains.
    pub fn alloc(&mut self, count: usize) -> Option<&mut [f64]> {
        let end = self.offset.checked_add(count)?;
        if end > self.buf.len() {
            return None;
        }
        let start = self.offset;
        self.offset = end;
        self.buf[start..end].fill(0.0);
        Some(&mut self.buf[start..end])
    }

    /// Reset the bump pointer.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Total capacity in f64 slots.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Slots used since the last reset.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Remaining slots.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }
}
