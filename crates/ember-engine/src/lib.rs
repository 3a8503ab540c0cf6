//! Diagnostics driver orchestrating Ember kernels over grid blocks.
//!
//! [`DiagnosticsDriver`] owns a kernel registry and an [`EngineConfig`]. A
//! request names a diagnostic, a block (or a batch of blocks), and a window
//! of output components. The driver validates every precondition the
//! kernel declares before touching a cell, then runs the kernel once per
//! block, serially or on the rayon pool. Per-cell log records are buffered
//! per block and written out in block order by a [`LogSink`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod sink;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use driver::{BlockTask, DiagnosticsDriver};
pub use error::{EngineError, LogError};
pub use metrics::PassMetrics;
pub use sink::LogSink;
