//! Engine-level error types.

use std::error::Error;
use std::fmt;
use std::io;

use ember_core::{ConfigError, DeriveError};
use ember_derive::RegistryError;

// ── LogError ───────────────────────────────────────────────────────

/// Errors from writing buffered cell records.
#[derive(Debug)]
pub enum LogError {
    /// The log file could not be opened.
    Open {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A write or flush failed.
    Io(io::Error),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => write!(f, "cannot open log '{path}': {source}"),
            Self::Io(e) => write!(f, "log I/O error: {e}"),
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for LogError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ── EngineError ────────────────────────────────────────────────────

/// Errors from constructing a driver or running a pass.
#[derive(Debug)]
pub enum EngineError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// The kernel registry is unusable.
    Registry(RegistryError),
    /// A request failed validation before any block ran.
    Derive(DeriveError),
    /// A kernel failed while evaluating a block.
    Block {
        /// Position of the block in the request.
        index: usize,
        /// The kernel's error.
        source: DeriveError,
    },
    /// A block's geometry does not match the configured layout.
    DimensionMismatch {
        /// Dimensionality of the state layout.
        layout: usize,
        /// Dimensionality of the block geometry.
        block: usize,
    },
    /// Buffered cell records could not be written.
    Log(LogError),
}

impl EngineError {
    /// The underlying derive error, whether raised during validation or by
    /// a block.
    pub fn derive_error(&self) -> Option<&DeriveError> {
        match self {
            Self::Derive(e) | Self::Block { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Derive(e) => write!(f, "request rejected: {e}"),
            Self::Block { index, source } => write!(f, "block {index}: {source}"),
            Self::DimensionMismatch { layout, block } => write!(
                f,
                "block is {block}-D but the state layout is {layout}-D"
            ),
            Self::Log(e) => write!(f, "log: {e}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Registry(e) => Some(e),
            Self::Derive(e) => Some(e),
            Self::Block { source, .. } => Some(source),
            Self::Log(e) => Some(e),
            Self::DimensionMismatch { .. } => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RegistryError> for EngineError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<DeriveError> for EngineError {
    fn from(e: DeriveError) -> Self {
        Self::Derive(e)
    }
}

impl From<LogError> for EngineError {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}
