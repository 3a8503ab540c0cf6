//! Engine configuration.
//!
//! [`EngineConfig`] bundles the diagnostics settings with the state layout
//! every block is expected to carry, the execution mode, and the optional
//! per-cell log destination. Construct it through [`EngineConfig::builder`],
//! whose `build()` validates the diagnostics settings against the layout.

use std::path::{Path, PathBuf};

use ember_core::{ConfigError, DiagnosticsConfig, StateLayout};

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for a [`DiagnosticsDriver`](crate::DiagnosticsDriver).
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Immutable settings handed to every kernel.
    pub diagnostics: DiagnosticsConfig,
    /// Component layout of every state block.
    pub layout: StateLayout,
    /// Process blocks on the rayon pool. Default: true.
    pub parallel: bool,
    /// Append per-cell records to this file after each pass. Default: none.
    pub cell_log: Option<PathBuf>,
}

impl EngineConfig {
    /// Builder with default diagnostics settings for `layout`.
    pub fn builder(layout: StateLayout) -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: Self {
                diagnostics: DiagnosticsConfig::default(),
                layout,
                parallel: true,
                cell_log: None,
            },
        }
    }

    /// Check the diagnostics settings against the layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.diagnostics.validate_for(&self.layout)?;
        if let Some(path) = &self.cell_log {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidLayout {
                    reason: "cell log path is empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The per-cell log path, if logging is enabled.
    pub fn cell_log(&self) -> Option<&Path> {
        self.cell_log.as_deref()
    }
}

// ── EngineConfigBuilder ────────────────────────────────────────────

/// Builder for [`EngineConfig`].
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Diagnostics settings.
    pub fn diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.config.diagnostics = diagnostics;
        self
    }

    /// Run blocks on the rayon pool (`true`) or in order on the caller.
    pub fn parallel(mut self, on: bool) -> Self {
        self.config.parallel = on;
        self
    }

    /// Append per-cell records to `path`.
    pub fn cell_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cell_log = Some(path.into());
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
