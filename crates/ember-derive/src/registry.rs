//! Name-keyed kernel registry.
//!
//! [`DiagnosticRegistry`] maps a diagnostic name to its kernel. An entry may
//! carry an incompressible variant, which [`resolve`](DiagnosticRegistry::resolve)
//! selects when the configuration runs in incompressible mode.

use indexmap::IndexMap;

use ember_core::{DeriveError, DiagnosticsConfig};

use crate::derive::Derive;

use std::error::Error;
use std::fmt;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from building a registry (startup-time, not per-pass).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No kernels registered.
    EmptyRegistry,
    /// Two kernels share a name.
    DuplicateName {
        /// The contested name.
        name: String,
    },
    /// An incompressible variant's name differs from its primary kernel's.
    VariantNameMismatch {
        /// Primary kernel name.
        name: String,
        /// Variant kernel name.
        variant: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegistry => write!(f, "registry has no diagnostics"),
            Self::DuplicateName { name } => {
                write!(f, "diagnostic '{name}' registered twice")
            }
            Self::VariantNameMismatch { name, variant } => write!(
                f,
                "incompressible variant '{variant}' does not match diagnostic '{name}'"
            ),
        }
    }
}

impl Error for RegistryError {}

// ── Registry ───────────────────────────────────────────────────────

struct Entry {
    kernel: Box<dyn Derive>,
    incompressible: Option<Box<dyn Derive>>,
}

/// Ordered collection of kernels keyed by name.
#[derive(Default)]
pub struct DiagnosticRegistry {
    entries: IndexMap<String, Entry>,
}

impl DiagnosticRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kernel under its own name.
    pub fn register(&mut self, kernel: Box<dyn Derive>) -> Result<(), RegistryError> {
        self.insert(kernel, None)
    }

    /// Register a kernel together with the variant used in incompressible
    /// mode. Both must report the same name.
    pub fn register_with_incompressible(
        &mut self,
        kernel: Box<dyn Derive>,
        incompressible: Box<dyn Derive>,
    ) -> Result<(), RegistryError> {
        if kernel.name() != incompressible.name() {
            return Err(RegistryError::VariantNameMismatch {
                name: kernel.name().to_string(),
                variant: incompressible.name().to_string(),
            });
        }
        self.insert(kernel, Some(incompressible))
    }

    fn insert(
        &mut self,
        kernel: Box<dyn Derive>,
        incompressible: Option<Box<dyn Derive>>,
    ) -> Result<(), RegistryError> {
        let name = kernel.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateName { name });
        }
        self.entries.insert(
            name,
            Entry {
                kernel,
                incompressible,
            },
        );
        Ok(())
    }

    /// Check the registry is usable.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.entries.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }
        Ok(())
    }

    /// Select the kernel for `name` under `config`.
    ///
    /// In incompressible mode the entry's incompressible variant is chosen if
    /// present; otherwise a kernel that needs the density field is rejected
    /// with [`DeriveError::RequiresCompressible`].
    pub fn resolve(
        &self,
        name: &str,
        config: &DiagnosticsConfig,
    ) -> Result<&dyn Derive, DeriveError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DeriveError::UnknownDiagnostic {
                name: name.to_string(),
            })?;
        if !config.incompressible() {
            return Ok(entry.kernel.as_ref());
        }
        if let Some(variant) = &entry.incompressible {
            return Ok(variant.as_ref());
        }
        if entry.kernel.requires_compressible() {
            return Err(DeriveError::RequiresCompressible {
                name: name.to_string(),
            });
        }
        Ok(entry.kernel.as_ref())
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no diagnostics are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
