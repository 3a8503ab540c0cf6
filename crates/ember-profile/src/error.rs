//! Profile errors.

use std::error::Error;
use std::fmt;

use ember_core::ConfigError;
use ember_grid::IntVect;

/// Errors from building or applying a profile.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileError {
    /// Invalid profile parameters.
    Config(ConfigError),
    /// The target array does not cover the region to fill.
    RegionNotContained {
        /// Low corner of the region.
        region_lo: IntVect,
        /// High corner of the region.
        region_hi: IntVect,
    },
    /// The target array has too few components for the state layout.
    StateComponents {
        /// Components required by the layout.
        required: usize,
        /// Components present in the array.
        available: usize,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "profile configuration: {e}"),
            Self::RegionNotContained {
                region_lo,
                region_hi,
            } => write!(
                f,
                "state array does not contain region {region_lo:?}..={region_hi:?}"
            ),
            Self::StateComponents {
                required,
                available,
            } => write!(
                f,
                "state array has {available} components, layout needs {required}"
            ),
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ProfileError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
