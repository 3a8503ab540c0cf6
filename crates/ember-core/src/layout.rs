//! Component layout of the solver state buffer.

use crate::error::ConfigError;

/// Maps physical quantities to component indices in a state buffer.
///
/// The layout is fixed by the host solver:
///
/// ```text
/// [u, v, (w), rho, rhoY_0 .. rhoY_{N-1}, rhoH, T, rhoRT]
/// ```
///
/// Kernels never hardcode component numbers; they ask the layout.
///
/// # Examples
///
/// ```
/// use ember_core::StateLayout;
///
/// let layout = StateLayout::new(3, 9).unwrap();
/// assert_eq!(layout.density(), 3);
/// assert_eq!(layout.first_species(), 4);
/// assert_eq!(layout.temperature(), 14);
/// assert_eq!(layout.nvar(), 16);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateLayout {
    ndim: usize,
    num_species: usize,
}

impl StateLayout {
    /// Create a layout for a `ndim`-dimensional state with `num_species` species.
    ///
    /// Returns `Err(ConfigError::InvalidLayout)` unless `ndim` is 2 or 3 and
    /// at least one species is present.
    pub fn new(ndim: usize, num_species: usize) -> Result<Self, ConfigError> {
        if !(2..=3).contains(&ndim) {
            return Err(ConfigError::InvalidLayout {
                reason: format!("ndim must be 2 or 3, got {ndim}"),
            });
        }
        if num_species == 0 {
            return Err(ConfigError::InvalidLayout {
                reason: "at least one species is required".to_string(),
            });
        }
        Ok(Self { ndim, num_species })
    }

    /// Spatial dimensionality.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Number of transported species.
    pub fn num_species(&self) -> usize {
        self.num_species
    }

    /// First velocity component.
    pub fn velocity(&self) -> usize {
        0
    }

    /// Density.
    pub fn density(&self) -> usize {
        self.ndim
    }

    /// First species partial density `rho * Y_0`.
    pub fn first_species(&self) -> usize {
        self.ndim + 1
    }

    /// Density-weighted enthalpy `rho * h`.
    pub fn rhoh(&self) -> usize {
        self.first_species() + self.num_species
    }

    /// Temperature.
    pub fn temperature(&self) -> usize {
        self.rhoh() + 1
    }

    /// Thermodynamic pressure carrier `rho * R * T`.
    pub fn rhort(&self) -> usize {
        self.temperature() + 1
    }

    /// Total number of state components.
    pub fn nvar(&self) -> usize {
        self.rhort() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_dimensional_layout() {
        let l = StateLayout::new(2, 3).unwrap();
        assert_eq!(l.velocity(), 0);
        assert_eq!(l.density(), 2);
        assert_eq!(l.first_species(), 3);
        assert_eq!(l.rhoh(), 6);
        assert_eq!(l.temperature(), 7);
        assert_eq!(l.rhort(), 8);
        assert_eq!(l.nvar(), 9);
    }

    #[test]
    fn rejects_bad_dimension() {
        assert!(matches!(
            StateLayout::new(1, 3),
            Err(ConfigError::InvalidLayout { .. })
        ));
        assert!(StateLayout::new(4, 3).is_err());
    }

    #[test]
    fn rejects_zero_species() {
        assert!(StateLayout::new(3, 0).is_err());
    }
}
