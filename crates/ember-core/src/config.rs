//! Immutable diagnostics configuration.
//!
//! [`DiagnosticsConfig`] is the capability struct handed to every kernel.
//! It carries only the solver settings that diagnostics depend on: the
//! incompressible flag and reference properties, the transport closure, and
//! the scalar mappings for mixture fraction and progress variable.
//!
//! Scalar mappings are tagged [`ScalarMapping::Uninitialized`] until the
//! problem setup configures them; kernels resolve them once per block with
//! [`ScalarMapping::get`].

use crate::error::{ConfigError, DeriveError};
use crate::layout::StateLayout;

// ── ClosureModel ───────────────────────────────────────────────────

/// Transport closure used to evaluate species diffusivities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClosureModel {
    /// Full mixture-averaged transport.
    #[default]
    MixtureAveraged,
    /// Diffusivity tied to thermal diffusivity through fixed Schmidt and
    /// Prandtl numbers.
    UnityLewis,
    /// Mixture-averaged transport plus thermal-diffusion (Soret) coefficients.
    MixtureAveragedSoret,
}

impl ClosureModel {
    /// Select a closure from the two solver flags.
    ///
    /// Soret takes priority over unity Lewis; with neither flag set the
    /// closure is mixture-averaged.
    ///
    /// ```
    /// use ember_core::ClosureModel;
    ///
    /// assert_eq!(ClosureModel::from_flags(true, true), ClosureModel::MixtureAveragedSoret);
    /// assert_eq!(ClosureModel::from_flags(false, true), ClosureModel::UnityLewis);
    /// assert_eq!(ClosureModel::from_flags(false, false), ClosureModel::MixtureAveraged);
    /// ```
    pub fn from_flags(use_soret: bool, unity_lewis: bool) -> Self {
        if use_soret {
            Self::MixtureAveragedSoret
        } else if unity_lewis {
            Self::UnityLewis
        } else {
            Self::MixtureAveraged
        }
    }

    /// Whether the closure produces Soret coefficients.
    pub fn has_soret(&self) -> bool {
        matches!(self, Self::MixtureAveragedSoret)
    }
}

// ── IsolatedCellPolicy ─────────────────────────────────────────────

/// What the stencil evaluator does with a cut cell that is disconnected on
/// both sides of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IsolatedCellPolicy {
    /// The derivative along that axis is zero.
    #[default]
    Zero,
    /// The kernel fails with [`DeriveError::IsolatedCell`].
    Error,
}

// ── ScalarMapping ──────────────────────────────────────────────────

/// A parameter set that is either unconfigured or configured.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarMapping<P> {
    /// Problem setup has not provided parameters.
    Uninitialized,
    /// Parameters are available.
    Configured(P),
}

impl<P> Default for ScalarMapping<P> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl<P> ScalarMapping<P> {
    /// Resolve the parameters, failing with
    /// [`DeriveError::NotInitialized`] if they were never configured.
    pub fn get(&self, mapping: &'static str) -> Result<&P, DeriveError> {
        match self {
            Self::Configured(p) => Ok(p),
            Self::Uninitialized => Err(DeriveError::NotInitialized { mapping }),
        }
    }

    /// Returns `true` if parameters are available.
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

// ── MixtureFractionParams ──────────────────────────────────────────

/// Bilger mixture-fraction coefficients.
///
/// `Z = (sum_n Y_n w_n - z_ox) / (z_fu - z_ox)`.
#[derive(Clone, Debug, PartialEq)]
pub struct MixtureFractionParams {
    bilger_weights: Vec<f64>,
    z_ox: f64,
    z_fu: f64,
}

impl MixtureFractionParams {
    /// Create from explicit reference values.
    ///
    /// Returns `Err(ConfigError::DegenerateMapping)` if `z_fu == z_ox` or
    /// either value is not finite.
    pub fn new(bilger_weights: Vec<f64>, z_ox: f64, z_fu: f64) -> Result<Self, ConfigError> {
        if !z_ox.is_finite() || !z_fu.is_finite() || z_fu == z_ox {
            return Err(ConfigError::DegenerateMapping {
                mapping: "mixture fraction",
            });
        }
        Ok(Self {
            bilger_weights,
            z_ox,
            z_fu,
        })
    }

    /// Create from the oxidizer and fuel stream compositions (mass fractions).
    ///
    /// The reference values are the weighted sums of the two streams, so the
    /// oxidizer maps to 0 and the fuel to 1.
    pub fn from_streams(
        bilger_weights: Vec<f64>,
        oxidizer: &[f64],
        fuel: &[f64],
    ) -> Result<Self, ConfigError> {
        let z_ox = weighted_sum(&bilger_weights, oxidizer);
        let z_fu = weighted_sum(&bilger_weights, fuel);
        Self::new(bilger_weights, z_ox, z_fu)
    }

    /// Per-species Bilger weights.
    pub fn bilger_weights(&self) -> &[f64] {
        &self.bilger_weights
    }

    /// Oxidizer reference value.
    pub fn z_ox(&self) -> f64 {
        self.z_ox
    }

    /// Fuel reference value.
    pub fn z_fu(&self) -> f64 {
        self.z_fu
    }
}

// ── ProgressVariableParams ─────────────────────────────────────────

/// Progress-variable coefficients.
///
/// `C_raw = sum_n Y_n w_n + T w_T`, normalized between the unburnt (`c0`)
/// and burnt (`c1`) reference values; `reverse` flips the result.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressVariableParams {
    species_weights: Vec<f64>,
    temperature_weight: f64,
    c0: f64,
    c1: f64,
    reverse: bool,
}

impl ProgressVariableParams {
    /// Create from explicit reference values.
    pub fn new(
        species_weights: Vec<f64>,
        temperature_weight: f64,
        c0: f64,
        c1: f64,
        reverse: bool,
    ) -> Result<Self, ConfigError> {
        if !c0.is_finite() || !c1.is_finite() || c0 == c1 {
            return Err(ConfigError::DegenerateMapping {
                mapping: "progress variable",
            });
        }
        Ok(Self {
            species_weights,
            temperature_weight,
            c0,
            c1,
            reverse,
        })
    }

    /// Create from unburnt and burnt reference states
    /// `(mass_fractions, temperature)`.
    pub fn from_states(
        species_weights: Vec<f64>,
        temperature_weight: f64,
        unburnt: (&[f64], f64),
        burnt: (&[f64], f64),
        reverse: bool,
    ) -> Result<Self, ConfigError> {
        let c0 = weighted_sum(&species_weights, unburnt.0) + unburnt.1 * temperature_weight;
        let c1 = weighted_sum(&species_weights, burnt.0) + burnt.1 * temperature_weight;
        Self::new(species_weights, temperature_weight, c0, c1, reverse)
    }

    /// Per-species weights.
    pub fn species_weights(&self) -> &[f64] {
        &self.species_weights
    }

    /// Temperature weight.
    pub fn temperature_weight(&self) -> f64 {
        self.temperature_weight
    }

    /// Unburnt reference value.
    pub fn c0(&self) -> f64 {
        self.c0
    }

    /// Burnt reference value.
    pub fn c1(&self) -> f64 {
        self.c1
    }

    /// Whether the normalized value is reported as `1 - C`.
    pub fn reverse(&self) -> bool {
        self.reverse
    }
}

fn weighted_sum(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}

// ── DiagnosticsConfig ──────────────────────────────────────────────

/// Solver settings consumed by diagnostic kernels.
///
/// Immutable once built; kernels receive it by reference through the
/// derive context. Construct with [`DiagnosticsConfig::builder`].
///
/// ```
/// use ember_core::{ClosureModel, DiagnosticsConfig};
///
/// let config = DiagnosticsConfig::builder()
///     .unity_lewis(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.closure(), ClosureModel::UnityLewis);
/// assert!(!config.incompressible());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticsConfig {
    incompressible: bool,
    reference_density: f64,
    reference_viscosity: f64,
    closure: ClosureModel,
    schmidt_inv: f64,
    prandtl_inv: f64,
    mixture_fraction: ScalarMapping<MixtureFractionParams>,
    progress_variable: ScalarMapping<ProgressVariableParams>,
    isolated_cells: IsolatedCellPolicy,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            incompressible: false,
            reference_density: 1.17,
            reference_viscosity: 1.8e-5,
            closure: ClosureModel::MixtureAveraged,
            schmidt_inv: 1.0 / 0.7,
            prandtl_inv: 1.0 / 0.7,
            mixture_fraction: ScalarMapping::Uninitialized,
            progress_variable: ScalarMapping::Uninitialized,
            isolated_cells: IsolatedCellPolicy::Zero,
        }
    }
}

impl DiagnosticsConfig {
    /// Create a builder seeded with the defaults.
    pub fn builder() -> DiagnosticsConfigBuilder {
        DiagnosticsConfigBuilder {
            config: Self::default(),
            use_soret: false,
            unity_lewis: false,
        }
    }

    /// Whether the solver runs in incompressible (constant density) mode.
    pub fn incompressible(&self) -> bool {
        self.incompressible
    }

    /// Constant density used in incompressible mode.
    pub fn reference_density(&self) -> f64 {
        self.reference_density
    }

    /// Constant viscosity used in incompressible mode.
    pub fn reference_viscosity(&self) -> f64 {
        self.reference_viscosity
    }

    /// Selected transport closure.
    pub fn closure(&self) -> ClosureModel {
        self.closure
    }

    /// Inverse Schmidt number for the unity-Lewis closure.
    pub fn schmidt_inv(&self) -> f64 {
        self.schmidt_inv
    }

    /// Inverse Prandtl number for the unity-Lewis closure.
    pub fn prandtl_inv(&self) -> f64 {
        self.prandtl_inv
    }

    /// Mixture-fraction mapping.
    pub fn mixture_fraction(&self) -> &ScalarMapping<MixtureFractionParams> {
        &self.mixture_fraction
    }

    /// Progress-variable mapping.
    pub fn progress_variable(&self) -> &ScalarMapping<ProgressVariableParams> {
        &self.progress_variable
    }

    /// Policy for doubly-disconnected cut cells.
    pub fn isolated_cells(&self) -> IsolatedCellPolicy {
        self.isolated_cells
    }

    /// Check the configured mappings against a state layout.
    ///
    /// Mixture-fraction weights must have one entry per species; progress
    /// variable weights likewise (the temperature weight is separate).
    pub fn validate_for(&self, layout: &StateLayout) -> Result<(), ConfigError> {
        let ns = layout.num_species();
        if let ScalarMapping::Configured(p) = &self.mixture_fraction {
            if p.bilger_weights().len() != ns {
                return Err(ConfigError::WeightCountMismatch {
                    mapping: "mixture fraction",
                    expected: ns,
                    got: p.bilger_weights().len(),
                });
            }
        }
        if let ScalarMapping::Configured(p) = &self.progress_variable {
            if p.species_weights().len() != ns {
                return Err(ConfigError::WeightCountMismatch {
                    mapping: "progress variable",
                    expected: ns,
                    got: p.species_weights().len(),
                });
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.reference_density.is_finite() || self.reference_density <= 0.0 {
            return Err(ConfigError::InvalidReferenceDensity {
                value: self.reference_density,
            });
        }
        if !self.reference_viscosity.is_finite() || self.reference_viscosity < 0.0 {
            return Err(ConfigError::InvalidReferenceViscosity {
                value: self.reference_viscosity,
            });
        }
        for (name, value) in [
            ("schmidt_inv", self.schmidt_inv),
            ("prandtl_inv", self.prandtl_inv),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTransportNumber { name, value });
            }
        }
        Ok(())
    }
}

/// Builder for [`DiagnosticsConfig`].
pub struct DiagnosticsConfigBuilder {
    config: DiagnosticsConfig,
    use_soret: bool,
    unity_lewis: bool,
}

impl DiagnosticsConfigBuilder {
    /// Run in incompressible mode with the given constant density and viscosity.
    pub fn incompressible(mut self, density: f64, viscosity: f64) -> Self {
        self.config.incompressible = true;
        self.config.reference_density = density;
        self.config.reference_viscosity = viscosity;
        self
    }

    /// Request Soret coefficients (takes priority over unity Lewis).
    pub fn use_soret(mut self, on: bool) -> Self {
        self.use_soret = on;
        self
    }

    /// Request the unity-Lewis closure.
    pub fn unity_lewis(mut self, on: bool) -> Self {
        self.unity_lewis = on;
        self
    }

    /// Schmidt number for the unity-Lewis closure (stored inverted).
    pub fn schmidt(mut self, sc: f64) -> Self {
        self.config.schmidt_inv = 1.0 / sc;
        self
    }

    /// Prandtl number for the unity-Lewis closure (stored inverted).
    pub fn prandtl(mut self, pr: f64) -> Self {
        self.config.prandtl_inv = 1.0 / pr;
        self
    }

    /// Configure the mixture-fraction mapping.
    pub fn mixture_fraction(mut self, params: MixtureFractionParams) -> Self {
        self.config.mixture_fraction = ScalarMapping::Configured(params);
        self
    }

    /// Configure the progress-variable mapping.
    pub fn progress_variable(mut self, params: ProgressVariableParams) -> Self {
        self.config.progress_variable = ScalarMapping::Configured(params);
        self
    }

    /// Policy for doubly-disconnected cut cells.
    pub fn isolated_cells(mut self, policy: IsolatedCellPolicy) -> Self {
        self.config.isolated_cells = policy;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the reference density is not positive, the reference
    /// viscosity is negative, or a Schmidt/Prandtl inverse is not positive.
    pub fn build(mut self) -> Result<DiagnosticsConfig, ConfigError> {
        self.config.closure = ClosureModel::from_flags(self.use_soret, self.unity_lewis);
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_compressible_mixture_averaged() {
        let c = DiagnosticsConfig::builder().build().unwrap();
        assert!(!c.incompressible());
        assert_eq!(c.closure(), ClosureModel::MixtureAveraged);
        assert!(!c.mixture_fraction().is_configured());
        assert!(!c.progress_variable().is_configured());
        assert_eq!(c.isolated_cells(), IsolatedCellPolicy::Zero);
    }

    #[test]
    fn soret_wins_over_unity_lewis() {
        let c = DiagnosticsConfig::builder()
            .unity_lewis(true)
            .use_soret(true)
            .build()
            .unwrap();
        assert_eq!(c.closure(), ClosureModel::MixtureAveragedSoret);
        assert!(c.closure().has_soret());
    }

    #[test]
    fn uninitialized_mapping_is_fatal() {
        let c = DiagnosticsConfig::default();
        let err = c.mixture_fraction().get("mixture fraction").unwrap_err();
        assert_eq!(
            err,
            DeriveError::NotInitialized {
                mapping: "mixture fraction"
            }
        );
        assert!(c.progress_variable().get("progress variable").is_err());
    }

    #[test]
    fn rejects_non_positive_reference_density() {
        let r = DiagnosticsConfig::builder().incompressible(0.0, 1e-5).build();
        assert!(matches!(
            r,
            Err(ConfigError::InvalidReferenceDensity { .. })
        ));
    }

    #[test]
    fn rejects_bad_schmidt() {
        let r = DiagnosticsConfig::builder().schmidt(f64::INFINITY).build();
        assert!(matches!(r, Err(ConfigError::InvalidTransportNumber { .. })));
    }

    #[test]
    fn degenerate_mixture_fraction_rejected() {
        let w = vec![1.0, 0.0];
        let r = MixtureFractionParams::from_streams(w, &[0.5, 0.5], &[0.5, 0.5]);
        assert_eq!(
            r.unwrap_err(),
            ConfigError::DegenerateMapping {
                mapping: "mixture fraction"
            }
        );
    }

    #[test]
    fn weight_count_checked_against_layout() {
        let layout = StateLayout::new(2, 3).unwrap();
        let mf = MixtureFractionParams::new(vec![1.0, 0.0], 0.0, 1.0).unwrap();
        let c = DiagnosticsConfig::builder()
            .mixture_fraction(mf)
            .build()
            .unwrap();
        assert_eq!(
            c.validate_for(&layout),
            Err(ConfigError::WeightCountMismatch {
                mapping: "mixture fraction",
                expected: 3,
                got: 2,
            })
        );
    }

    proptest! {
        #[test]
        fn closure_priority(soret in any::<bool>(), lewis in any::<bool>()) {
            let model = ClosureModel::from_flags(soret, lewis);
            prop_assert_eq!(model.has_soret(), soret);
            if !soret {
                prop_assert_eq!(model == ClosureModel::UnityLewis, lewis);
            }
        }
    }
}
