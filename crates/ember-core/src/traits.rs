//! Interfaces to the external evaluators.
//!
//! Kernels never link against a particular mechanism library. The host
//! supplies implementations of [`Thermodynamics`], [`TransportEvaluator`],
//! and [`ChemistryEvaluator`]; kernels receive them bundled in
//! [`Evaluators`]. All quantities are SI.

use smallvec::SmallVec;

use crate::error::DeriveError;

/// Per-cell species buffer. Inline for mechanisms up to 16 species.
pub type SpeciesVec = SmallVec<[f64; 16]>;

/// Transport coefficients for one cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransportCoefficients {
    /// Density-weighted species diffusion coefficients `rho * D_n`, kg/(m s).
    pub rho_d: SpeciesVec,
    /// Thermal-diffusion (Soret) coefficients, present only when requested.
    pub rho_theta: Option<SpeciesVec>,
    /// Thermal conductivity, W/(m K).
    pub conductivity: f64,
    /// Dynamic viscosity, Pa s.
    pub viscosity: f64,
}

/// Equation of state and thermodynamic properties.
pub trait Thermodynamics: Send + Sync {
    /// Number of species in the mechanism.
    fn num_species(&self) -> usize;

    /// Molecular weights, kg/mol.
    fn molecular_weights(&self) -> &[f64];

    /// Density from pressure, mass fractions and temperature.
    fn density(&self, pressure: f64, mass_fractions: &[f64], temperature: f64) -> f64;

    /// Mixture specific enthalpy, J/kg.
    fn enthalpy(&self, temperature: f64, mass_fractions: &[f64]) -> f64;

    /// Per-species specific enthalpies at `temperature`, J/kg.
    fn species_enthalpies(&self, temperature: f64, out: &mut [f64]);

    /// Temperature from mixture enthalpy, starting from `guess`.
    ///
    /// Returns `None` if the inversion does not converge.
    fn temperature(&self, enthalpy: f64, mass_fractions: &[f64], guess: f64) -> Option<f64>;

    /// Convert mass fractions to mole fractions.
    ///
    /// The default implementation uses [`molecular_weights`](Self::molecular_weights).
    fn mass_to_mole(&self, mass_fractions: &[f64], out: &mut [f64]) {
        let weights = self.molecular_weights();
        let mut sum = 0.0;
        for ((x, y), w) in out.iter_mut().zip(mass_fractions).zip(weights) {
            *x = y / w;
            sum += *x;
        }
        if sum > 0.0 {
            for x in out.iter_mut() {
                *x /= sum;
            }
        }
    }
}

/// Mixture transport properties.
///
/// One method per closure; the dispatcher calls exactly one of them per cell.
pub trait TransportEvaluator: Send + Sync {
    /// Mixture-averaged viscosity, conductivity and diffusivities.
    fn mixture_averaged(
        &self,
        density: f64,
        mass_fractions: &[f64],
        temperature: f64,
    ) -> TransportCoefficients;

    /// Unity-Lewis closure: diffusivities tied to viscosity through the
    /// inverse Schmidt number, conductivity through the inverse Prandtl number.
    fn unity_lewis(
        &self,
        density: f64,
        mass_fractions: &[f64],
        temperature: f64,
        schmidt_inv: f64,
        prandtl_inv: f64,
    ) -> TransportCoefficients;

    /// Mixture-averaged transport with Soret coefficients filled in.
    fn mixture_averaged_soret(
        &self,
        density: f64,
        mass_fractions: &[f64],
        temperature: f64,
    ) -> TransportCoefficients;
}

/// Reaction mechanism: Gibbs energies, rates of progress, stoichiometry.
pub trait ChemistryEvaluator: Send + Sync {
    /// Number of species.
    fn num_species(&self) -> usize;

    /// Number of reactions.
    fn num_reactions(&self) -> usize;

    /// Molecular weights, kg/mol.
    fn molecular_weights(&self) -> &[f64];

    /// Non-dimensional standard Gibbs energies `g_n / (R T)`.
    fn gibbs_rt(&self, temperature: f64, out: &mut [f64]);

    /// Forward and reverse rates of progress for every reaction, given molar
    /// concentrations in mol/m^3.
    fn rates_of_progress(
        &self,
        concentrations: &[f64],
        temperature: f64,
        forward: &mut [f64],
        reverse: &mut [f64],
    );

    /// Net stoichiometric coefficients of reaction `reaction` as
    /// `(species, nu)` pairs; products positive, reactants negative.
    fn stoichiometry(&self, reaction: usize) -> &[(usize, i32)];
}

/// The evaluators available to a diagnostic pass.
///
/// Any of them may be absent; kernels that need a missing evaluator fail
/// with [`DeriveError::MissingInput`].
#[derive(Clone, Copy, Default)]
pub struct Evaluators<'a> {
    /// Thermodynamics.
    pub thermo: Option<&'a dyn Thermodynamics>,
    /// Transport.
    pub transport: Option<&'a dyn TransportEvaluator>,
    /// Chemistry.
    pub chemistry: Option<&'a dyn ChemistryEvaluator>,
}

impl<'a> Evaluators<'a> {
    /// Resolve the thermodynamics evaluator.
    pub fn thermo(&self) -> Result<&'a dyn Thermodynamics, DeriveError> {
        self.thermo.ok_or(DeriveError::MissingInput {
            input: "thermodynamics evaluator",
        })
    }

    /// Resolve the transport evaluator.
    pub fn transport(&self) -> Result<&'a dyn TransportEvaluator, DeriveError> {
        self.transport.ok_or(DeriveError::MissingInput {
            input: "transport evaluator",
        })
    }

    /// Resolve the chemistry evaluator.
    pub fn chemistry(&self) -> Result<&'a dyn ChemistryEvaluator, DeriveError> {
        self.chemistry.ok_or(DeriveError::MissingInput {
            input: "chemistry evaluator",
        })
    }
}

impl std::fmt::Debug for Evaluators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluators")
            .field("thermo", &self.thermo.is_some())
            .field("transport", &self.transport.is_some())
            .field("chemistry", &self.chemistry.is_some())
            .finish()
    }
}
