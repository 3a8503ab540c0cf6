//! Test utilities and mock evaluators for Ember development.
//!
//! Provides simple implementations of the evaluator traits
//! ([`Thermodynamics`], [`TransportEvaluator`], [`ChemistryEvaluator`]) and
//! block fixtures for constructing kernel test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{BlockFixture, FIXTURE_PRESSURE};

use ember_core::constants::GAS_CONSTANT;
use ember_core::{
    ChemistryEvaluator, SpeciesVec, Thermodynamics, TransportCoefficients, TransportEvaluator,
};

/// Reference temperature of the mock enthalpy model, K.
pub const T_REF: f64 = 298.15;

/// Ideal-gas mixture with constant per-species heat capacities.
///
/// `h_n(T) = h_ref_n + cp_n (T - T_REF)`, so the enthalpy inversion is exact.
#[derive(Clone, Debug)]
pub struct IdealGas {
    names: Vec<&'static str>,
    weights: Vec<f64>,
    cp: Vec<f64>,
    h_ref: Vec<f64>,
}

impl IdealGas {
    pub fn new(names: Vec<&'static str>, weights: Vec<f64>, cp: Vec<f64>, h_ref: Vec<f64>) -> Self {
        assert_eq!(names.len(), weights.len());
        assert_eq!(names.len(), cp.len());
        assert_eq!(names.len(), h_ref.len());
        Self {
            names,
            weights,
            cp,
            h_ref,
        }
    }

    /// Fuel, oxidizer, product.
    pub fn three_species() -> Self {
        Self::new(
            vec!["FUEL", "OXID", "PROD"],
            vec![0.016, 0.032, 0.024],
            vec![2200.0, 920.0, 1400.0],
            vec![-4.67e6, 0.0, -8.0e6],
        )
    }

    /// The eleven species of the piloted methane jet.
    pub fn jet_mixture() -> Self {
        Self::new(
            vec![
                "CH4", "O2", "N2", "AR", "O", "H2", "H", "H2O", "CO", "CO2", "OH",
            ],
            vec![
                0.016043, 0.031999, 0.028014, 0.039948, 0.015999, 0.002016, 0.001008, 0.018015,
                0.028010, 0.044010, 0.017007,
            ],
            vec![
                2220.0, 918.0, 1040.0, 520.0, 1370.0, 14300.0, 20620.0, 1864.0, 1040.0, 844.0,
                1760.0,
            ],
            vec![
                -4.67e6, 0.0, 0.0, 0.0, 15.57e6, 0.0, 216.0e6, -13.42e6, -3.95e6, -8.94e6, 2.19e6,
            ],
        )
    }

    pub fn species_names(&self) -> &[&'static str] {
        &self.names
    }

    /// Mixture heat capacity, J/(kg K).
    pub fn mean_cp(&self, mass_fractions: &[f64]) -> f64 {
        mass_fractions.iter().zip(&self.cp).map(|(y, c)| y * c).sum()
    }

    fn inverse_mean_weight(&self, mass_fractions: &[f64]) -> f64 {
        mass_fractions
            .iter()
            .zip(&self.weights)
            .map(|(y, w)| y / w)
            .sum()
    }
}

impl Thermodynamics for IdealGas {
    fn num_species(&self) -> usize {
        self.names.len()
    }

    fn molecular_weights(&self) -> &[f64] {
        &self.weights
    }

    fn density(&self, pressure: f64, mass_fractions: &[f64], temperature: f64) -> f64 {
        pressure / (GAS_CONSTANT * temperature * self.inverse_mean_weight(mass_fractions))
    }

    fn enthalpy(&self, temperature: f64, mass_fractions: &[f64]) -> f64 {
        mass_fractions
            .iter()
            .zip(self.h_ref.iter().zip(&self.cp))
            .map(|(y, (h0, cp))| y * (h0 + cp * (temperature - T_REF)))
            .sum()
    }

    fn species_enthalpies(&self, temperature: f64, out: &mut [f64]) {
        for (h, (h0, cp)) in out.iter_mut().zip(self.h_ref.iter().zip(&self.cp)) {
            *h = h0 + cp * (temperature - T_REF);
        }
    }

    fn temperature(&self, enthalpy: f64, mass_fractions: &[f64], _guess: f64) -> Option<f64> {
        let cp = self.mean_cp(mass_fractions);
        if cp <= 0.0 {
            return None;
        }
        let h0: f64 = mass_fractions.iter().zip(&self.h_ref).map(|(y, h)| y * h).sum();
        Some(T_REF + (enthalpy - h0) / cp)
    }
}

/// Power-law transport with species-dependent mixture-averaged diffusivities.
///
/// Both closures return the same viscosity and conductivity; unity Lewis
/// gives every species `mu * schmidt_inv`.
#[derive(Clone, Debug)]
pub struct MockTransport {
    pub viscosity_ref: f64,
    pub conductivity_ref: f64,
    pub diffusivity_ref: f64,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            viscosity_ref: 1.8e-5,
            conductivity_ref: 0.026,
            diffusivity_ref: 2.0e-5,
        }
    }
}

impl MockTransport {
    fn base(&self, temperature: f64) -> (f64, f64) {
        let s = (temperature / 300.0).powf(0.7);
        (self.viscosity_ref * s, self.conductivity_ref * s)
    }
}

impl TransportEvaluator for MockTransport {
    fn mixture_averaged(
        &self,
        density: f64,
        mass_fractions: &[f64],
        temperature: f64,
    ) -> TransportCoefficients {
        let (viscosity, conductivity) = self.base(temperature);
        let d = self.diffusivity_ref * (temperature / 300.0).powf(1.7);
        let rho_d: SpeciesVec = (0..mass_fractions.len())
            .map(|n| density * d / (1.0 + 0.25 * n as f64))
            .collect();
        TransportCoefficients {
            rho_d,
            rho_theta: None,
            conductivity,
            viscosity,
        }
    }

    fn unity_lewis(
        &self,
        _density: f64,
        mass_fractions: &[f64],
        temperature: f64,
        schmidt_inv: f64,
        _prandtl_inv: f64,
    ) -> TransportCoefficients {
        let (viscosity, conductivity) = self.base(temperature);
        TransportCoefficients {
            rho_d: std::iter::repeat(viscosity * schmidt_inv)
                .take(mass_fractions.len())
                .collect(),
            rho_theta: None,
            conductivity,
            viscosity,
        }
    }

    fn mixture_averaged_soret(
        &self,
        density: f64,
        mass_fractions: &[f64],
        temperature: f64,
    ) -> TransportCoefficients {
        let mut coeffs = self.mixture_averaged(density, mass_fractions, temperature);
        coeffs.rho_theta = Some(
            coeffs
                .rho_d
                .iter()
                .zip(mass_fractions)
                .map(|(d, y)| -0.1 * d * y)
                .collect(),
        );
        coeffs
    }
}

/// Single reversible reaction `FUEL + OXID <=> 2 PROD` over
/// [`IdealGas::three_species`].
///
/// `g_n / RT = a_n + b_n / T`; mass-action rates with constant coefficients.
#[derive(Clone, Debug)]
pub struct MockChemistry {
    pub weights: [f64; 3],
    pub gibbs_a: [f64; 3],
    pub gibbs_b: [f64; 3],
    pub k_forward: f64,
    pub k_reverse: f64,
    stoich: [(usize, i32); 3],
}

impl Default for MockChemistry {
    fn default() -> Self {
        Self {
            weights: [0.016, 0.032, 0.024],
            gibbs_a: [-10.0, -12.0, -20.0],
            gibbs_b: [-500.0, 0.0, -900.0],
            k_forward: 1.0e3,
            k_reverse: 1.0,
            stoich: [(0, -1), (1, -1), (2, 2)],
        }
    }
}

impl ChemistryEvaluator for MockChemistry {
    fn num_species(&self) -> usize {
        3
    }

    fn num_reactions(&self) -> usize {
        1
    }

    fn molecular_weights(&self) -> &[f64] {
        &self.weights
    }

    fn gibbs_rt(&self, temperature: f64, out: &mut [f64]) {
        for (n, g) in out.iter_mut().enumerate().take(3) {
            *g = self.gibbs_a[n] + self.gibbs_b[n] / temperature;
        }
    }

    fn rates_of_progress(
        &self,
        concentrations: &[f64],
        _temperature: f64,
        forward: &mut [f64],
        reverse: &mut [f64],
    ) {
        forward[0] = self.k_forward * concentrations[0] * concentrations[1];
        reverse[0] = self.k_reverse * concentrations[2] * concentrations[2];
    }

    fn stoichiometry(&self, reaction: usize) -> &[(usize, i32)] {
        if reaction == 0 {
            &self.stoich
        } else {
            &[]
        }
    }
}
