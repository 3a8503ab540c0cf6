//! The standard diagnostic set.

use ember_derive::{DiagnosticRegistry, RegistryError};

use crate::energy::{Enstrophy, KineticEnergy};
use crate::exergy::ReactionExergy;
use crate::extract::{
    AveragePressure, Coordinates, HeatRelease, MassFractions, MoleFractions, RhoMinusSumRhoY,
    Temperature, VelocityMagnitude,
};
use crate::qcrit::QCriterion;
use crate::scalar::{MixtureFraction, ProgressVariable};
use crate::transport::{Conductivity, DiffusionCoefficients, Viscosity};
use crate::vorticity::{Vorticity, VorticityMagnitude};

/// Register every standard kernel into `registry`.
///
/// `kinetic_energy`, `enstrophy` and `viscosity` carry incompressible
/// variants that use the configured reference density or viscosity.
pub fn register_standard(registry: &mut DiagnosticRegistry) -> Result<(), RegistryError> {
    registry.register(Box::new(Temperature))?;
    registry.register(Box::new(HeatRelease))?;
    registry.register(Box::new(MassFractions))?;
    registry.register(Box::new(MoleFractions))?;
    registry.register(Box::new(RhoMinusSumRhoY))?;
    registry.register(Box::new(AveragePressure))?;
    registry.register(Box::new(VelocityMagnitude))?;
    registry.register(Box::new(VorticityMagnitude))?;
    registry.register(Box::new(Vorticity))?;
    registry.register(Box::new(Coordinates))?;
    registry.register(Box::new(QCriterion))?;
    registry.register_with_incompressible(
        Box::new(KineticEnergy::compressible()),
        Box::new(KineticEnergy::incompressible()),
    )?;
    registry.register_with_incompressible(
        Box::new(Enstrophy::compressible()),
        Box::new(Enstrophy::incompressible()),
    )?;
    registry.register(Box::new(MixtureFraction))?;
    registry.register(Box::new(ProgressVariable))?;
    registry.register_with_incompressible(
        Box::new(Viscosity::compressible()),
        Box::new(Viscosity::reference()),
    )?;
    registry.register(Box::new(DiffusionCoefficients))?;
    registry.register(Box::new(Conductivity))?;
    registry.register(Box::new(ReactionExergy))?;
    Ok(())
}

/// A registry holding exactly the standard kernels.
pub fn standard_registry() -> Result<DiagnosticRegistry, RegistryError> {
    let mut registry = DiagnosticRegistry::new();
    register_standard(&mut registry)?;
    registry.validate()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{DeriveError, DiagnosticsConfig};

    #[test]
    fn standard_names_in_order() {
        let registry = standard_registry().unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            [
                "temp",
                "heatRelease",
                "mass_fractions",
                "mole_fractions",
                "rhominsumrhoY",
                "avg_pressure",
                "mag_vel",
                "mag_vort",
                "vorticity",
                "coordinates",
                "Qcrit",
                "kinetic_energy",
                "enstrophy",
                "mixture_fraction",
                "progress_variable",
                "viscosity",
                "diffcoeff",
                "lambda",
                "reaction_exergy",
            ]
        );
    }

    #[test]
    fn incompressible_resolution() {
        let registry = standard_registry().unwrap();
        let config = DiagnosticsConfig::builder()
            .incompressible(1.2, 1.5e-5)
            .build()
            .unwrap();
        let ke = registry.resolve("kinetic_energy", &config).unwrap();
        assert!(!ke.requires_compressible());
        assert!(registry.resolve("mag_vort", &config).is_ok());
        assert_eq!(
            registry.resolve("temp", &config).err(),
            Some(DeriveError::RequiresCompressible {
                name: "temp".into()
            })
        );
        let twice = register_standard(&mut standard_registry().unwrap());
        assert!(matches!(twice, Err(RegistryError::DuplicateName { .. })));
    }
}
