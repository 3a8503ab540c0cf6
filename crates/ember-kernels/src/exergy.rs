//! Reaction exergy destruction.
//!
//! For each cell, chemical potentials are built from the evaluator's standard
//! Gibbs energies and the local molar concentrations,
//!
//! ```text
//! mu_n = R T ( g_n/RT + ln max(c_n R T / P_atm, eps) )
//! ```
//!
//! and every reaction contributes `(q_f - q_r) * sum_m nu_m mu_m`. Reactions
//! touching a species with negative concentration are skipped.
//!
//! When the context carries a log, one [`CellRecord`] is appended per cell.

use ember_core::constants::{ATMOSPHERE, GAS_CONSTANT};
use ember_core::{ChemistryEvaluator, DeriveError, DiagnosticsConfig, SpeciesVec, StateLayout};
use ember_derive::{CellRecord, Derive, DeriveContext, Input};

use crate::access::{mass_fractions, require_species};

/// Per-reaction work buffers, sized once per block.
struct Workspace {
    concentrations: SpeciesVec,
    gibbs: SpeciesVec,
    potentials: SpeciesVec,
    forward: Vec<f64>,
    reverse: Vec<f64>,
}

impl Workspace {
    fn new(species: usize, reactions: usize) -> Self {
        Self {
            concentrations: smallvec::smallvec![0.0; species],
            gibbs: smallvec::smallvec![0.0; species],
            potentials: smallvec::smallvec![0.0; species],
            forward: vec![0.0; reactions],
            reverse: vec![0.0; reactions],
        }
    }
}

/// Exergy destruction rate of one cell, given mass fractions, density and
/// temperature.
fn cell_exergy(
    chemistry: &dyn ChemistryEvaluator,
    ws: &mut Workspace,
    rho: f64,
    y: &[f64],
    temperature: f64,
) -> f64 {
    let weights = chemistry.molecular_weights();
    let rt = GAS_CONSTANT * temperature;
    for (n, c) in ws.concentrations.iter_mut().enumerate() {
        *c = rho * y[n] / weights[n];
    }
    chemistry.gibbs_rt(temperature, &mut ws.gibbs);
    for ((mu, g), c) in ws
        .potentials
        .iter_mut()
        .zip(&ws.gibbs)
        .zip(&ws.concentrations)
    {
        let activity = (c * rt / ATMOSPHERE).max(f64::EPSILON);
        *mu = rt * (g + activity.ln());
    }
    chemistry.rates_of_progress(&ws.concentrations, temperature, &mut ws.forward, &mut ws.reverse);

    let mut total = 0.0;
    for j in 0..chemistry.num_reactions() {
        let stoich = chemistry.stoichiometry(j);
        if stoich.iter().any(|&(k, _)| ws.concentrations[k] < 0.0) {
            continue;
        }
        let delta_g: f64 = stoich
            .iter()
            .map(|&(k, nu)| f64::from(nu) * ws.potentials[k])
            .sum();
        total += (ws.forward[j] - ws.reverse[j]) * delta_g;
    }
    total
}

/// Reaction exergy, registered as `reaction_exergy`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReactionExergy;

impl Derive for ReactionExergy {
    fn name(&self) -> &str {
        "reaction_exergy"
    }

    fn arity(&self, _: &StateLayout, _: &DiagnosticsConfig) -> usize {
        1
    }

    fn state_components(&self, layout: &StateLayout) -> usize {
        layout.temperature() + 1
    }

    fn inputs(&self, _config: &DiagnosticsConfig) -> &'static [Input] {
        &[Input::Chemistry]
    }

    fn requires_compressible(&self) -> bool {
        true
    }

    fn derive(&self, ctx: &mut DeriveContext<'_>) -> Result<(), DeriveError> {
        let chemistry = ctx.evaluators().chemistry()?;
        let state = ctx.state();
        let layout = ctx.layout();
        let geometry = ctx.geometry();
        require_species("chemistry evaluator", chemistry.num_species(), layout)?;

        let mut ws = Workspace::new(layout.num_species(), chemistry.num_reactions());
        let mut y = SpeciesVec::new();
        for cell in ctx.region().cells() {
            let rho = mass_fractions(state, layout, cell, &mut y);
            let t = state.get(cell, layout.temperature());
            let exergy = cell_exergy(chemistry, &mut ws, rho, &y, t);
            ctx.out().set(cell, 0, exergy);
            if ctx.log_enabled() {
                let x = geometry.cell_center(cell);
                ctx.log_cell(CellRecord {
                    position: [x[0], x[1]],
                    density: rho,
                    temperature: t,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Evaluators;
    use ember_derive::{BlockView, CellLog, DerivedField, ScratchRegion};
    use ember_test_utils::{BlockFixture, MockChemistry};

    #[test]
    fn equilibrium_contributes_nothing() {
        // q_f == q_r when k_f c_F c_O == k_r c_P^2.
        let mut chem = MockChemistry::default();
        chem.k_forward = 1.0;
        chem.k_reverse = 1.0;
        let mut ws = Workspace::new(3, 1);
        let w = chem.weights;
        // c = (2, 8, 4) mol/m^3: 2 * 8 == 4^2.
        let rho = 2.0 * w[0] + 8.0 * w[1] + 4.0 * w[2];
        let y = [2.0 * w[0] / rho, 8.0 * w[1] / rho, 4.0 * w[2] / rho];
        let e = cell_exergy(&chem, &mut ws, rho, &y, 1500.0);
        assert!(e.abs() < 1e-6, "e = {e}");
    }

    #[test]
    fn absent_species_are_clamped_not_infinite() {
        let chem = MockChemistry::default();
        let mut ws = Workspace::new(3, 1);
        let e = cell_exergy(&chem, &mut ws, 1.0, &[0.5, 0.5, 0.0], 1200.0);
        assert!(e.is_finite());
        let floor = GAS_CONSTANT * 1200.0 * (ws.gibbs[2] + f64::EPSILON.ln());
        assert!((ws.potentials[2] - floor).abs() < 1e-9 * floor.abs());
    }

    #[test]
    fn negative_concentration_skips_reaction() {
        let chem = MockChemistry::default();
        let mut ws = Workspace::new(3, 1);
        let e = cell_exergy(&chem, &mut ws, 1.0, &[0.6, 0.6, -0.2], 1200.0);
        assert_eq!(e, 0.0);
    }

    #[test]
    fn logs_one_record_per_cell() {
        let fx = BlockFixture::uniform_2d(3, 0);
        let chem = MockChemistry::default();
        let config = DiagnosticsConfig::default();
        let mut out = fx.output(1);
        let mut scratch = ScratchRegion::new(0);
        let mut log = CellLog::new();
        let mut ctx = DeriveContext::new(
            BlockView::new(fx.region, &fx.state, &fx.flags, &fx.geometry),
            &fx.layout,
            &config,
            Evaluators {
                chemistry: Some(&chem),
                ..Evaluators::default()
            },
            DerivedField::new(&mut out, 0, 1).unwrap(),
            &mut scratch,
        )
        .with_log(&mut log);
        ReactionExergy.derive(&mut ctx).unwrap();
        drop(ctx);
        assert_eq!(log.len(), 9);
        let first = log.records()[0];
        assert_eq!(first.position, [0.05, 0.05]);
        assert_eq!(first.temperature, 1000.0);
        assert!(out.get([2, 2, 0], 0).is_finite());
    }
}
