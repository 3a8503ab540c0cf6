//! Profile parameters.
//!
//! [`ProfileConfig::builder`] starts from the piloted-jet defaults; every
//! setter overrides one parameter and [`ProfileConfigBuilder::build`]
//! validates the result.

use ember_core::ConfigError;
use ember_grid::Axis;

// ── StreamState ────────────────────────────────────────────────────

/// Pure state of one stream.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamState {
    /// Temperature, K.
    pub temperature: f64,
    /// Streamwise velocity, m/s.
    pub velocity: f64,
    /// Mass fractions, one per species.
    pub mass_fractions: Vec<f64>,
}

impl StreamState {
    /// Build a stream from named mass fractions; unnamed species are 0.
    ///
    /// Fails if a name is not one of `species_names`.
    pub fn from_named(
        species_names: &[&str],
        temperature: f64,
        velocity: f64,
        composition: &[(&str, f64)],
    ) -> Result<Self, ConfigError> {
        let mut mass_fractions = vec![0.0; species_names.len()];
        for &(name, y) in composition {
            let n = species_names
                .iter()
                .position(|s| *s == name)
                .ok_or_else(|| ConfigError::InvalidProfile {
                    reason: format!("species '{name}' is not in the mechanism"),
                })?;
            mass_fractions[n] = y;
        }
        Ok(Self {
            temperature,
            velocity,
            mass_fractions,
        })
    }
}

// ── ProfileConfig ──────────────────────────────────────────────────

/// Three-stream profile description.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileConfig {
    pub(crate) jet: StreamState,
    pub(crate) pilot: StreamState,
    pub(crate) coflow: StreamState,
    pub(crate) jet_pilot_center: f64,
    pub(crate) pilot_coflow_center: f64,
    pub(crate) jet_pilot_width: f64,
    pub(crate) pilot_side_width: f64,
    pub(crate) coflow_side_width: f64,
    pub(crate) steepness: f64,
    pub(crate) pressure: f64,
    pub(crate) radial_axis: Axis,
    pub(crate) streamwise_axis: Axis,
}

const JET_PILOT_CENTER: f64 = 0.003725;
const PILOT_COFLOW_CENTER: f64 = 0.009275;
const HALF_WIDTH: f64 = 0.002;
const STEEPNESS: f64 = 2.5;
const MEAN_PRESSURE: f64 = 100_615.725;

impl ProfileConfig {
    /// The piloted methane jet, with compositions resolved against
    /// `species_names`.
    ///
    /// The mechanism must contain CH4, O2, N2, AR, O, H2, H, H2O, CO, CO2
    /// and OH.
    pub fn piloted_jet(species_names: &[&str]) -> Result<ProfileConfigBuilder, ConfigError> {
        let jet = StreamState::from_named(
            species_names,
            294.0,
            63.1,
            &[("CH4", 0.1558), ("O2", 0.1958), ("N2", 0.6367), ("AR", 0.0117)],
        )?;
        let pilot = StreamState::from_named(
            species_names,
            1880.0,
            15.93,
            &[
                ("N2", 0.7342),
                ("O2", 0.054),
                ("O", 0.00075),
                ("H2", 0.00013),
                ("H", 0.00002),
                ("H2O", 0.0942),
                ("CO", 0.0041),
                ("CO2", 0.1098),
                ("OH", 0.0028),
            ],
        )?;
        let coflow = StreamState::from_named(
            species_names,
            291.0,
            1.0,
            &[("O2", 0.21), ("N2", 0.78), ("AR", 0.01)],
        )?;
        Ok(Self::builder(jet, pilot, coflow))
    }

    /// Builder with the given streams and default geometry.
    pub fn builder(
        jet: StreamState,
        pilot: StreamState,
        coflow: StreamState,
    ) -> ProfileConfigBuilder {
        ProfileConfigBuilder {
            config: ProfileConfig {
                jet,
                pilot,
                coflow,
                jet_pilot_center: JET_PILOT_CENTER,
                pilot_coflow_center: PILOT_COFLOW_CENTER,
                jet_pilot_width: HALF_WIDTH,
                pilot_side_width: HALF_WIDTH,
                coflow_side_width: HALF_WIDTH,
                steepness: STEEPNESS,
                pressure: MEAN_PRESSURE,
                radial_axis: Axis::X,
                streamwise_axis: Axis::Y,
            },
        }
    }

    /// Jet stream.
    pub fn jet(&self) -> &StreamState {
        &self.jet
    }

    /// Pilot stream.
    pub fn pilot(&self) -> &StreamState {
        &self.pilot
    }

    /// Coflow stream, also the far-field state.
    pub fn coflow(&self) -> &StreamState {
        &self.coflow
    }

    /// Centers of the jet/pilot and pilot/coflow interfaces.
    pub fn centers(&self) -> (f64, f64) {
        (self.jet_pilot_center, self.pilot_coflow_center)
    }

    /// Half-widths: jet/pilot, then the pilot and coflow sides of the
    /// second interface.
    pub fn half_widths(&self) -> (f64, f64, f64) {
        (
            self.jet_pilot_width,
            self.pilot_side_width,
            self.coflow_side_width,
        )
    }

    /// Blend steepness `k`.
    pub fn steepness(&self) -> f64 {
        self.steepness
    }

    /// Thermodynamic pressure, Pa.
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Axis the interfaces lie along.
    pub fn radial_axis(&self) -> Axis {
        self.radial_axis
    }

    /// Axis of the stream velocity.
    pub fn streamwise_axis(&self) -> Axis {
        self.streamwise_axis
    }

    /// Number of species in the stream compositions.
    pub fn num_species(&self) -> usize {
        self.jet.mass_fractions.len()
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidProfile { reason });
        let ns = self.num_species();
        for (name, s) in [("jet", &self.jet), ("pilot", &self.pilot), ("coflow", &self.coflow)] {
            if s.mass_fractions.len() != ns {
                return invalid(format!(
                    "{name} stream has {} species, jet has {ns}",
                    s.mass_fractions.len()
                ));
            }
            if !(s.temperature.is_finite() && s.temperature > 0.0) {
                return invalid(format!("{name} temperature must be positive"));
            }
            if s.mass_fractions.iter().any(|y| !(0.0..=1.0).contains(y)) {
                return invalid(format!("{name} mass fractions must lie in [0, 1]"));
            }
        }
        let (w1, w2, w3) = self.half_widths();
        if [w1, w2, w3].iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return invalid("half-widths must be positive".into());
        }
        if self.jet_pilot_center + w1 > self.pilot_coflow_center - w2 {
            return invalid("interface transitions overlap".into());
        }
        if !(self.steepness.is_finite() && self.steepness > 0.0) {
            return invalid("steepness must be positive".into());
        }
        if !(self.pressure.is_finite() && self.pressure > 0.0) {
            return invalid("pressure must be positive".into());
        }
        if self.radial_axis == self.streamwise_axis {
            return invalid("radial and streamwise axes coincide".into());
        }
        Ok(())
    }
}

// ── ProfileConfigBuilder ───────────────────────────────────────────

/// Builder for [`ProfileConfig`].
#[derive(Clone, Debug)]
pub struct ProfileConfigBuilder {
    config: ProfileConfig,
}

impl ProfileConfigBuilder {
    /// Interface centers along the radial axis.
    pub fn centers(mut self, jet_pilot: f64, pilot_coflow: f64) -> Self {
        self.config.jet_pilot_center = jet_pilot;
        self.config.pilot_coflow_center = pilot_coflow;
        self
    }

    /// Transition half-widths.
    pub fn half_widths(mut self, jet_pilot: f64, pilot_side: f64, coflow_side: f64) -> Self {
        self.config.jet_pilot_width = jet_pilot;
        self.config.pilot_side_width = pilot_side;
        self.config.coflow_side_width = coflow_side;
        self
    }

    /// Blend steepness `k`.
    pub fn steepness(mut self, k: f64) -> Self {
        self.config.steepness = k;
        self
    }

    /// Thermodynamic pressure, Pa.
    pub fn pressure(mut self, pressure: f64) -> Self {
        self.config.pressure = pressure;
        self
    }

    /// Radial and streamwise axes.
    pub fn axes(mut self, radial: Axis, streamwise: Axis) -> Self {
        self.config.radial_axis = radial;
        self.config.streamwise_axis = streamwise;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ProfileConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
