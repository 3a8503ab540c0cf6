//! Profile evaluation.

use ember_core::{ConfigError, SpeciesVec, StateLayout, Thermodynamics};
use ember_grid::{FieldArray, Geometry, IndexBox};
use smallvec::SmallVec;
use statrs::function::erf::erf;

use crate::config::{ProfileConfig, StreamState};
use crate::error::ProfileError;

/// One of the three streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    /// Central jet.
    Jet,
    /// Pilot annulus.
    Pilot,
    /// Surrounding coflow.
    Coflow,
}

/// Where a radial coordinate falls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Zone {
    /// Inside a pure stream.
    Pure(Stream),
    /// Inside a smoothed interface between `inner` and `outer`.
    Transition {
        /// Stream on the low side.
        inner: Stream,
        /// Stream on the high side.
        outer: Stream,
        /// Interface center.
        center: f64,
        /// Half-width used for the blend.
        half_width: f64,
    },
}

/// `erf(k xi / R) / erf(k)`: 0 at the interface center, +-1 at its edges.
pub fn blend_weight(xi: f64, half_width: f64, steepness: f64) -> f64 {
    erf(steepness * xi / half_width) / erf(steepness)
}

/// `(a + b)/2 - (a - b)/2 * w`: `a` at `w = -1`, `b` at `w = 1`.
#[inline]
pub fn blend(a: f64, b: f64, w: f64) -> f64 {
    0.5 * (a + b) - 0.5 * (a - b) * w
}

/// A thermodynamically closed state.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileState {
    /// Temperature, K.
    pub temperature: f64,
    /// Velocity; only the streamwise component is non-zero.
    pub velocity: [f64; 3],
    /// Mass fractions.
    pub mass_fractions: SpeciesVec,
    /// Density from the equation of state.
    pub density: f64,
    /// Mixture specific enthalpy.
    pub enthalpy: f64,
    /// Thermodynamic pressure.
    pub pressure: f64,
}

impl ProfileState {
    /// Write the conserved state vector of one cell into `out`, laid out
    /// per `layout`.
    pub fn write_state(&self, layout: &StateLayout, out: &mut [f64]) {
        let rho = self.density;
        for d in 0..layout.ndim() {
            out[layout.velocity() + d] = self.velocity[d];
        }
        out[layout.density()] = rho;
        for (n, y) in self.mass_fractions.iter().enumerate() {
            out[layout.first_species() + n] = rho * y;
        }
        out[layout.rhoh()] = rho * self.enthalpy;
        out[layout.temperature()] = self.temperature;
        out[layout.rhort()] = self.pressure;
    }
}

/// A configured profile bound to a thermodynamics evaluator.
pub struct Profile<'a> {
    config: ProfileConfig,
    thermo: &'a dyn Thermodynamics,
    layout: StateLayout,
}

impl<'a> Profile<'a> {
    /// Bind `config` to `thermo`; species counts must agree with `layout`.
    pub fn new(
        config: ProfileConfig,
        thermo: &'a dyn Thermodynamics,
        layout: StateLayout,
    ) -> Result<Self, ProfileError> {
        config.validate()?;
        let ns = layout.num_species();
        if config.num_species() != ns || thermo.num_species() != ns {
            return Err(ConfigError::InvalidProfile {
                reason: format!(
                    "profile has {} species, evaluator {}, layout {ns}",
                    config.num_species(),
                    thermo.num_species()
                ),
            }
            .into());
        }
        Ok(Self {
            config,
            thermo,
            layout,
        })
    }

    /// The profile parameters.
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    fn stream(&self, s: Stream) -> &StreamState {
        match s {
            Stream::Jet => &self.config.jet,
            Stream::Pilot => &self.config.pilot,
            Stream::Coflow => &self.config.coflow,
        }
    }

    /// Classify a radial coordinate.
    pub fn zone(&self, r: f64) -> Zone {
        let c = &self.config;
        let (c1, c2) = c.centers();
        let (w1, w2, w3) = c.half_widths();
        let transition = |inner, outer, center, half_width| Zone::Transition {
            inner,
            outer,
            center,
            half_width,
        };
        if r < c1 - w1 {
            Zone::Pure(Stream::Jet)
        } else if (r - c1).abs() <= w1 {
            transition(Stream::Jet, Stream::Pilot, c1, w1)
        } else if r < c2 - w2 {
            Zone::Pure(Stream::Pilot)
        } else if r <= c2 {
            transition(Stream::Pilot, Stream::Coflow, c2, w2)
        } else if r <= c2 + w3 {
            transition(Stream::Pilot, Stream::Coflow, c2, w3)
        } else {
            Zone::Pure(Stream::Coflow)
        }
    }

    /// The state at `position`.
    pub fn evaluate(&self, position: [f64; 3]) -> ProfileState {
        let r = position[self.config.radial_axis().index()];
        match self.zone(r) {
            Zone::Pure(s) => {
                let s = self.stream(s);
                self.close(s.temperature, s.velocity, s.mass_fractions.iter().copied().collect())
            }
            Zone::Transition {
                inner,
                outer,
                center,
                half_width,
            } => {
                let (a, b) = (self.stream(inner), self.stream(outer));
                let w = blend_weight(r - center, half_width, self.config.steepness());
                let y: SpeciesVec = a
                    .mass_fractions
                    .iter()
                    .zip(&b.mass_fractions)
                    .map(|(ya, yb)| blend(*ya, *yb, w))
                    .collect();
                self.close(
                    blend(a.temperature, b.temperature, w),
                    blend(a.velocity, b.velocity, w),
                    y,
                )
            }
        }
    }

    /// Inflow state at a boundary position.
    pub fn boundary_state(&self, position: [f64; 3]) -> ProfileState {
        self.evaluate(position)
    }

    /// The position-independent far-field (coflow) state.
    pub fn far_field(&self) -> ProfileState {
        let s = &self.config.coflow;
        self.close(s.temperature, s.velocity, s.mass_fractions.iter().copied().collect())
    }

    fn close(&self, temperature: f64, speed: f64, mass_fractions: SpeciesVec) -> ProfileState {
        let pressure = self.config.pressure();
        let mut velocity = [0.0; 3];
        velocity[self.config.streamwise_axis().index()] = speed;
        ProfileState {
            density: self.thermo.density(pressure, &mass_fractions, temperature),
            enthalpy: self.thermo.enthalpy(temperature, &mass_fractions),
            temperature,
            velocity,
            mass_fractions,
            pressure,
        }
    }

    /// Fill the state of every cell of `region` from its cell center.
    pub fn fill_state(
        &self,
        state: &mut FieldArray,
        geometry: &Geometry,
        region: &IndexBox,
    ) -> Result<(), ProfileError> {
        if !state.bx().contains_box(region) {
            return Err(ProfileError::RegionNotContained {
                region_lo: region.lo(),
                region_hi: region.hi(),
            });
        }
        let nvar = self.layout.nvar();
        if state.ncomp() < nvar {
            return Err(ProfileError::StateComponents {
                required: nvar,
                available: state.ncomp(),
            });
        }
        let mut cell_state: SmallVec<[f64; 32]> = SmallVec::from_elem(0.0, nvar);
        for cell in region.cells() {
            self.evaluate(geometry.cell_center(cell))
                .write_state(&self.layout, &mut cell_state);
            for (comp, v) in cell_state.iter().enumerate() {
                state.set(cell, comp, *v);
            }
        }
        Ok(())
    }
}
