//! Erf-blended three-stream profiles for initial and inflow data.
//!
//! A [`ProfileConfig`] describes three concentric streams (jet, pilot,
//! coflow) as pure states separated by two smoothed interfaces along a
//! radial axis. [`Profile`] evaluates the blended primitive state at a
//! position and closes it thermodynamically: density and enthalpy always
//! come from the blended composition and temperature, never from blending
//! density or enthalpy directly.
//!
//! ```text
//!   jet  |~~R1~~|  pilot  |~~R2~~|~~R3~~|  coflow
//!             c1                 c2
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod profile;

pub use config::{ProfileConfig, ProfileConfigBuilder, StreamState};
pub use error::ProfileError;
pub use profile::{blend, blend_weight, Profile, ProfileState, Stream, Zone};
