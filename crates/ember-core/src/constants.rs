//! Physical constants shared by kernels and the profile initializer (SI).

/// Universal gas constant, J/(mol K).
pub const GAS_CONSTANT: f64 = 8.31446;

/// Standard atmosphere, Pa.
pub const ATMOSPHERE: f64 = 101_325.0;
