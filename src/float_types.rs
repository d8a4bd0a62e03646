//! Scalar type selection and the numeric constants shared across the crate.

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// Geometric tolerance used for degenerate-denominator and on-plane tests.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-4;
/// Geometric tolerance used for degenerate-denominator and on-plane tests.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-9;

/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;
