//! # Thin-Plate Buckling Formulas
//!
//! Elastic critical stresses for the thin plates that make up a built-up
//! section. Each plate is idealised as a long rectangular plate whose
//! restraint along its long edges sets the buckling coefficient `k`.
//!
//! ## Notation
//!
//! - `E` = Modulus of elasticity (MPa)
//! - `ν` = Poisson's ratio
//! - `t` = Plate thickness (mm)
//! - `b` = Loaded plate width (mm)
//! - `a` = Distance between transverse stiffeners (diaphragms)
//! - `h` = Web height
//!
//! ## References
//!
//! - Timoshenko & Gere, Theory of Elastic Stability, Ch. 9
//! - Bulson, The Stability of Flat Plates

use std::f64::consts::PI;

/// Buckling coefficient for a plate restrained along both long edges
pub const K_BOTH_EDGES: f64 = 4.0;

/// Buckling coefficient for a plate restrained along one long edge
pub const K_ONE_EDGE: f64 = 0.425;

/// Buckling coefficient for a web under a linearly varying stress
pub const K_WEB_FLEXURE: f64 = 6.0;

/// Buckling coefficient for a web in pure shear
pub const K_WEB_SHEAR: f64 = 5.0;

/// Plate stiffness factor π²E / (12(1 − ν²))
#[inline]
pub fn plate_stiffness(e: f64, nu: f64) -> f64 {
    PI * PI * e / (12.0 * (1.0 - nu * nu))
}

/// Critical compressive stress of a plate
///
/// # Formula
/// σ_cr = k·π²E / (12(1 − ν²)) · (t/b)²
///
/// # Example
/// ```rust
/// use trestle_core::equations::plate::{plate_buckling_stress, K_BOTH_EDGES};
///
/// let sigma = plate_buckling_stress(K_BOTH_EDGES, 4000.0, 0.2, 1.27, 80.0);
/// assert!(sigma > 3.4 && sigma < 3.5);
/// ```
#[inline]
pub fn plate_buckling_stress(k: f64, e: f64, nu: f64, t: f64, b: f64) -> f64 {
    k * plate_stiffness(e, nu) * (t / b).powi(2)
}

/// Critical shear stress of a web panel between diaphragms
///
/// # Formula
/// τ_cr = 5π²E / (12(1 − ν²)) · ((t/a)² + (t/h)²)
#[inline]
pub fn shear_buckling_stress(e: f64, nu: f64, t: f64, a: f64, h: f64) -> f64 {
    K_WEB_SHEAR * plate_stiffness(e, nu) * ((t / a).powi(2) + (t / h).powi(2))
}
