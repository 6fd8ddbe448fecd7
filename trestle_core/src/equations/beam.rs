//! # Simply-Supported Beam Formulas
//!
//! Statics and stress formulas for a simply-supported span carrying point
//! loads. Support A is a pin at x = 0, support B a roller at x = L.
//!
//! ## Notation
//!
//! - `L` = Span length (mm)
//! - `x` = Station along the beam from support A (mm)
//! - `a` = Load position from support A (mm)
//! - `P` = Point load magnitude (N)
//! - `RA`, `RB` = Left and right reactions (N)
//! - `M` = Bending moment (N·mm), `V` = Shear force (N)
//! - `I` = Moment of inertia (mm⁴), `Q` = First moment of area (mm³)
//!
//! ## Sign Conventions
//!
//! - Loads: Positive downward
//! - Moment: Positive causes compression on top fibre (sagging)
//! - Shear: Positive when left side up relative to right
//! - Reactions: Positive upward
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1
//! - Structural Analysis by R.C. Hibbeler

/// Reactions for a set of point loads `(position, magnitude)` on span `l`
///
/// ```text
///        P₁      P₂
///        ↓       ↓
///    ────┬───────┬────
///    △                △
///   RA  ←─────L─────→ RB
/// ```
///
/// # Formulas
/// - RB = Σ(Pᵢ·aᵢ)/L  (moments about A)
/// - RA = ΣPᵢ − RB
///
/// `l` must be non-zero; the caller validates the span.
///
/// # Example
/// ```rust
/// use trestle_core::equations::beam::point_loads_reactions;
///
/// let (ra, rb) = point_loads_reactions(&[(600.0, 400.0)], 1200.0);
/// assert!((ra - 200.0).abs() < 1e-9);
/// assert!((rb - 200.0).abs() < 1e-9);
/// ```
pub fn point_loads_reactions(loads: &[(f64, f64)], l: f64) -> (f64, f64) {
    let total: f64 = loads.iter().map(|(_, p)| p).sum();
    let moment_about_a: f64 = loads.iter().map(|(a, p)| p * a).sum();
    let rb = moment_about_a / l;
    (total - rb, rb)
}

/// Shear at station x
///
/// # Formula
/// V(x) = RA − Σ Pᵢ   over loads with aᵢ ≤ x
///
/// A load sitting exactly on the station is already subtracted.
pub fn shear_at(ra: f64, loads: &[(f64, f64)], x: f64) -> f64 {
    loads
        .iter()
        .filter(|(a, _)| *a <= x)
        .fold(ra, |v, (_, p)| v - p)
}

/// Moment at station x
///
/// # Formula
/// M(x) = RA·x − Σ Pᵢ·(x − aᵢ)   over loads with aᵢ ≤ x
pub fn moment_at(ra: f64, loads: &[(f64, f64)], x: f64) -> f64 {
    loads
        .iter()
        .filter(|(a, _)| *a <= x)
        .fold(ra * x, |m, (a, p)| m - p * (x - a))
}

/// Round to one decimal place so repeated evaluation gives identical diagrams
#[inline]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Flexural stress at distance `y` from the neutral axis
///
/// # Formula
/// σ = M·y / I
#[inline]
pub fn bending_stress(m: f64, y: f64, i: f64) -> f64 {
    m * y / i
}

/// Shear stress from shear flow
///
/// # Formula
/// τ = V·Q / (I·b)
///
/// `b` is the width cut by the plane of interest: the material width at the
/// neutral axis, or the bond-line thickness for an adhesive joint.
#[inline]
pub fn shear_flow_stress(v: f64, q: f64, i: f64, b: f64) -> f64 {
    v * q / (i * b)
}

/// Factor of safety: strength over demand
///
/// A zero demand gives `f64::INFINITY` (nothing to fail).
#[inline]
pub fn factor_of_safety(strength: f64, demand: f64) -> f64 {
    strength / demand.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_point_load_reactions() {
        // P = 400 N at x = 300 on L = 1200
        let (ra, rb) = point_loads_reactions(&[(300.0, 400.0)], 1200.0);
        assert_relative_eq!(rb, 100.0);
        assert_relative_eq!(ra, 300.0);
        assert_relative_eq!(ra + rb, 400.0);
    }

    #[test]
    fn test_loads_at_supports() {
        let (ra, rb) = point_loads_reactions(&[(0.0, 400.0), (1200.0, 400.0)], 1200.0);
        assert_relative_eq!(ra, 400.0);
        assert_relative_eq!(rb, 400.0);
    }

    #[test]
    fn test_shear_steps_at_load() {
        let loads = [(600.0, 400.0)];
        assert_relative_eq!(shear_at(200.0, &loads, 599.0), 200.0);
        assert_relative_eq!(shear_at(200.0, &loads, 600.0), -200.0);
    }

    #[test]
    fn test_moment_peaks_under_load() {
        let loads = [(600.0, 400.0)];
        assert_relative_eq!(moment_at(200.0, &loads, 600.0), 120_000.0);
        assert_relative_eq!(moment_at(200.0, &loads, 1200.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(12.34), 12.3);
        assert_eq!(round_to_tenth(-12.36), -12.4);
    }

    #[test]
    fn test_stress_formulas() {
        assert_relative_eq!(bending_stress(120_000.0, 50.0, 1.0e6), 6.0);
        assert_relative_eq!(shear_flow_stress(200.0, 5000.0, 1.0e6, 2.0), 0.5);
        assert_relative_eq!(factor_of_safety(30.0, -6.0), 5.0);
        assert!(factor_of_safety(30.0, 0.0).is_infinite());
    }
}
