//! # Cross-Section Property Formulas
//!
//! Formulas for the geometric properties of rectangles and of sections built
//! from several rectangles. Lengths are millimetres, so areas come out in mm²,
//! first moments in mm³ and second moments in mm⁴.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Moment of inertia (second moment of area)
//! - `Q` = First moment of area about the neutral axis
//! - `ȳ` = Centroid height measured from the section datum
//! - `b` = Width of a rectangle
//! - `h` = Height of a rectangle
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Chapter 3
//! - Hibbeler, Mechanics of Materials, Appendix A (parallel-axis theorem)

// =============================================================================
// SINGLE RECTANGLE
// =============================================================================

/// Area of a rectangle
///
/// # Formula
/// A = b × h
///
/// # Example
/// ```rust
/// use trestle_core::equations::section::rectangular_area;
///
/// let area = rectangular_area(100.0, 1.27);
/// assert!((area - 127.0).abs() < 1e-9);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Moment of inertia of a rectangle about its own centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │ ════════│ ← own centroid at h/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bh³/12
///
/// # Example
/// ```rust
/// use trestle_core::equations::section::rectangular_moment_of_inertia;
///
/// let i = rectangular_moment_of_inertia(10.0, 100.0);
/// assert!((i - 833_333.333).abs() < 0.01);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

// =============================================================================
// COMPOSITE SECTIONS
// =============================================================================

/// Area-weighted centroid of a set of parts.
///
/// Each part is `(area, centroid)`. Returns `0.0` when the total area is
/// zero; callers rely on this sentinel for empty sections.
///
/// # Formula
/// ȳ = Σ(Aᵢ·yᵢ) / ΣAᵢ
pub fn weighted_centroid<I>(parts: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (area, first_moment) = parts
        .into_iter()
        .fold((0.0, 0.0), |(a, q), (ai, yi)| (a + ai, q + ai * yi));
    if area == 0.0 {
        return 0.0;
    }
    first_moment / area
}

/// Parallel-axis contribution of one part to a composite moment of inertia
///
/// # Formula
/// Iᵢ = I_self + A·d²
///
/// where `d` is the distance between the part's own centroid and the
/// composite centroid.
#[inline]
pub fn parallel_axis(i_self: f64, area: f64, distance: f64) -> f64 {
    i_self + area * distance * distance
}

/// First moment of area of a part about the neutral axis
///
/// # Formula
/// Q = A·|ȳᵢ − ȳ|
#[inline]
pub fn first_moment(area: f64, part_centroid: f64, neutral_axis: f64) -> f64 {
    area * (part_centroid - neutral_axis).abs()
}
